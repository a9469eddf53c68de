//! Job status state machine.
//!
//! ```text
//! scheduled ──start──▶ in-progress ──hold──▶ hold-equip / hold-help
//!                          ▲   │                   │
//!                          └───┼──────resume───────┘
//!                              └──complete──▶ completed (terminal)
//! ```
//!
//! `JobLifecycle` is the only place that decides whether a transition is
//! legal. It re-checks every precondition even though the CLI gates its
//! commands through [`available_actions`] first.

use crate::core::validate;
use crate::errors::{AppError, AppResult};
use crate::models::job::Job;
use crate::models::job_status::{HoldKind, JobStatus};
use crate::storage::repository::JobRepository;
use std::fmt;

pub const HISTORY_STARTED: &str = "started";
pub const HISTORY_SAFETY_CHECK: &str = "safety-check";
pub const DETAILS_STARTED: &str = "Job started by foreman";
pub const DETAILS_RESUMED: &str = "Resumed work";
pub const DETAILS_COMPLETED: &str = "Job marked as complete";
pub const DETAILS_SAFETY_CHECK: &str = "Pre-Job Safety Analysis completed";

/// What the foreman may do next with a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobAction {
    PreJsa,
    StartJob,
    HoldEquip,
    HoldHelp,
    Resume,
    PostJsa,
    AsBuilt,
}

impl JobAction {
    pub fn label(&self) -> &'static str {
        match self {
            JobAction::PreJsa => "Complete Pre-JSA",
            JobAction::StartJob => "Start job",
            JobAction::HoldEquip => "Request equipment",
            JobAction::HoldHelp => "Request help",
            JobAction::Resume => "Resume work",
            JobAction::PostJsa => "Complete Post-JSA",
            JobAction::AsBuilt => "Document As-Built",
        }
    }

    pub fn command_hint(&self, job_id: &str) -> String {
        match self {
            JobAction::PreJsa => format!("fencecrew pre-jsa {job_id}"),
            JobAction::StartJob => format!("fencecrew start {job_id}"),
            JobAction::HoldEquip => format!("fencecrew hold {job_id} --kind equip --details ..."),
            JobAction::HoldHelp => format!("fencecrew hold {job_id} --kind help --details ..."),
            JobAction::Resume => format!("fencecrew resume {job_id}"),
            JobAction::PostJsa => format!("fencecrew post-jsa {job_id}"),
            JobAction::AsBuilt => format!("fencecrew as-built {job_id}"),
        }
    }
}

impl fmt::Display for JobAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Presentation gate: until a Pre-JSA is on file only the Pre-JSA entry is offered.
pub fn available_actions(job: &Job) -> Vec<JobAction> {
    if job.status.is_terminal() {
        return Vec::new();
    }
    if !job.has_pre_jsa() {
        return vec![JobAction::PreJsa];
    }

    match job.status {
        JobStatus::Scheduled => vec![JobAction::StartJob],
        JobStatus::InProgress => {
            let wrap_up = if job.post_jsa.is_none() {
                JobAction::PostJsa
            } else {
                JobAction::AsBuilt
            };
            vec![JobAction::HoldEquip, JobAction::HoldHelp, wrap_up]
        }
        JobStatus::HoldEquip | JobStatus::HoldHelp => vec![JobAction::Resume],
        JobStatus::Completed => Vec::new(),
    }
}

pub struct JobLifecycle<'r, R: JobRepository + ?Sized> {
    repo: &'r mut R,
}

impl<'r, R: JobRepository + ?Sized> JobLifecycle<'r, R> {
    pub fn new(repo: &'r mut R) -> Self {
        Self { repo }
    }

    /// `scheduled → in-progress`, only once a Pre-JSA is on file.
    pub fn start_job(&mut self, id: &str) -> AppResult<Job> {
        let job = self.repo.get_job(id)?;

        if job.status != JobStatus::Scheduled {
            return Err(AppError::illegal(id, job.status, "start"));
        }
        if !job.has_pre_jsa() {
            return Err(AppError::illegal(id, "no Pre-JSA is on file", "start"));
        }

        self.transition(id, JobStatus::InProgress, HISTORY_STARTED, DETAILS_STARTED)
    }

    /// `in-progress → hold-equip | hold-help`; the reason must not be blank.
    pub fn request_hold(&mut self, id: &str, kind: HoldKind, details: &str) -> AppResult<Job> {
        let job = self.repo.get_job(id)?;
        let details = validate::hold_details(details)?;

        if job.status != JobStatus::InProgress || !job.has_pre_jsa() {
            return Err(AppError::illegal(id, job.status, "put on hold"));
        }

        let target = kind.target_status();
        self.transition(id, target, target.to_db_str(), details)
    }

    /// `hold-* → in-progress`. Resuming a job that is already in progress
    /// keeps the status but still records the request.
    pub fn resume_job(&mut self, id: &str) -> AppResult<Job> {
        let job = self.repo.get_job(id)?;

        match job.status {
            JobStatus::HoldEquip | JobStatus::HoldHelp | JobStatus::InProgress => self.transition(
                id,
                JobStatus::InProgress,
                JobStatus::InProgress.to_db_str(),
                DETAILS_RESUMED,
            ),
            other => Err(AppError::illegal(id, other, "resume")),
        }
    }

    /// `in-progress → completed`, only after the As-Built is on file.
    pub fn complete_job(&mut self, id: &str) -> AppResult<Job> {
        let job = self.repo.get_job(id)?;

        if job.status != JobStatus::InProgress {
            return Err(AppError::illegal(id, job.status, "complete"));
        }
        if job.as_built.is_none() {
            return Err(AppError::illegal(id, "no As-Built is on file", "complete"));
        }

        self.transition(
            id,
            JobStatus::Completed,
            JobStatus::Completed.to_db_str(),
            DETAILS_COMPLETED,
        )
    }

    fn transition(
        &mut self,
        id: &str,
        to: JobStatus,
        history_status: &str,
        details: &str,
    ) -> AppResult<Job> {
        self.repo.set_status(id, to)?;
        self.repo.append_history(id, history_status, details)?;
        tracing::info!(job = id, status = %to, "job status changed");
        self.repo.get_job(id)
    }
}
