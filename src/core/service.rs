//! The field backend: one object owning the job repository, the device's
//! local store and the offline queue. Everything the CLI does to a job goes
//! through here.

use crate::core::asbuilt::AsBuiltStep;
use crate::core::lifecycle::{self, JobAction, JobLifecycle};
use crate::core::offline::{self, OfflineQueue};
use crate::core::reminders::ReminderBook;
use crate::core::validate;
use crate::errors::{AppError, AppResult};
use crate::models::draft::{Draft, FormType};
use crate::models::forms::{AsBuiltForm, PostJsaAnswers, PreJsaAnswers};
use crate::models::incident::{IncidentReport, IncidentStatus};
use crate::models::job::Job;
use crate::models::job_status::{HoldKind, JobStatus};
use crate::models::queued_write::QueuedWrite;
use crate::storage::draft_store::DraftStore;
use crate::storage::kv::KeyValueStore;
use crate::storage::repository::JobRepository;

pub const HISTORY_POST_JSA: &str = "post-jsa";
pub const DETAILS_POST_JSA: &str = "Post-Job Safety Analysis completed";

/// What happened to a form or incident submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Written to the repository right away.
    Applied,
    /// Parked in the offline queue; `pending` counts everything waiting.
    Queued { pending: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncFailure {
    pub kind: &'static str,
    pub job_id: Option<String>,
    pub reason: String,
}

/// Result of replaying the offline queue after reconnecting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub replayed: usize,
    pub failed: Vec<SyncFailure>,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct FieldService<R: JobRepository, S: KeyValueStore> {
    pub(crate) repo: R,
    pub(crate) store: S,
    offline: bool,
    queue: OfflineQueue,
}

impl<R: JobRepository, S: KeyValueStore> FieldService<R, S> {
    /// Wire a service over `repo` and `store`, restoring the offline flag and
    /// any queued writes left from a previous run.
    pub fn open(repo: R, store: S) -> AppResult<Self> {
        let offline = offline::load_flag(&store)?;
        let queue = OfflineQueue::load(&store)?;
        Ok(Self {
            repo,
            store,
            offline,
            queue,
        })
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    pub fn queue(&self) -> &OfflineQueue {
        &self.queue
    }

    pub fn drafts(&mut self) -> DraftStore<'_, S> {
        DraftStore::new(&mut self.store)
    }

    pub fn reminders(&mut self) -> ReminderBook<'_, S> {
        ReminderBook::new(&mut self.store)
    }

    pub fn list_jobs(&self) -> AppResult<Vec<Job>> {
        self.repo.list_jobs()
    }

    pub fn get_job(&self, id: &str) -> AppResult<Job> {
        self.repo.get_job(id)
    }

    // -----------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------

    /// [`lifecycle::available_actions`], minus everything that would race an
    /// As-Built still waiting in the offline queue.
    pub fn available_actions(&self, job: &Job) -> Vec<JobAction> {
        let mut actions = lifecycle::available_actions(job);
        if self.queue.has_as_built(&job.id) {
            actions.retain(|a| {
                !matches!(
                    a,
                    JobAction::HoldEquip | JobAction::HoldHelp | JobAction::Resume | JobAction::AsBuilt
                )
            });
        }
        actions
    }

    pub fn start_job(&mut self, id: &str) -> AppResult<Job> {
        JobLifecycle::new(&mut self.repo).start_job(id)
    }

    pub fn request_hold(&mut self, id: &str, kind: HoldKind, details: &str) -> AppResult<Job> {
        self.repo.get_job(id)?;
        validate::hold_details(details)?;
        self.check_no_pending_as_built(id, "put on hold")?;
        JobLifecycle::new(&mut self.repo).request_hold(id, kind, details)
    }

    pub fn resume_job(&mut self, id: &str) -> AppResult<Job> {
        self.check_no_pending_as_built(id, "resume")?;
        JobLifecycle::new(&mut self.repo).resume_job(id)
    }

    /// A queued As-Built replays against the job as it is now. Until it has
    /// synced the job stays in progress.
    fn check_no_pending_as_built(&self, id: &str, action: &str) -> AppResult<()> {
        let job = self.repo.get_job(id)?;
        if self.queue.has_as_built(id) {
            return Err(AppError::illegal(
                id,
                format!("{} with an As-Built waiting to sync", job.status),
                action,
            ));
        }
        Ok(())
    }

    // -----------------------------------------------------------------
    // Form submits
    // -----------------------------------------------------------------

    pub fn submit_pre_jsa(&mut self, id: &str, answers: PreJsaAnswers) -> AppResult<WriteOutcome> {
        let job = self.repo.get_job(id)?;
        validate::questions(&answers)?;
        check_pre_jsa(&job)?;

        let outcome = self.write(QueuedWrite::PreJsa {
            job_id: id.to_string(),
            payload: answers,
        })?;
        self.drafts().clear(id, FormType::PreJsa)?;
        Ok(outcome)
    }

    pub fn submit_post_jsa(
        &mut self,
        id: &str,
        answers: PostJsaAnswers,
    ) -> AppResult<WriteOutcome> {
        let job = self.repo.get_job(id)?;
        validate::questions(&answers)?;
        check_post_jsa(&job)?;

        let outcome = self.write(QueuedWrite::PostJsa {
            job_id: id.to_string(),
            payload: answers,
        })?;
        self.drafts().clear(id, FormType::PostJsa)?;
        Ok(outcome)
    }

    /// Record the As-Built and complete the job. Offline, both happen on sync.
    pub fn submit_as_built(&mut self, id: &str, form: AsBuiltForm) -> AppResult<WriteOutcome> {
        let job = self.repo.get_job(id)?;
        validate::as_built(&form)?;
        check_as_built(&job)?;
        self.check_no_pending_as_built(id, "file the As-Built")?;

        let outcome = self.write(QueuedWrite::AsBuilt {
            job_id: id.to_string(),
            payload: Box::new(form),
        })?;
        self.drafts().clear(id, FormType::AsBuilt)?;
        Ok(outcome)
    }

    pub fn submit_incident(&mut self, report: IncidentReport) -> AppResult<WriteOutcome> {
        validate::incident(&report)?;
        self.write(QueuedWrite::Incident { payload: report })
    }

    // -----------------------------------------------------------------
    // Offline mode
    // -----------------------------------------------------------------

    /// Flip the connectivity flag. Going back online replays the queue.
    pub fn set_offline(&mut self, offline: bool) -> AppResult<SyncReport> {
        let was_offline = self.offline;
        self.offline = offline;
        offline::save_flag(&mut self.store, offline)?;

        if was_offline && !offline {
            return self.sync();
        }
        Ok(SyncReport::default())
    }

    /// Take the whole queue and replay it in order. The queue is cleared
    /// before replay; failed items are reported, not re-queued. A failed
    /// As-Built goes back to its draft so the foreman can file it again.
    fn sync(&mut self) -> AppResult<SyncReport> {
        let batch = self.queue.take_batch();
        self.queue.persist(&mut self.store)?;

        let mut report = SyncReport::default();
        for write in batch {
            let kind = write.kind();
            let job_id = write.job_id().map(str::to_string);
            let unsent = match &write {
                QueuedWrite::AsBuilt { job_id, payload } => Some((job_id.clone(), payload.clone())),
                _ => None,
            };

            match self.apply(write, IncidentStatus::SyncedFromOffline) {
                Ok(()) => {
                    tracing::debug!(kind, job = ?job_id, "replayed queued write");
                    report.replayed += 1;
                }
                Err(e) => {
                    tracing::warn!(kind, job = ?job_id, error = %e, "queued write failed on replay");
                    if let Some((id, form)) = unsent {
                        self.restore_as_built_draft(&id, &form)?;
                    }
                    report.failed.push(SyncFailure {
                        kind,
                        job_id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            replayed = report.replayed,
            failed = report.failed.len(),
            "offline queue synced"
        );
        Ok(report)
    }

    /// Park an As-Built that failed to sync on its signature step, unless the
    /// job is already closed.
    fn restore_as_built_draft(&mut self, id: &str, form: &AsBuiltForm) -> AppResult<()> {
        let job = match self.repo.get_job(id) {
            Ok(job) => job,
            Err(e) if e.is_not_found() => return Ok(()),
            Err(e) => return Err(e),
        };
        if job.status.is_terminal() {
            return Ok(());
        }

        let draft = Draft::new(
            FormType::AsBuilt,
            AsBuiltStep::Signature.index(),
            serde_json::to_value(form)?,
        );
        self.drafts().save(id, &draft)?;
        tracing::info!(job = id, "unsynced As-Built restored as a draft");
        Ok(())
    }

    fn write(&mut self, write: QueuedWrite) -> AppResult<WriteOutcome> {
        if self.offline {
            tracing::debug!(kind = write.kind(), "offline, queueing write");
            self.queue.enqueue(write);
            self.queue.persist(&mut self.store)?;
            return Ok(WriteOutcome::Queued {
                pending: self.queue.len(),
            });
        }

        self.apply(write, IncidentStatus::Submitted)?;
        Ok(WriteOutcome::Applied)
    }

    /// The one write path shared by online submits and queue replay.
    fn apply(&mut self, write: QueuedWrite, incident_status: IncidentStatus) -> AppResult<()> {
        match write {
            QueuedWrite::PreJsa { job_id, payload } => {
                check_pre_jsa(&self.repo.get_job(&job_id)?)?;
                self.repo.record_pre_jsa(&job_id, payload)?;
                self.repo.append_history(
                    &job_id,
                    lifecycle::HISTORY_SAFETY_CHECK,
                    lifecycle::DETAILS_SAFETY_CHECK,
                )
            }
            QueuedWrite::PostJsa { job_id, payload } => {
                check_post_jsa(&self.repo.get_job(&job_id)?)?;
                self.repo.record_post_jsa(&job_id, payload)?;
                self.repo
                    .append_history(&job_id, HISTORY_POST_JSA, DETAILS_POST_JSA)
            }
            QueuedWrite::AsBuilt { job_id, payload } => {
                check_as_built(&self.repo.get_job(&job_id)?)?;
                self.repo.record_as_built(&job_id, *payload)?;
                JobLifecycle::new(&mut self.repo).complete_job(&job_id)?;
                Ok(())
            }
            QueuedWrite::Incident { payload } => {
                let id = self.repo.record_incident(payload, incident_status)?;
                tracing::debug!(incident = id, "incident recorded");
                Ok(())
            }
        }
    }
}

fn check_pre_jsa(job: &Job) -> AppResult<()> {
    if job.status.is_terminal() {
        return Err(AppError::illegal(&job.id, job.status, "file a Pre-JSA"));
    }
    Ok(())
}

fn check_post_jsa(job: &Job) -> AppResult<()> {
    if job.status.is_terminal() || !job.has_pre_jsa() {
        return Err(AppError::illegal(&job.id, job.status, "file a Post-JSA"));
    }
    Ok(())
}

fn check_as_built(job: &Job) -> AppResult<()> {
    if job.status != JobStatus::InProgress {
        return Err(AppError::illegal(&job.id, job.status, "file the As-Built"));
    }
    Ok(())
}
