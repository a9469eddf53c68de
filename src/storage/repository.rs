//! Canonical storage of the day's jobs.
//!
//! Repositories are intentionally "dumb": they never decide whether a status
//! change is legal. That is the lifecycle controller's job.

use crate::errors::{AppError, AppResult};
use crate::models::forms::{AsBuiltForm, PostJsaAnswers, PreJsaAnswers};
use crate::models::incident::{IncidentReport, IncidentStatus, StoredIncident};
use crate::models::job::{HistoryEntry, Job, Submission};
use crate::models::job_status::JobStatus;
use crate::storage::seed::seed_jobs;
use chrono::Utc;

pub trait JobRepository {
    /// All jobs on the current schedule, in schedule order.
    fn list_jobs(&self) -> AppResult<Vec<Job>>;

    fn get_job(&self, id: &str) -> AppResult<Job>;

    /// Append an audit entry stamped with the current time.
    fn append_history(&mut self, id: &str, status: &str, details: &str) -> AppResult<()>;

    fn set_status(&mut self, id: &str, status: JobStatus) -> AppResult<()>;

    /// Throw away all progress and restore the seeded schedule.
    fn reset_all(&mut self) -> AppResult<()>;

    fn record_pre_jsa(&mut self, id: &str, answers: PreJsaAnswers) -> AppResult<()>;

    fn record_post_jsa(&mut self, id: &str, answers: PostJsaAnswers) -> AppResult<()>;

    fn record_as_built(&mut self, id: &str, form: AsBuiltForm) -> AppResult<()>;

    /// Stamp the day's truck on every job that has none. Returns the number of jobs touched.
    fn assign_truck(&mut self, number: &str) -> AppResult<usize>;

    fn record_incident(&mut self, report: IncidentReport, status: IncidentStatus)
    -> AppResult<i64>;

    fn list_incidents(&self) -> AppResult<Vec<StoredIncident>>;
}

/// Session-scoped, purely in-memory repository.
#[derive(Debug, Clone)]
pub struct MemoryJobRepository {
    seed: Vec<Job>,
    jobs: Vec<Job>,
    incidents: Vec<StoredIncident>,
}

impl Default for MemoryJobRepository {
    fn default() -> Self {
        Self::with_seed(seed_jobs())
    }
}

impl MemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a custom schedule; `reset_all` returns to it.
    pub fn with_seed(seed: Vec<Job>) -> Self {
        Self {
            jobs: seed.clone(),
            seed,
            incidents: Vec::new(),
        }
    }

    fn job_mut(&mut self, id: &str) -> AppResult<&mut Job> {
        self.jobs
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or_else(|| AppError::NotFound(id.to_string()))
    }
}

impl JobRepository for MemoryJobRepository {
    fn list_jobs(&self) -> AppResult<Vec<Job>> {
        Ok(self.jobs.clone())
    }

    fn get_job(&self, id: &str) -> AppResult<Job> {
        self.jobs
            .iter()
            .find(|j| j.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(id.to_string()))
    }

    fn append_history(&mut self, id: &str, status: &str, details: &str) -> AppResult<()> {
        let job = self.job_mut(id)?;
        job.history.push(HistoryEntry {
            status: status.to_string(),
            details: details.to_string(),
            timestamp: Utc::now(),
        });
        Ok(())
    }

    fn set_status(&mut self, id: &str, status: JobStatus) -> AppResult<()> {
        self.job_mut(id)?.status = status;
        Ok(())
    }

    fn reset_all(&mut self) -> AppResult<()> {
        self.jobs = self.seed.clone();
        Ok(())
    }

    fn record_pre_jsa(&mut self, id: &str, answers: PreJsaAnswers) -> AppResult<()> {
        self.job_mut(id)?.pre_jsa = Some(Submission::now(answers));
        Ok(())
    }

    fn record_post_jsa(&mut self, id: &str, answers: PostJsaAnswers) -> AppResult<()> {
        self.job_mut(id)?.post_jsa = Some(Submission::now(answers));
        Ok(())
    }

    fn record_as_built(&mut self, id: &str, form: AsBuiltForm) -> AppResult<()> {
        self.job_mut(id)?.as_built = Some(Submission::now(form));
        Ok(())
    }

    fn assign_truck(&mut self, number: &str) -> AppResult<usize> {
        let mut touched = 0;
        for job in self.jobs.iter_mut().filter(|j| j.truck_number.is_none()) {
            job.truck_number = Some(number.to_string());
            touched += 1;
        }
        Ok(touched)
    }

    fn record_incident(
        &mut self,
        report: IncidentReport,
        status: IncidentStatus,
    ) -> AppResult<i64> {
        let id = self.incidents.len() as i64 + 1;
        self.incidents.push(StoredIncident {
            id,
            report,
            status,
            recorded_at: Utc::now(),
        });
        Ok(id)
    }

    fn list_incidents(&self) -> AppResult<Vec<StoredIncident>> {
        Ok(self.incidents.clone())
    }
}
