use crate::models::job::Job;
use serde::Serialize;

/// One history entry flattened with the job it belongs to.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct HistoryExport {
    pub job_id: String,
    pub customer: String,
    pub job_status: String,
    pub truck: String,
    pub event: String,
    pub details: String,
    pub timestamp: String,
}

pub(crate) fn flatten_history(jobs: &[Job]) -> Vec<HistoryExport> {
    jobs.iter()
        .flat_map(|job| {
            job.history.iter().map(move |h| HistoryExport {
                job_id: job.id.clone(),
                customer: job.customer_name.clone(),
                job_status: job.status.to_db_str().to_string(),
                truck: job.truck_number.clone().unwrap_or_default(),
                event: h.status.clone(),
                details: h.details.clone(),
                timestamp: h.timestamp.to_rfc3339(),
            })
        })
        .collect()
}
