use super::forms::{AsBuiltForm, PostJsaAnswers, PreJsaAnswers};
use super::job_status::JobStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A form payload plus the moment it was accepted by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission<T> {
    #[serde(flatten)]
    pub data: T,
    pub submitted_at: DateTime<Utc>,
}

impl<T> Submission<T> {
    pub fn now(data: T) -> Self {
        Self {
            data,
            submitted_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub status: String,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub customer_name: String,
    pub address: String,
    pub phone: String,
    pub notes: String,
    pub status: JobStatus,
    pub lat: f64,
    pub lng: f64,
    pub pre_jsa: Option<Submission<PreJsaAnswers>>,
    pub post_jsa: Option<Submission<PostJsaAnswers>>,
    pub as_built: Option<Submission<AsBuiltForm>>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    pub truck_number: Option<String>,
    #[serde(rename = "type")]
    pub job_type: String,
}

impl Job {
    /// Fresh job as it appears on the morning schedule.
    #[allow(clippy::too_many_arguments)]
    pub fn scheduled(
        id: &str,
        customer_name: &str,
        address: &str,
        phone: &str,
        notes: &str,
        lat: f64,
        lng: f64,
        job_type: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            customer_name: customer_name.to_string(),
            address: address.to_string(),
            phone: phone.to_string(),
            notes: notes.to_string(),
            status: JobStatus::Scheduled,
            lat,
            lng,
            pre_jsa: None,
            post_jsa: None,
            as_built: None,
            history: Vec::new(),
            truck_number: None,
            job_type: job_type.to_string(),
        }
    }

    pub fn has_pre_jsa(&self) -> bool {
        self.pre_jsa.is_some()
    }
}
