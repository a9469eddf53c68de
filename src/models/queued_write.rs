use super::forms::{AsBuiltForm, PostJsaAnswers, PreJsaAnswers};
use super::incident::IncidentReport;
use serde::{Deserialize, Serialize};

/// A write deferred while the device is offline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum QueuedWrite {
    PreJsa {
        #[serde(rename = "jobId")]
        job_id: String,
        payload: PreJsaAnswers,
    },
    PostJsa {
        #[serde(rename = "jobId")]
        job_id: String,
        payload: PostJsaAnswers,
    },
    AsBuilt {
        #[serde(rename = "jobId")]
        job_id: String,
        payload: Box<AsBuiltForm>,
    },
    Incident {
        payload: IncidentReport,
    },
}

impl QueuedWrite {
    pub fn kind(&self) -> &'static str {
        match self {
            QueuedWrite::PreJsa { .. } => "pre-jsa",
            QueuedWrite::PostJsa { .. } => "post-jsa",
            QueuedWrite::AsBuilt { .. } => "as-built",
            QueuedWrite::Incident { .. } => "incident",
        }
    }

    pub fn job_id(&self) -> Option<&str> {
        match self {
            QueuedWrite::PreJsa { job_id, .. }
            | QueuedWrite::PostJsa { job_id, .. }
            | QueuedWrite::AsBuilt { job_id, .. } => Some(job_id),
            QueuedWrite::Incident { .. } => None,
        }
    }
}
