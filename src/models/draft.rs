use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormType {
    PreJsa,
    PostJsa,
    AsBuilt,
}

impl FormType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormType::PreJsa => "pre-jsa",
            FormType::PostJsa => "post-jsa",
            FormType::AsBuilt => "as-built",
        }
    }

    /// Local storage key of the in-progress draft for `job_id`.
    pub fn storage_key(&self, job_id: &str) -> String {
        match self {
            FormType::PreJsa => format!("prejsa_{job_id}"),
            FormType::PostJsa => format!("postjsa_{job_id}"),
            FormType::AsBuilt => format!("asbuilt_progress_{job_id}"),
        }
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Locally persisted wizard state, resumable across reloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub form_type: FormType,
    pub step: u8,
    pub payload: serde_json::Value,
}

impl Draft {
    pub fn new(form_type: FormType, step: u8, payload: serde_json::Value) -> Self {
        Self {
            form_type,
            step,
            payload,
        }
    }
}
