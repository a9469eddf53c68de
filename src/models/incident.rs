use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum IncidentKind {
    /// Employee injury
    Employee,
    /// Damaged underground utility
    Utility,
    /// Witness statement
    Witness,
}

impl IncidentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentKind::Employee => "employee",
            IncidentKind::Utility => "utility",
            IncidentKind::Witness => "witness",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum UtilityType {
    Electric,
    Sewer,
    Gas,
    Water,
    #[serde(rename = "Fiber/Phone")]
    #[value(name = "fiber")]
    FiberPhone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum IncidentDetails {
    #[serde(rename_all = "camelCase")]
    Employee {
        employee_name: String,
        injury_type: String,
        description: String,
    },
    #[serde(rename_all = "camelCase")]
    Utility {
        utility_types: Vec<UtilityType>,
        marked: Option<bool>,
        photos: Vec<String>,
        description: String,
    },
    #[serde(rename_all = "camelCase")]
    Witness {
        witness_name: String,
        description: String,
    },
}

impl IncidentDetails {
    pub fn kind(&self) -> IncidentKind {
        match self {
            IncidentDetails::Employee { .. } => IncidentKind::Employee,
            IncidentDetails::Utility { .. } => IncidentKind::Utility,
            IncidentDetails::Witness { .. } => IncidentKind::Witness,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentReport {
    pub date: String,
    pub details: IncidentDetails,
    pub signature: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IncidentStatus {
    Submitted,
    SyncedFromOffline,
}

impl IncidentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentStatus::Submitted => "submitted",
            IncidentStatus::SyncedFromOffline => "synced-from-offline",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "submitted" => Some(IncidentStatus::Submitted),
            "synced-from-offline" => Some(IncidentStatus::SyncedFromOffline),
            _ => None,
        }
    }
}

/// An incident as held by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredIncident {
    pub id: i64,
    pub report: IncidentReport,
    pub status: IncidentStatus,
    pub recorded_at: DateTime<Utc>,
}
