use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum JobStatus {
    Scheduled,
    InProgress,
    HoldEquip,
    HoldHelp,
    Completed,
}

impl JobStatus {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            JobStatus::Scheduled => "scheduled",
            JobStatus::InProgress => "in-progress",
            JobStatus::HoldEquip => "hold-equip",
            JobStatus::HoldHelp => "hold-help",
            JobStatus::Completed => "completed",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(JobStatus::Scheduled),
            "in-progress" => Some(JobStatus::InProgress),
            "hold-equip" => Some(JobStatus::HoldEquip),
            "hold-help" => Some(JobStatus::HoldHelp),
            "completed" => Some(JobStatus::Completed),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Scheduled => "Scheduled",
            JobStatus::InProgress => "In Progress",
            JobStatus::HoldEquip => "On Hold (Equipment)",
            JobStatus::HoldHelp => "On Hold (Help)",
            JobStatus::Completed => "Completed",
        }
    }

    pub fn is_hold(&self) -> bool {
        matches!(self, JobStatus::HoldEquip | JobStatus::HoldHelp)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

/// Reason attached to a hold request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum HoldKind {
    /// Waiting for equipment
    Equip,
    /// Waiting for an extra pair of hands
    Help,
}

impl HoldKind {
    pub fn target_status(&self) -> JobStatus {
        match self {
            HoldKind::Equip => JobStatus::HoldEquip,
            HoldKind::Help => JobStatus::HoldHelp,
        }
    }
}
