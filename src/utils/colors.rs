//! ANSI color helper utilities for terminal output.
use crate::models::job_status::JobStatus;

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const CYAN: &str = "\x1b[36m";

pub fn color_for_status(status: JobStatus) -> &'static str {
    match status {
        JobStatus::Scheduled => BLUE,
        JobStatus::InProgress => GREEN,
        JobStatus::HoldEquip | JobStatus::HoldHelp => YELLOW,
        JobStatus::Completed => GREY,
    }
}

/// Grey placeholder for empty values, the value itself otherwise.
pub fn colorize_optional(value: &str) -> String {
    if value.trim().is_empty() || value.trim() == "--" {
        format!("{GREY}--{RESET}")
    } else {
        value.to_string()
    }
}
