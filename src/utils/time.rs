//! Clock times entered on the As-Built header.

use crate::errors::{AppError, AppResult};
use chrono::NaiveTime;

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t.trim(), "%H:%M").ok()
}

/// Normalise `HH:MM`, rejecting anything else.
pub fn normalize_clock(field: &str, value: &str) -> AppResult<String> {
    parse_time(value)
        .map(|t| t.format("%H:%M").to_string())
        .ok_or_else(|| AppError::InvalidField(format!("{field}: expected HH:MM, got '{value}'")))
}
