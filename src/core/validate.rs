//! Pure gating rules. Nothing here touches storage: a failed check leaves
//! every persisted record exactly as it was.

use crate::core::asbuilt::AsBuiltStep;
use crate::errors::{AppError, AppResult};
use crate::models::forms::{Answer, AsBuiltForm, Questionnaire};
use crate::models::incident::{IncidentDetails, IncidentReport};

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Shared yes/no rule: every question answered, every "no" explained.
pub fn questions<F: Questionnaire>(form: &F) -> AppResult<()> {
    for q in form.questions() {
        match q.question.answer {
            Answer::Unanswered => {
                return Err(AppError::validation(format!(
                    "{}: an answer is required",
                    q.id
                )));
            }
            Answer::No if blank(&q.question.details) => {
                return Err(AppError::validation(format!(
                    "{}: please explain why the answer is No",
                    q.id
                )));
            }
            _ => {}
        }
    }
    Ok(())
}

pub fn questions_ok<F: Questionnaire>(form: &F) -> bool {
    questions(form).is_ok()
}

/// Check a single As-Built step.
pub fn as_built_step(form: &AsBuiltForm, step: AsBuiltStep) -> AppResult<()> {
    match step {
        AsBuiltStep::Header => {
            let h = &form.header;
            let required = [
                ("job name", &h.job_name),
                ("street address", &h.street_address),
                ("foreman", &h.foreman),
                ("second crew member", &h.second_crew_member),
                ("clock-in time", &h.clock_in),
            ];
            let missing: Vec<&str> = required
                .iter()
                .filter(|(_, v)| blank(v))
                .map(|(name, _)| *name)
                .collect();
            if !missing.is_empty() {
                return Err(AppError::validation(format!(
                    "Missing {}",
                    missing.join(", ")
                )));
            }
        }
        AsBuiltStep::Drawing => {
            if form.drawing.as_deref().is_none_or(blank) {
                return Err(AppError::validation(
                    "Please save the site drawing before continuing",
                ));
            }
        }
        AsBuiltStep::Items => {
            if !form.items.iter().any(|row| row.qty > 0) {
                return Err(AppError::validation(
                    "Add at least one installed item with a quantity above zero",
                ));
            }
        }
        AsBuiltStep::Photos => {
            let missing = form.photos.missing();
            if !missing.is_empty() {
                let names: Vec<&str> = missing.iter().map(|s| s.as_str()).collect();
                return Err(AppError::validation(format!(
                    "Missing mandatory photos: {}",
                    names.join(", ")
                )));
            }
        }
        AsBuiltStep::Checklist => {}
        AsBuiltStep::Signature => {
            if form.signature.as_deref().is_none_or(blank) {
                return Err(AppError::validation("Foreman signature is required"));
            }
        }
    }
    Ok(())
}

/// Whole-form check used on submission.
pub fn as_built(form: &AsBuiltForm) -> AppResult<()> {
    for step in AsBuiltStep::ALL {
        as_built_step(form, step).map_err(|e| match e {
            AppError::Validation(msg) => {
                AppError::Validation(format!("step {} ({}): {}", step.index(), step.title(), msg))
            }
            other => other,
        })?;
    }
    Ok(())
}

/// A hold needs a reason; returns it trimmed.
pub fn hold_details(details: &str) -> AppResult<&str> {
    let d = details.trim();
    if d.is_empty() {
        return Err(AppError::validation(
            "Please describe what is needed before putting the job on hold",
        ));
    }
    Ok(d)
}

pub fn truck_number(number: &str) -> AppResult<&str> {
    let n = number.trim();
    if n.is_empty() {
        return Err(AppError::validation("Truck number is required"));
    }
    Ok(n)
}

pub fn incident(report: &IncidentReport) -> AppResult<()> {
    if report.signature.as_deref().is_none_or(blank) {
        return Err(AppError::validation("Signature required."));
    }
    if blank(&report.date) {
        return Err(AppError::validation("Date of incident is required"));
    }

    match &report.details {
        IncidentDetails::Employee {
            employee_name,
            description,
            ..
        } => {
            if blank(employee_name) || blank(description) {
                return Err(AppError::validation(
                    "Employee name and description are required",
                ));
            }
        }
        IncidentDetails::Utility { utility_types, .. } => {
            if utility_types.is_empty() {
                return Err(AppError::validation(
                    "Select at least one damaged utility type",
                ));
            }
        }
        IncidentDetails::Witness {
            witness_name,
            description,
        } => {
            if blank(witness_name) || blank(description) {
                return Err(AppError::validation(
                    "Witness name and description are required",
                ));
            }
        }
    }
    Ok(())
}
