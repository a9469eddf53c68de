use crate::cli::parser::{Commands, JsaArgs};
use crate::config::Config;
use crate::core::jsa::JsaWizard;
use crate::db::log::audit_quiet;
use crate::errors::{AppError, AppResult};
use crate::models::forms::{Answer, PostJsaAnswers, PreJsaAnswers, Questionnaire};
use crate::sim::{GeofenceCheck, Scheduler};
use crate::ui::messages::{header, info, success, warning};
use crate::utils::colors::{GREEN, GREY, RED, RESET};
use std::time::Duration;

use super::{CliService, open_pool, open_service, outcome_label, report_write, signed_in};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let pool = open_pool(cfg)?;
    let mut svc = open_service(&pool)?;
    signed_in(&svc)?;

    match cmd {
        Commands::PreJsa(args) => {
            svc.get_job(&args.job)?;
            confirm_on_site(cfg);

            let wizard = fill::<PreJsaAnswers>(&mut svc, args)?;
            if args.submit {
                let outcome = wizard.submit(&mut svc)?;
                report_write("Pre-JSA", outcome);
                audit_quiet(&pool.conn, "pre-jsa", &args.job, outcome_label(outcome));
            } else {
                hint_submit(&wizard, "pre-jsa", &args.job);
            }
        }
        Commands::PostJsa(args) => {
            svc.get_job(&args.job)?;

            let wizard = fill::<PostJsaAnswers>(&mut svc, args)?;
            if args.submit {
                let outcome = wizard.submit(&mut svc)?;
                report_write("Post-JSA", outcome);
                audit_quiet(&pool.conn, "post-jsa", &args.job, outcome_label(outcome));
            } else {
                hint_submit(&wizard, "post-jsa", &args.job);
            }
        }
        _ => {}
    }

    Ok(())
}

/// Simulated GPS approach check shown before the Pre-JSA.
fn confirm_on_site(cfg: &Config) {
    let scheduler = Scheduler::new();
    let gps = GeofenceCheck::start(&scheduler, Duration::from_millis(cfg.gps_confirm_ms));
    info("Verifying GPS location...");
    scheduler.advance(Duration::from_millis(cfg.gps_confirm_ms));
    if gps.confirmed() {
        success("GPS Confirmed within geofence.");
    }
}

/// Open the draft, apply every `--set`, print the form.
fn fill<F: Questionnaire>(svc: &mut CliService<'_>, args: &JsaArgs) -> AppResult<JsaWizard<F>> {
    let mut wizard = JsaWizard::<F>::open(&svc.drafts(), &args.job)?;
    if wizard.restored() {
        info("Resuming saved draft.");
    }

    for raw in &args.set {
        let (id, answer, details) = parse_set(raw)?;
        wizard.answer(&mut svc.drafts(), &id, answer)?;
        if let Some(details) = details {
            wizard.details(&mut svc.drafts(), &id, &details)?;
        }
    }

    header(format!("{} · {}", F::TITLE, args.job));
    for q in wizard.answers().questions() {
        let answer = match q.question.answer {
            Answer::Yes => format!("{GREEN}yes{RESET}"),
            Answer::No => format!("{RED}no{RESET}"),
            Answer::Unanswered => format!("{GREY}--{RESET}"),
        };
        println!("{}. {} [{}]", q.id, q.prompt, answer);
        if !q.question.details.trim().is_empty() {
            println!("    ↳ {}", q.question.details);
        }
    }

    Ok(wizard)
}

fn hint_submit<F: Questionnaire>(wizard: &JsaWizard<F>, command: &str, job: &str) {
    match wizard.validate() {
        Ok(()) => info(format!(
            "Draft saved. Ready to submit: fencecrew {command} {job} --submit"
        )),
        Err(e) => warning(format!("Draft saved. {e}")),
    }
}

/// `q2=no:Ladder missing` → (`q2`, No, Some("Ladder missing")).
fn parse_set(raw: &str) -> AppResult<(String, Answer, Option<String>)> {
    let (id, rest) = raw
        .split_once('=')
        .ok_or_else(|| AppError::InvalidField(format!("expected qN=yes|no[:details], got '{raw}'")))?;

    let (answer, details) = match rest.split_once(':') {
        Some((a, d)) => (a, Some(d.trim().to_string())),
        None => (rest, None),
    };

    let answer = Answer::parse(answer)
        .ok_or_else(|| AppError::InvalidField(format!("{id}: '{answer}' is not yes or no")))?;

    Ok((id.trim().to_lowercase(), answer, details))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_set_splits_details() {
        let (id, a, d) = parse_set("Q2=no: Ladder missing").unwrap();
        assert_eq!(id, "q2");
        assert_eq!(a, Answer::No);
        assert_eq!(d.as_deref(), Some("Ladder missing"));

        assert!(parse_set("q1").is_err());
        assert!(parse_set("q1=maybe").is_err());
    }
}
