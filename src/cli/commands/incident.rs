use crate::cli::parser::{Commands, IncidentArgs};
use crate::config::Config;
use crate::db::log::audit_quiet;
use crate::errors::AppResult;
use crate::models::incident::{IncidentDetails, IncidentKind, IncidentReport};
use crate::utils::date::{parse_date, today};

use super::{open_pool, open_service, outcome_label, report_write, signed_in};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Incident(args) = cmd else {
        return Ok(());
    };

    let pool = open_pool(cfg)?;
    let mut svc = open_service(&pool)?;
    signed_in(&svc)?;

    let report = build_report(args)?;
    let kind = report.details.kind();
    let outcome = svc.submit_incident(report)?;

    report_write("Incident report", outcome);
    audit_quiet(&pool.conn, "incident", kind.as_str(), outcome_label(outcome));
    Ok(())
}

fn build_report(args: &IncidentArgs) -> AppResult<IncidentReport> {
    let date = match &args.date {
        Some(d) => parse_date(d)?,
        None => today(),
    };

    let text = |v: &Option<String>| v.clone().unwrap_or_default();

    let details = match args.kind {
        IncidentKind::Employee => IncidentDetails::Employee {
            employee_name: text(&args.employee),
            injury_type: text(&args.injury),
            description: args.description.clone(),
        },
        IncidentKind::Utility => IncidentDetails::Utility {
            utility_types: args.utilities.clone(),
            marked: args.marked,
            photos: args.photos.clone(),
            description: args.description.clone(),
        },
        IncidentKind::Witness => IncidentDetails::Witness {
            witness_name: text(&args.witness),
            description: args.description.clone(),
        },
    };

    Ok(IncidentReport {
        date: date.format("%Y-%m-%d").to_string(),
        details,
        signature: args.signature.clone(),
    })
}
