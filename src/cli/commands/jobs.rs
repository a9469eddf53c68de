use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::lifecycle::JobAction;
use crate::db::log::audit_quiet;
use crate::errors::{AppError, AppResult};
use crate::models::job::Job;
use crate::models::job_status::HoldKind;
use crate::ui::messages::{header, info, success};
use crate::utils::colors::{GREY, RESET, color_for_status, colorize_optional};
use crate::utils::date::local_stamp;
use crate::utils::table::{Column, Table};

use super::{CliService, open_pool, open_service, signed_in};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let pool = open_pool(cfg)?;
    let mut svc = open_service(&pool)?;
    signed_in(&svc)?;

    match cmd {
        Commands::List => list(&svc, cfg),
        Commands::Show { job } => show(&svc, job),
        Commands::Start { job } => {
            require_action(&svc, job, JobAction::StartJob)?;
            let updated = svc.start_job(job)?;
            success(format!("{} started.", updated.id));
            audit_quiet(&pool.conn, "start", job, "Job started by foreman");
            Ok(())
        }
        Commands::Hold {
            job,
            kind,
            details,
        } => {
            let action = match kind {
                HoldKind::Equip => JobAction::HoldEquip,
                HoldKind::Help => JobAction::HoldHelp,
            };
            require_action(&svc, job, action)?;
            let updated = svc.request_hold(job, *kind, details)?;
            success(format!("{} is now {}.", updated.id, updated.status.label()));
            audit_quiet(&pool.conn, "hold", job, details.trim());
            Ok(())
        }
        Commands::Resume { job } => {
            let current = svc.get_job(job)?;
            if current.status.is_hold() {
                require_action(&svc, job, JobAction::Resume)?;
            }
            let updated = svc.resume_job(job)?;
            success(format!("{} resumed ({}).", updated.id, updated.status.label()));
            audit_quiet(&pool.conn, "resume", job, "Resumed work");
            Ok(())
        }
        _ => Ok(()),
    }
}

/// The menu gate: refuse commands the job screen would not offer.
fn require_action(svc: &CliService<'_>, id: &str, action: JobAction) -> AppResult<Job> {
    let job = svc.get_job(id)?;
    if !svc.available_actions(&job).contains(&action) {
        let hint = if job.has_pre_jsa() {
            String::new()
        } else {
            format!(" (complete the Pre-JSA first: {})", JobAction::PreJsa.command_hint(id))
        };
        return Err(AppError::IllegalTransition {
            job: id.to_string(),
            from: format!("{}{hint}", job.status),
            action: action.label().to_lowercase(),
        });
    }
    Ok(job)
}

fn list(svc: &CliService<'_>, cfg: &Config) -> AppResult<()> {
    let jobs = svc.list_jobs()?;
    if let Some(truck) = svc.truck_number()? {
        info(format!("Truck {truck}"));
    }

    let mut table = Table::new(vec![
        Column::new("ID", 8),
        Column::new("CUSTOMER", 12),
        Column::new("TYPE", 17),
        Column::new("STATUS", 20),
        Column::new("ADDRESS", 36),
    ]);

    for job in &jobs {
        table.add_row(vec![
            job.id.clone(),
            job.customer_name.clone(),
            job.job_type.clone(),
            format!("{}{}{}", color_for_status(job.status), job.status.label(), RESET),
            job.address.clone(),
        ]);
    }

    print!("{}", table.render(&cfg.separator_char));
    if svc.is_offline() {
        info(format!(
            "Offline mode: {} write(s) waiting to sync",
            svc.queue().len()
        ));
    }
    Ok(())
}

fn show(svc: &CliService<'_>, id: &str) -> AppResult<()> {
    let job = svc.get_job(id)?;

    header(format!("{} · {}", job.id, job.customer_name));
    println!("Type     : {}", job.job_type);
    println!("Address  : {}", job.address);
    println!("Phone    : {}", colorize_optional(&job.phone));
    println!("Notes    : {}", colorize_optional(&job.notes));
    println!(
        "Truck    : {}",
        colorize_optional(job.truck_number.as_deref().unwrap_or(""))
    );
    println!(
        "Status   : {}{}{}",
        color_for_status(job.status),
        job.status.label(),
        RESET
    );
    println!(
        "Forms    : Pre-JSA {} · Post-JSA {} · As-Built {}",
        tick(job.pre_jsa.is_some()),
        tick(job.post_jsa.is_some()),
        tick(job.as_built.is_some())
    );

    println!("\nHistory:");
    if job.history.is_empty() {
        println!("  {GREY}no activity yet{RESET}");
    }
    for h in &job.history {
        println!("  {}  {:<12} {}", local_stamp(&h.timestamp), h.status, h.details);
    }

    let actions = svc.available_actions(&job);
    if !actions.is_empty() {
        println!("\nNext:");
        for a in actions {
            println!("  {:<20} {GREY}{}{RESET}", a.label(), a.command_hint(&job.id));
        }
    }
    Ok(())
}

fn tick(done: bool) -> &'static str {
    if done { "✔" } else { "·" }
}
