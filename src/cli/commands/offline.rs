use crate::cli::parser::{Commands, Connectivity};
use crate::config::Config;
use crate::db::log::audit_quiet;
use crate::errors::AppResult;
use crate::ui::messages::{error, info, success, warning};

use super::{open_pool, open_service};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Offline { mode } = cmd else {
        return Ok(());
    };

    let pool = open_pool(cfg)?;
    let mut svc = open_service(&pool)?;
    let going_offline = *mode == Connectivity::On;

    if going_offline == svc.is_offline() {
        info(if going_offline {
            "Already offline."
        } else {
            "Already online."
        });
        return Ok(());
    }

    let pending = svc.queue().len();
    let report = svc.set_offline(going_offline)?;

    if going_offline {
        warning("Offline mode on: submissions will be saved on this device.");
        audit_quiet(&pool.conn, "offline", "on", "Offline mode enabled");
        return Ok(());
    }

    success(format!(
        "Back online: {} of {pending} queued write(s) synced.",
        report.replayed
    ));
    for failure in &report.failed {
        error(format!(
            "{} {} could not be synced: {}",
            failure.kind,
            failure.job_id.as_deref().unwrap_or(""),
            failure.reason
        ));
    }
    audit_quiet(
        &pool.conn,
        "sync",
        "off",
        &format!(
            "Offline mode disabled, {} replayed, {} failed",
            report.replayed,
            report.failed.len()
        ),
    );
    Ok(())
}
