use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::audit_quiet;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

use super::{open_pool, open_service, signed_in};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let pool = open_pool(cfg)?;
    let mut svc = open_service(&pool)?;

    match cmd {
        Commands::Login { user, password } => {
            let who = svc.login(user, password)?;
            success(format!("Welcome, {} ({})", who.name, who.role));
            audit_quiet(&pool.conn, "login", &who.id, &format!("Signed in as {user}"));
        }
        Commands::Logout => {
            svc.logout()?;
            success("Signed out. Schedule reset.");
            audit_quiet(&pool.conn, "logout", "", "Signed out");
        }
        Commands::StartDay { truck } => {
            let user = signed_in(&svc)?;
            let stamped = svc.start_day(truck)?;
            let truck = truck.trim();
            success(format!("Good morning {}, truck {truck} is yours today.", user.name));
            info(format!("{stamped} job(s) assigned to truck {truck}"));
            audit_quiet(&pool.conn, "start-day", truck, "Vehicle walk-around completed");
        }
        Commands::EndDay => {
            if !svc.queue().is_empty() {
                warning(format!(
                    "{} write(s) still waiting for a connection; they stay queued.",
                    svc.queue().len()
                ));
            }
            svc.end_day()?;
            success("Day ended. Schedule reset.");
            audit_quiet(&pool.conn, "end-day", "", "Day ended");
        }
        _ => {}
    }

    Ok(())
}
