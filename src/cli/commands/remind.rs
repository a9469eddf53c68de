use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::colors::{GREY, RESET, YELLOW};
use crate::utils::date::today;

use super::{open_pool, open_service};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Remind {
        note,
        date,
        list: _,
        remove,
    } = cmd
    else {
        return Ok(());
    };

    let pool = open_pool(cfg)?;
    let mut svc = open_service(&pool)?;

    if let (Some(note), Some(date)) = (note, date) {
        let r = svc.reminders().add(note, date)?;
        success(format!("Reminder #{} set for {}", r.id, r.date));
        return Ok(());
    }

    if let Some(id) = remove {
        let r = svc.reminders().remove(*id)?;
        success(format!("Reminder #{} removed: {}", r.id, r.note));
        return Ok(());
    }

    let items = svc.reminders().list()?;
    if items.is_empty() {
        info("No reminders.");
        return Ok(());
    }

    let today = today();
    for r in items {
        let color = if r.date < today {
            GREY
        } else if r.date == today {
            YELLOW
        } else {
            RESET
        };
        println!("{color}#{:<3} {}  {}{RESET}", r.id, r.date, r.note);
    }
    Ok(())
}
