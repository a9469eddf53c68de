use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::sim::{NavPhase, NavigationView, Scheduler};
use crate::ui::messages::{header, success};
use std::time::Duration;

use super::{open_pool, open_service, signed_in};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Nav { job } = cmd else {
        return Ok(());
    };

    let pool = open_pool(cfg)?;
    let svc = open_service(&pool)?;
    signed_in(&svc)?;
    let job = svc.get_job(job)?;

    header(format!("Navigating to {} · {}", job.customer_name, job.address));

    let tick = Duration::from_millis(cfg.nav_tick_ms.max(1));
    let scheduler = Scheduler::new();
    let mut nav = NavigationView::new(tick);
    nav.start(&scheduler);

    let mut last = "";
    while nav.phase() == NavPhase::Navigating {
        scheduler.advance(tick);
        let instruction = nav.instruction();
        if instruction != last {
            println!(
                "{:>3}%  {}  ({}m remaining)",
                nav.progress(),
                instruction,
                nav.meters_remaining()
            );
            last = instruction;
        }
    }

    success(format!(
        "Arrived at {} after {}s of simulated driving.",
        job.address,
        scheduler.now().as_secs_f32()
    ));
    Ok(())
}
