//! fencecrew library root.
//! Exposes the CLI parser, the high-level run() function and the field
//! backend used by the CLI and the tests.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod sim;
pub mod storage;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use tracing_subscriber::EnvFilter;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => commands::init::handle(cli),
        Commands::Config { .. } => commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => commands::log::handle(&cli.command, cfg),
        Commands::Login { .. } | Commands::Logout | Commands::StartDay { .. } | Commands::EndDay => {
            commands::session::handle(&cli.command, cfg)
        }
        Commands::List
        | Commands::Show { .. }
        | Commands::Start { .. }
        | Commands::Hold { .. }
        | Commands::Resume { .. } => commands::jobs::handle(&cli.command, cfg),
        Commands::PreJsa(_) | Commands::PostJsa(_) => commands::jsa::handle(&cli.command, cfg),
        Commands::AsBuilt(_) => commands::asbuilt::handle(&cli.command, cfg),
        Commands::Offline { .. } => commands::offline::handle(&cli.command, cfg),
        Commands::Incident(_) => commands::incident::handle(&cli.command, cfg),
        Commands::Remind { .. } => commands::remind::handle(&cli.command, cfg),
        Commands::Nav { .. } => commands::nav::handle(&cli.command, cfg),
        Commands::Export { .. } => commands::export::handle(&cli.command, cfg),
        Commands::Backup { .. } => commands::backup::handle(&cli.command, cfg),
    }
}

/// Diagnostics go to stderr, filtered by `RUST_LOG` (default `warn`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    init_tracing();

    let cli = Cli::parse();

    // Configuration is loaded once; `--db` wins over the file.
    let mut cfg = Config::load()?;
    if let Some(custom_db) = &cli.db {
        cfg.database = Config::resolve_db_path(custom_db)
            .to_string_lossy()
            .to_string();
    }

    tracing::debug!(database = %cfg.database, "configuration loaded");
    dispatch(&cli, &cfg)
}
