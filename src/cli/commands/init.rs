use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::log::audit_quiet;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped with `--test`)
///  - the SQLite database with every pending migration
///  - the seeded job schedule
pub fn handle(cli: &Cli) -> AppResult<()> {
    let db_path = Config::init_all(cli.db.as_deref(), cli.test)?;
    let db_path = db_path.to_string_lossy().to_string();

    info("Initializing fencecrew…");
    if !cli.test {
        info(format!("Config file : {}", Config::config_file().display()));
    }
    info(format!("Database    : {db_path}"));

    let pool = DbPool::open_initialized(&db_path)?;

    success(format!("Database initialized at {db_path}"));

    audit_quiet(
        &pool.conn,
        "init",
        "Database initialized",
        &format!("Database initialized at {db_path}"),
    );

    Ok(())
}
