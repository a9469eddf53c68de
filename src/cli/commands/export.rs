use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::audit_quiet;
use crate::errors::AppResult;
use crate::export::ExportLogic;

use super::open_pool;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        force,
    } = cmd
    {
        let pool = open_pool(cfg)?;
        let written = ExportLogic::export(&pool.repository(), *format, file, *force)?;
        audit_quiet(
            &pool.conn,
            "export",
            file,
            &format!("{} export, {written} records", format.as_str()),
        );
    }
    Ok(())
}
