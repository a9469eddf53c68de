//! One handler per subcommand. Handlers own the user-facing output and the
//! audit log; the rules live in `core`.

pub mod asbuilt;
pub mod backup;
pub mod config;
pub mod db;
pub mod export;
pub mod incident;
pub mod init;
pub mod jobs;
pub mod jsa;
pub mod log;
pub mod nav;
pub mod offline;
pub mod remind;
pub mod session;

use crate::config::Config;
use crate::core::service::{FieldService, WriteOutcome};
use crate::db::jobs::SqliteJobRepository;
use crate::db::local_storage::SqliteStore;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::user::User;
use crate::ui::messages::{queued, success};

pub(crate) type CliService<'c> = FieldService<SqliteJobRepository<'c>, SqliteStore<'c>>;

pub(crate) fn open_pool(cfg: &Config) -> AppResult<DbPool> {
    DbPool::open_initialized(&cfg.database)
}

pub(crate) fn open_service(pool: &DbPool) -> AppResult<CliService<'_>> {
    FieldService::open(pool.repository(), pool.local_store())
}

/// Field commands need a signed-in foreman.
pub(crate) fn signed_in(svc: &CliService<'_>) -> AppResult<User> {
    svc.require_user()
}

pub(crate) fn report_write(what: &str, outcome: WriteOutcome) {
    match outcome {
        WriteOutcome::Applied => success(format!("{what} submitted.")),
        WriteOutcome::Queued { pending } => queued(format!(
            "Offline: {what} saved locally and will sync when back online ({pending} pending)."
        )),
    }
}

pub(crate) fn outcome_label(outcome: WriteOutcome) -> &'static str {
    match outcome {
        WriteOutcome::Applied => "submitted",
        WriteOutcome::Queued { .. } => "queued offline",
    }
}
