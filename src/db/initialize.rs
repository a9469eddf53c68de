use crate::db::jobs::SqliteJobRepository;
use crate::db::migrate::run_pending_migrations;
use crate::errors::AppResult;
use rusqlite::Connection;

/// Initialize the database.
/// Delegates all schema creation / upgrades to the migration engine, then
/// seeds the schedule the first time the jobs table is seen empty.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    run_pending_migrations(conn)?;

    let repo = SqliteJobRepository::new(conn);
    if repo.is_empty()? {
        repo.seed()?;
    }
    Ok(())
}
