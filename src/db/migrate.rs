use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists. Applied migrations are recorded there.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

struct Migration {
    version: &'static str,
    message: &'static str,
    sql: &'static str,
}

/// Ordered schema history. Never edit an entry once released; append instead.
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20260901_0001_create_jobs",
        message: "Created jobs and job_history tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS jobs (
            id            TEXT PRIMARY KEY,
            seq           INTEGER NOT NULL,
            customer_name TEXT NOT NULL,
            address       TEXT NOT NULL,
            phone         TEXT NOT NULL DEFAULT '',
            notes         TEXT NOT NULL DEFAULT '',
            status        TEXT NOT NULL DEFAULT 'scheduled'
                          CHECK(status IN ('scheduled','in-progress','hold-equip','hold-help','completed')),
            lat           REAL NOT NULL DEFAULT 0,
            lng           REAL NOT NULL DEFAULT 0,
            pre_jsa       TEXT,
            post_jsa      TEXT,
            as_built      TEXT,
            truck_number  TEXT,
            job_type      TEXT NOT NULL DEFAULT ''
        );

        CREATE TABLE IF NOT EXISTS job_history (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            job_id    TEXT NOT NULL REFERENCES jobs(id),
            status    TEXT NOT NULL,
            details   TEXT NOT NULL DEFAULT '',
            timestamp TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_history_job ON job_history(job_id, id);
        "#,
    },
    Migration {
        version: "20260901_0002_create_local_storage",
        message: "Created local_storage table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS local_storage (
            key        TEXT PRIMARY KEY,
            value      TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20261002_0003_create_incidents",
        message: "Created incidents table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS incidents (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            kind        TEXT NOT NULL CHECK(kind IN ('employee','utility','witness')),
            report      TEXT NOT NULL,
            status      TEXT NOT NULL DEFAULT 'submitted',
            recorded_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_incidents_kind ON incidents(kind);
        "#,
    },
];

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(m.sql)?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, 'migration_applied', ?2, ?3)",
        [chrono::Local::now().to_rfc3339().as_str(), m.version, m.message],
    )?;
    tx.commit()
}

/// Public entry point: run all pending migrations. Returns how many were applied.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }
        apply(conn, m)?;
        tracing::debug!(version = m.version, "migration applied");
        success(format!("Migration applied: {} → {}", m.version, m.message));
        applied += 1;
    }

    Ok(applied)
}

/// Versions known to this build, oldest first.
pub fn known_versions() -> Vec<&'static str> {
    MIGRATIONS.iter().map(|m| m.version).collect()
}
