use crate::db::migrate::known_versions;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::draft::FormType;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use std::fs;

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_kb = (file_size as f64) / 1024.0;

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.1} KB", CYAN, RESET, file_kb);

    //
    // 2) JOBS BY STATUS
    //
    let mut stmt = pool
        .conn
        .prepare("SELECT status, COUNT(*) FROM jobs GROUP BY status ORDER BY status")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;

    println!("{}• Jobs:{}", CYAN, RESET);
    let mut total = 0;
    for r in rows {
        let (status, count) = r?;
        total += count;
        println!("    {:<12} {}{}{}", status, GREEN, count, RESET);
    }
    if total == 0 {
        println!("    {GREY}--{RESET}");
    }

    //
    // 3) HISTORY / INCIDENTS / DRAFTS
    //
    let history: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM job_history", [], |row| row.get(0))?;
    let incidents: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM incidents", [], |row| row.get(0))?;
    let store = pool.local_store();
    let mut drafts = 0;
    for form in [FormType::PreJsa, FormType::PostJsa, FormType::AsBuilt] {
        drafts += store.keys_with_prefix(&form.storage_key(""))?.len();
    }

    //
    // 4) SCHEMA
    //
    let applied: i64 = pool.conn.query_row(
        "SELECT COUNT(*) FROM log WHERE operation = 'migration_applied'",
        [],
        |row| row.get(0),
    )?;
    let known = known_versions();

    println!("{}• History entries:{} {}", CYAN, RESET, history);
    println!("{}• Incidents:{} {}", CYAN, RESET, incidents);
    println!("{}• Open drafts:{} {}", CYAN, RESET, drafts);
    println!(
        "{}• Schema:{} {}/{} migrations (latest {})",
        CYAN,
        RESET,
        applied,
        known.len(),
        known.last().copied().unwrap_or("--")
    );

    println!();
    Ok(())
}
