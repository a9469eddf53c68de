//! SQLite-backed job repository used by the CLI.

use crate::errors::{AppError, AppResult};
use crate::models::forms::{AsBuiltForm, PostJsaAnswers, PreJsaAnswers};
use crate::models::incident::{IncidentReport, IncidentStatus, StoredIncident};
use crate::models::job::{HistoryEntry, Job, Submission};
use crate::models::job_status::JobStatus;
use crate::storage::repository::JobRepository;
use crate::storage::seed::seed_jobs;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::Serialize;
use serde::de::DeserializeOwned;

const JOB_COLUMNS: &str = "id, customer_name, address, phone, notes, status, lat, lng,
     pre_jsa, post_jsa, as_built, truck_number, job_type";

pub struct SqliteJobRepository<'c> {
    conn: &'c Connection,
}

fn conversion_error(col: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, rusqlite::types::Type::Text, Box::new(err))
}

fn parse_json_column<T: DeserializeOwned>(
    row: &Row,
    name: &str,
    col: usize,
) -> rusqlite::Result<Option<T>> {
    let raw: Option<String> = row.get(name)?;
    match raw {
        Some(text) => serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| conversion_error(col, AppError::Json(e))),
        None => Ok(None),
    }
}

fn parse_timestamp(raw: &str, col: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| conversion_error(col, AppError::InvalidDate(raw.to_string())))
}

/// Mapping DB → Job (history is loaded separately).
fn map_job(row: &Row) -> rusqlite::Result<Job> {
    let status_str: String = row.get("status")?;
    let status = JobStatus::from_db_str(&status_str).ok_or_else(|| {
        conversion_error(5, AppError::Other(format!("Invalid status: {}", status_str)))
    })?;

    Ok(Job {
        id: row.get("id")?,
        customer_name: row.get("customer_name")?,
        address: row.get("address")?,
        phone: row.get("phone")?,
        notes: row.get("notes")?,
        status,
        lat: row.get("lat")?,
        lng: row.get("lng")?,
        pre_jsa: parse_json_column(row, "pre_jsa", 8)?,
        post_jsa: parse_json_column(row, "post_jsa", 9)?,
        as_built: parse_json_column(row, "as_built", 10)?,
        history: Vec::new(),
        truck_number: row.get("truck_number")?,
        job_type: row.get("job_type")?,
    })
}

fn map_history(row: &Row) -> rusqlite::Result<HistoryEntry> {
    let ts: String = row.get("timestamp")?;
    Ok(HistoryEntry {
        status: row.get("status")?,
        details: row.get("details")?,
        timestamp: parse_timestamp(&ts, 3)?,
    })
}

impl<'c> SqliteJobRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn is_empty(&self) -> AppResult<bool> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM jobs", [], |row| row.get(0))?;
        Ok(count == 0)
    }

    /// Insert the seeded schedule. Callers make sure the tables are empty.
    pub fn seed(&self) -> AppResult<()> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO jobs (id, seq, customer_name, address, phone, notes, status, lat, lng, job_type)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )?;

        for (seq, job) in seed_jobs().iter().enumerate() {
            stmt.execute(params![
                job.id,
                seq as i64,
                job.customer_name,
                job.address,
                job.phone,
                job.notes,
                job.status.to_db_str(),
                job.lat,
                job.lng,
                job.job_type,
            ])?;
        }
        Ok(())
    }

    fn load_history(&self, id: &str) -> AppResult<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT status, details, timestamp FROM job_history
             WHERE job_id = ?1
             ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([id], map_history)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    /// Update one column, failing with NotFound when no row matched.
    fn update_column(&self, id: &str, column: &str, value: &dyn rusqlite::ToSql) -> AppResult<()> {
        let sql = format!("UPDATE jobs SET {column} = ?1 WHERE id = ?2");
        let changed = self.conn.execute(&sql, params![value, id])?;
        if changed == 0 {
            return Err(AppError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn record_submission<T: Serialize>(&self, id: &str, column: &str, data: T) -> AppResult<()> {
        let text = serde_json::to_string(&Submission::now(data))?;
        self.update_column(id, column, &text)
    }

    fn exists(&self, id: &str) -> AppResult<bool> {
        let found = self
            .conn
            .query_row("SELECT 1 FROM jobs WHERE id = ?1", [id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }
}

impl JobRepository for SqliteJobRepository<'_> {
    fn list_jobs(&self) -> AppResult<Vec<Job>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {JOB_COLUMNS} FROM jobs ORDER BY seq ASC"))?;

        let rows = stmt.query_map([], map_job)?;

        let mut jobs = Vec::new();
        for r in rows {
            let mut job = r?;
            job.history = self.load_history(&job.id)?;
            jobs.push(job);
        }
        Ok(jobs)
    }

    fn get_job(&self, id: &str) -> AppResult<Job> {
        let mut job = self
            .conn
            .query_row(
                &format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = ?1"),
                [id],
                map_job,
            )
            .optional()?
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;

        job.history = self.load_history(id)?;
        Ok(job)
    }

    fn append_history(&mut self, id: &str, status: &str, details: &str) -> AppResult<()> {
        if !self.exists(id)? {
            return Err(AppError::NotFound(id.to_string()));
        }

        self.conn.execute(
            "INSERT INTO job_history (job_id, status, details, timestamp)
             VALUES (?1, ?2, ?3, ?4)",
            params![id, status, details, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn set_status(&mut self, id: &str, status: JobStatus) -> AppResult<()> {
        self.update_column(id, "status", &status.to_db_str())
    }

    fn reset_all(&mut self) -> AppResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute_batch("DELETE FROM job_history; DELETE FROM jobs;")?;
        self.seed()?;
        tx.commit()?;
        Ok(())
    }

    fn record_pre_jsa(&mut self, id: &str, answers: PreJsaAnswers) -> AppResult<()> {
        self.record_submission(id, "pre_jsa", answers)
    }

    fn record_post_jsa(&mut self, id: &str, answers: PostJsaAnswers) -> AppResult<()> {
        self.record_submission(id, "post_jsa", answers)
    }

    fn record_as_built(&mut self, id: &str, form: AsBuiltForm) -> AppResult<()> {
        self.record_submission(id, "as_built", form)
    }

    fn assign_truck(&mut self, number: &str) -> AppResult<usize> {
        let touched = self.conn.execute(
            "UPDATE jobs SET truck_number = ?1 WHERE truck_number IS NULL",
            [number],
        )?;
        Ok(touched)
    }

    fn record_incident(
        &mut self,
        report: IncidentReport,
        status: IncidentStatus,
    ) -> AppResult<i64> {
        let text = serde_json::to_string(&report)?;
        self.conn.execute(
            "INSERT INTO incidents (kind, report, status, recorded_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                report.details.kind().as_str(),
                text,
                status.as_str(),
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn list_incidents(&self) -> AppResult<Vec<StoredIncident>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, report, status, recorded_at FROM incidents ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            let report: String = row.get(1)?;
            let status: String = row.get(2)?;
            let recorded_at: String = row.get(3)?;
            Ok(StoredIncident {
                id: row.get(0)?,
                report: serde_json::from_str(&report)
                    .map_err(|e| conversion_error(1, AppError::Json(e)))?,
                status: IncidentStatus::from_db_str(&status).ok_or_else(|| {
                    conversion_error(2, AppError::Other(format!("Invalid status: {}", status)))
                })?,
                recorded_at: parse_timestamp(&recorded_at, 3)?,
            })
        })?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }
}
