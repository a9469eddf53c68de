use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::flatten_history;
use crate::storage::repository::JobRepository;
use crate::ui::messages::warning;
use std::path::Path;

pub struct ExportLogic;

impl ExportLogic {
    /// Export the day's jobs.
    ///
    /// - `csv`: job history, one line per entry
    /// - `json`: complete job records
    ///
    /// `file` must be an absolute path. Returns the number of records written.
    pub fn export<R: JobRepository + ?Sized>(
        repo: &R,
        format: ExportFormat,
        file: &str,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "output file path must be absolute: {file}"
            )));
        }

        ensure_writable(path, force)?;

        let jobs = repo.list_jobs()?;

        match format {
            ExportFormat::Csv => {
                let rows = flatten_history(&jobs);
                if rows.is_empty() {
                    warning("No job history recorded yet.");
                    return Ok(0);
                }
                export_csv(&rows, path)?;
                Ok(rows.len())
            }
            ExportFormat::Json => {
                export_json(&jobs, path)?;
                Ok(jobs.len())
            }
        }
    }
}
