//! Punch Sources
//!
//! Where time entries come from before they are summarized: the live API
//! (implemented on [`PayrollClient`](crate::client::PayrollClient)) or a
//! CSV export of the time clock.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::PeriodFilter;
use crate::client::ClientError;
use crate::models::{RecordId, TimeEntry};

/// Common trait for anything that yields raw time entries
#[async_trait]
pub trait PunchSource: Send + Sync {
    /// Short label used in logs
    fn name(&self) -> &str;

    /// Fetch entries, narrowed by `filter` where the source supports it.
    /// Callers still apply the filter to the returned entries.
    async fn fetch_entries(&self, filter: &PeriodFilter) -> Result<Vec<TimeEntry>, SourceError>;
}

/// Errors that can occur while reading punches
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("API error: {0}")]
    Client(#[from] ClientError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line {line}: {message}")]
    Row { line: usize, message: String },
}

/// Time entries exported as CSV.
///
/// Expected header: `employee_id,punch_type,timestamp`, with optional `id`
/// and `notes` columns. `type`, `employee` and `created_at` are accepted as
/// alternate header names.
pub struct CsvPunchSource {
    path: PathBuf,
    delimiter: u8,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, alias = "employee")]
    employee_id: Option<String>,
    #[serde(default, alias = "type")]
    punch_type: Option<String>,
    #[serde(default, alias = "time")]
    timestamp: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<CsvRow> for TimeEntry {
    fn from(row: CsvRow) -> Self {
        TimeEntry {
            id: non_blank(row.id).map(RecordId::new),
            employee_id: non_blank(row.employee_id).map(RecordId::new),
            punch_type: non_blank(row.punch_type),
            timestamp: non_blank(row.timestamp),
            created_at: non_blank(row.created_at),
            notes: non_blank(row.notes),
            ..Default::default()
        }
    }
}

impl CsvPunchSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: b',',
        }
    }

    /// Set the field delimiter (e.g. `b';'` for some spreadsheet exports)
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every row of the file.
    ///
    /// Rows with blank or malformed cells still become entries; the
    /// aggregator reports them as skipped. Only structurally broken rows
    /// fail the whole read.
    pub fn read_entries(&self) -> Result<Vec<TimeEntry>, SourceError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)?;

        let mut entries = Vec::new();
        for (idx, result) in reader.deserialize::<CsvRow>().enumerate() {
            let row = result.map_err(|e| SourceError::Row {
                line: idx + 2,
                message: e.to_string(),
            })?;
            entries.push(TimeEntry::from(row));
        }

        tracing::debug!(path = ?self.path, rows = entries.len(), "Read punch CSV");
        Ok(entries)
    }
}

#[async_trait]
impl PunchSource for CsvPunchSource {
    fn name(&self) -> &str {
        "csv"
    }

    async fn fetch_entries(&self, _filter: &PeriodFilter) -> Result<Vec<TimeEntry>, SourceError> {
        self.read_entries()
    }
}
