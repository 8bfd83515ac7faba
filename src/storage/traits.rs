//! Storage traits and error types
//!
//! This module defines the ledger interface and the errors shared by every
//! storage backend.

use crate::storage::{LedgerRow, RunRecord};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("URL list not found: {}", .0.display())]
    UrlListNotFound(PathBuf),

    #[error("Ledger row {0} is already taken")]
    RowTaken(u32),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// First data row of the ledger; row 1 is the header
pub const LEDGER_FIRST_ROW: u32 = 2;

/// Persistent run history
///
/// Rows are numbered like a sheet: data starts at [`LEDGER_FIRST_ROW`]. A new
/// run goes into the first row without an entry, found by scanning down from
/// the first data row, so existing rows are never overwritten and empty gaps
/// are reused.
pub trait Ledger {
    /// Finds the first empty row at or after [`LEDGER_FIRST_ROW`]
    fn next_free_row(&self) -> StorageResult<u32>;

    /// Writes `record` into `row`, failing if the row is taken
    fn write_row(&mut self, row: u32, record: &RunRecord) -> StorageResult<()>;

    /// All rows in row order
    fn rows(&self) -> StorageResult<Vec<LedgerRow>>;

    /// Appends `record` at the next free row and returns the row number
    fn append(&mut self, record: &RunRecord) -> StorageResult<u32> {
        let row = self.next_free_row()?;
        self.write_row(row, record)?;
        Ok(row)
    }

    /// Rows recorded for one (site, project) pair
    fn rows_for(&self, site: &str, project: &str) -> StorageResult<Vec<LedgerRow>> {
        Ok(self
            .rows()?
            .into_iter()
            .filter(|row| row.record.site == site && row.record.project == project)
            .collect())
    }
}
