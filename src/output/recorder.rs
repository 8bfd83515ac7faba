//! Ledger recording for finished collector runs

use crate::output::StatusMessage;
use crate::storage::{Ledger, RunRecord, StorageResult};
use sha2::{Digest, Sha256};

/// Timestamp format used for ledger rows
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Run identifier: hex SHA-256 of `timestamp + site + project`
pub fn run_id(timestamp: &str, site: &str, project: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(timestamp.as_bytes());
    hasher.update(site.as_bytes());
    hasher.update(project.as_bytes());
    hex::encode(hasher.finalize())
}

/// Writes one ledger row per collector run that found something
pub struct CollectionRunRecorder<L: Ledger> {
    ledger: L,
}

impl<L: Ledger> CollectionRunRecorder<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Records a run that collected `count` URLs
    ///
    /// # Returns
    ///
    /// * `Ok(Some(row))` - The row the run was written to
    /// * `Ok(None)` - `count` was zero; nothing is written
    /// * `Err(StorageError)` - The ledger could not be written
    pub fn record(
        &mut self,
        site: &str,
        project: &str,
        count: usize,
    ) -> StorageResult<Option<u32>> {
        if count == 0 {
            StatusMessage::failure("No urls to enter in the ledger").emit();
            return Ok(None);
        }

        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        let record = RunRecord {
            id: run_id(&timestamp, site, project),
            timestamp,
            project: project.to_string(),
            site: site.to_string(),
            url_count: count as u64,
        };

        let row = self.ledger.append(&record)?;
        tracing::info!("Recorded run {} for {}_{} in row {}", record.id, site, project, row);
        StatusMessage::success(format!(
            "Recorded {} URLs for {} in ledger row {}",
            count, site, row
        ))
        .emit();

        Ok(Some(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteLedger;

    #[test]
    fn test_run_id_is_deterministic() {
        let a = run_id("2026-10-19 12:00:00", "books", "catalog");
        assert_eq!(a, run_id("2026-10-19 12:00:00", "books", "catalog"));
        assert_ne!(a, run_id("2026-10-19 12:00:01", "books", "catalog"));
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_zero_count_writes_nothing() {
        let mut recorder = CollectionRunRecorder::new(SqliteLedger::open_in_memory().unwrap());

        assert_eq!(recorder.record("books", "catalog", 0).unwrap(), None);
        assert!(recorder.ledger().rows().unwrap().is_empty());
    }

    #[test]
    fn test_record_writes_one_row() {
        let mut recorder = CollectionRunRecorder::new(SqliteLedger::open_in_memory().unwrap());

        assert_eq!(recorder.record("books", "catalog", 5).unwrap(), Some(2));

        let rows = recorder.ledger().rows().unwrap();
        assert_eq!(rows.len(), 1);
        let record = &rows[0].record;
        assert_eq!(record.site, "books");
        assert_eq!(record.project, "catalog");
        assert_eq!(record.url_count, 5);
        assert_eq!(record.id, run_id(&record.timestamp, "books", "catalog"));
        assert!(chrono::NaiveDateTime::parse_from_str(&record.timestamp, TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn test_consecutive_runs_take_next_rows() {
        let mut recorder = CollectionRunRecorder::new(SqliteLedger::open_in_memory().unwrap());

        assert_eq!(recorder.record("books", "catalog", 1).unwrap(), Some(2));
        assert_eq!(recorder.record("books", "catalog", 2).unwrap(), Some(3));
    }
}
