//! Run history drawn from the ledger

use crate::storage::{Ledger, LedgerRow, StorageResult};

/// Collection history for one (site, project) pair
#[derive(Debug, Clone)]
pub struct RunHistory {
    pub site: String,
    pub project: String,
    pub rows: Vec<LedgerRow>,
}

impl RunHistory {
    /// Total URLs over every recorded run
    pub fn total_urls(&self) -> u64 {
        self.rows.iter().map(|row| row.record.url_count).sum()
    }

    pub fn latest(&self) -> Option<&LedgerRow> {
        self.rows.last()
    }
}

/// Loads the history for a pair from `ledger`
pub fn load_history(ledger: &dyn Ledger, site: &str, project: &str) -> StorageResult<RunHistory> {
    Ok(RunHistory {
        site: site.to_string(),
        project: project.to_string(),
        rows: ledger.rows_for(site, project)?,
    })
}

/// Prints the history to stdout
pub fn print_history(history: &RunHistory) {
    println!(
        "=== Collector Runs: {}_{} ===\n",
        history.site, history.project
    );

    if history.rows.is_empty() {
        println!("No runs recorded.");
        return;
    }

    println!("{:>5}  {:<19}  {:>9}  id", "row", "timestamp", "urls");
    for row in &history.rows {
        println!(
            "{:>5}  {:<19}  {:>9}  {}",
            row.row, row.record.timestamp, row.record.url_count, row.record.id
        );
    }
    println!();

    println!("Runs: {}", history.rows.len());
    println!("Total URLs collected: {}", history.total_urls());
    if let Some(latest) = history.latest() {
        println!(
            "Latest run: {} ({} URLs)",
            latest.record.timestamp, latest.record.url_count
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{RunRecord, SqliteLedger};

    fn record(site: &str, count: u64) -> RunRecord {
        RunRecord {
            id: format!("{}-{}", site, count),
            timestamp: "2026-10-19 12:00:00".to_string(),
            project: "catalog".to_string(),
            site: site.to_string(),
            url_count: count,
        }
    }

    #[test]
    fn test_history_filters_and_totals() {
        let mut ledger = SqliteLedger::open_in_memory().unwrap();
        ledger.append(&record("books", 3)).unwrap();
        ledger.append(&record("news", 10)).unwrap();
        ledger.append(&record("books", 4)).unwrap();

        let history = load_history(&ledger, "books", "catalog").unwrap();
        assert_eq!(history.rows.len(), 2);
        assert_eq!(history.total_urls(), 7);
        assert_eq!(history.latest().unwrap().row, 4);
    }

    #[test]
    fn test_empty_history() {
        let ledger = SqliteLedger::open_in_memory().unwrap();
        let history = load_history(&ledger, "books", "catalog").unwrap();

        assert_eq!(history.total_urls(), 0);
        assert!(history.latest().is_none());
    }
}
