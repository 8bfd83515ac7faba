//! Storage module for everything the stages persist
//!
//! This module handles:
//! - The per-pair URL list shared by the collector and fetcher
//! - The content-addressed page cache
//! - The SQLite run ledger and its schema

mod cache;
mod schema;
mod sqlite;
mod traits;
mod url_list;

pub use cache::{url_hash, PageCache};
pub use sqlite::SqliteLedger;
pub use traits::{Ledger, StorageError, StorageResult, LEDGER_FIRST_ROW};
pub use url_list::UrlListStore;

use serde::Serialize;

/// One collector run as written to the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunRecord {
    /// Hex SHA-256 of timestamp, site and project concatenated
    pub id: String,
    /// Local time, `%Y-%m-%d %H:%M:%S`
    pub timestamp: String,
    pub project: String,
    pub site: String,
    pub url_count: u64,
}

/// A ledger entry together with its row number
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerRow {
    pub row: u32,
    #[serde(flatten)]
    pub record: RunRecord,
}
