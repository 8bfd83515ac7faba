//! SQLite ledger implementation
//!
//! This module provides a SQLite-based implementation of the Ledger trait.
//! Each run does a scan-then-insert with no application-level lock, so two
//! collectors writing to the same ledger at once can race for a row; the
//! loser gets [`StorageError::RowTaken`].

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Ledger, StorageError, StorageResult, LEDGER_FIRST_ROW};
use crate::storage::{LedgerRow, RunRecord};
use rusqlite::{params, Connection};
use std::path::Path;

/// SQLite-backed run ledger
pub struct SqliteLedger {
    conn: Connection,
}

impl SqliteLedger {
    /// Opens (creating if needed) the ledger at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteLedger)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
        ",
        )?;
        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory ledger (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl Ledger for SqliteLedger {
    fn next_free_row(&self) -> StorageResult<u32> {
        let mut stmt = self.conn.prepare(
            "SELECT row_num FROM collector_count WHERE row_num >= ?1 ORDER BY row_num ASC",
        )?;
        let taken = stmt.query_map(params![LEDGER_FIRST_ROW], |row| row.get::<_, u32>(0))?;

        let mut candidate = LEDGER_FIRST_ROW;
        for row_num in taken {
            if row_num? != candidate {
                break;
            }
            candidate += 1;
        }

        Ok(candidate)
    }

    fn write_row(&mut self, row: u32, record: &RunRecord) -> StorageResult<()> {
        let result = self.conn.execute(
            "INSERT INTO collector_count (row_num, id, timestamp, project, site, url_count)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                row,
                record.id,
                record.timestamp,
                record.project,
                record.site,
                record.url_count
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(StorageError::RowTaken(row))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn rows(&self) -> StorageResult<Vec<LedgerRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT row_num, id, timestamp, project, site, url_count
             FROM collector_count ORDER BY row_num ASC",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok(LedgerRow {
                    row: row.get(0)?,
                    record: RunRecord {
                        id: row.get(1)?,
                        timestamp: row.get(2)?,
                        project: row.get(3)?,
                        site: row.get(4)?,
                        url_count: row.get(5)?,
                    },
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}
