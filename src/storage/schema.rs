//! Ledger schema definitions
//!
//! The ledger mirrors a count sheet: one row per collector run with the
//! columns `id, timestamp, project, site, url_count`.

/// SQL schema for the ledger database
pub const SCHEMA_SQL: &str = r#"
-- One row per collector run
CREATE TABLE IF NOT EXISTS collector_count (
    row_num INTEGER PRIMARY KEY,
    id TEXT NOT NULL,
    timestamp TEXT NOT NULL,
    project TEXT NOT NULL,
    site TEXT NOT NULL,
    url_count INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_collector_count_site ON collector_count(site, project);
"#;

/// Initializes the ledger schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        assert!(initialize_schema(&conn).is_ok());
    }

    #[test]
    fn test_table_exists_after_init() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='collector_count'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }
}
