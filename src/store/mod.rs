// Miner Stats - Free and Open Source Software Statement
//
// This project, miner-stats, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/store/mod.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file declares the statistics store: a single SQLite connection opened
// at startup and shared by the reference synchronizer and the measurement
// writer. Every logical operation runs in its own short transaction.
//
// Tree Location:
// - src/store/mod.rs (store handle and schema bootstrap)
// - Submodules: schema, reference, statistics

pub mod reference;
pub mod schema;
pub mod statistics;

use crate::error::StatsError;
use crate::Result;
use log::{debug, info};
use rusqlite::Connection;
use std::path::Path;

const LOG_TARGET: &str = "miner_stats::store";

/// Handle on the statistics database
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the database file and make sure the schema exists
    pub fn open(path: &str) -> Result<Self> {
        let conn = if path == ":memory:" {
            Connection::open_in_memory()
        } else {
            Connection::open(Path::new(path))
        }
        .map_err(|e| StatsError::StoreUnreachable {
            path: path.to_string(),
            source: e,
        })?;

        let store = Self { conn };
        store.bootstrap().map_err(|e| StatsError::StoreUnreachable {
            path: path.to_string(),
            source: e,
        })?;
        info!(target: LOG_TARGET, "📂 Statistics store ready at {}", path);
        Ok(store)
    }

    /// In-memory store, mostly for tests
    pub fn open_in_memory() -> Result<Self> {
        Self::open(":memory:")
    }

    fn bootstrap(&self) -> rusqlite::Result<()> {
        self.conn.pragma_update(None, "foreign_keys", true)?;
        self.conn.execute_batch(schema::SCHEMA)?;
        debug!(target: LOG_TARGET, "Schema verified");
        Ok(())
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_creates_schema_on_disk() {
        let dir = tempdir().expect("Failed to create temporary directory");
        let path = dir.path().join("stats.db");
        let path = path.to_str().unwrap();

        let store = Store::open(path).expect("store should open");
        let tables: i64 = store
            .conn()
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master \
                 WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 7);
        drop(store);

        // Re-opening an existing database is a no-op for the schema
        Store::open(path).expect("store should reopen");
    }

    #[test]
    fn test_unreachable_path() {
        let result = Store::open("/non/existent/directory/stats.db");
        assert!(matches!(result, Err(StatsError::StoreUnreachable { .. })));
    }
}

// Changelog:
// - v1.0.0 (2025-07-02): Initial SQLite-backed statistics store.
