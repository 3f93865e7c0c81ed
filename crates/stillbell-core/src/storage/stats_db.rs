//! SQLite-backed append-only statistics store.
//!
//! Each decision entry is stored as its serde JSON form plus a kind tag
//! and RFC3339 timestamp for querying. Entries are never updated or
//! deleted here; truncation is left to the user.

use std::path::Path;

use rusqlite::{params, Connection};

use super::data_dir;
use crate::error::{Result, StorageError};
use crate::statistics::{StatisticsEntry, StatisticsSink};

/// Append-only statistics database.
pub struct StatsDb {
    conn: Connection,
}

impl StatsDb {
    /// Open the database at `~/.config/stillbell/stillbell.db`.
    ///
    /// Creates the file and schema if they don't exist.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("stillbell.db");
        Self::open_at(&path)
    }

    /// Open at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS statistics (
                    id          INTEGER PRIMARY KEY AUTOINCREMENT,
                    kind        TEXT NOT NULL,
                    recorded_at TEXT NOT NULL,
                    entry       TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_statistics_recorded_at
                    ON statistics(recorded_at);
                CREATE INDEX IF NOT EXISTS idx_statistics_kind
                    ON statistics(kind);",
            )
            .map_err(StorageError::from)?;
        Ok(())
    }

    /// Append one entry. Returns the row id.
    pub fn append_entry(&self, entry: &StatisticsEntry) -> Result<i64> {
        let json = serde_json::to_string(entry)?;
        self.conn
            .execute(
                "INSERT INTO statistics (kind, recorded_at, entry) VALUES (?1, ?2, ?3)",
                params![entry.kind(), entry.at().to_rfc3339(), json],
            )
            .map_err(StorageError::from)?;
        Ok(self.conn.last_insert_rowid())
    }

    /// The most recent `limit` entries, oldest first.
    pub fn recent(&self, limit: u32) -> Result<Vec<StatisticsEntry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT entry FROM statistics ORDER BY id DESC LIMIT ?1")
            .map_err(StorageError::from)?;
        let rows = stmt
            .query_map(params![limit], |row| row.get::<_, String>(0))
            .map_err(StorageError::from)?;

        let mut entries = Vec::new();
        for row in rows {
            let json = row.map_err(StorageError::from)?;
            entries.push(serde_json::from_str(&json)?);
        }
        entries.reverse();
        Ok(entries)
    }

    pub fn count(&self) -> Result<u64> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM statistics", [], |row| row.get(0))
            .map_err(StorageError::from)?;
        Ok(count)
    }
}

impl StatisticsSink for StatsDb {
    fn append(&mut self, entry: StatisticsEntry) -> Result<()> {
        self.append_entry(&entry)?;
        Ok(())
    }
}
