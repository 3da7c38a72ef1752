//! `SQLite`-backed key-value store

use crate::error::Result;
use crate::storage::KeyValueStore;
use rusqlite::{params, OptionalExtension};
use std::path::Path;

use super::Database;

/// `SQLite` implementation of `KeyValueStore`
///
/// Each write is its own transaction, so a failed write rolls back and the
/// previous value stays readable.
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Open (or create) a store backed by the database file at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            db: Database::open(path)?,
        })
    }

    /// Open an in-memory store
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            db: Database::open_in_memory()?,
        })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = self
            .db
            .connection()
            .query_row("SELECT value FROM kv WHERE key = ?", params![key], |row| {
                row.get(0)
            })
            .optional()?;

        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let now = chrono::Utc::now().timestamp_millis();
        let tx = self.db.connection_mut().transaction()?;
        tx.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.db
            .connection()
            .execute("DELETE FROM kv WHERE key = ?", params![key])?;
        Ok(())
    }
}
