//! Local storage layer for the work hours clock.
//!
//! Provides a string key-value store persisted with `rusqlite`, and the
//! [`LocalStore`] backing store built on top of it.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` instance can be moved between threads but cannot be shared
//! across threads without external synchronization.
//!
//! # Schema
//!
//! A single `storage` table maps TEXT keys to TEXT values. Values are opaque
//! to this layer; [`LocalStore`] keeps JSON documents and a text flag in it:
//!
//! | key              | value |
//! |------------------|-------|
//! | `timeEntries`    | JSON array of completed sessions |
//! | `currentSession` | JSON of the in-progress session |
//! | `isWorking`      | `"true"` or `"false"` |
//!
//! Timestamps inside the JSON documents are RFC 3339 text
//! (e.g., `2025-07-22T09:00:00Z`).

mod store;

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

pub use store::{CURRENT_SESSION_KEY, IS_WORKING_KEY, LocalStore, TIME_ENTRIES_KEY};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A stored value is not valid JSON of the expected shape.
    #[error("invalid value under {key}: {source}")]
    InvalidValue {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
    /// Failed to encode a value for storage.
    #[error("failed to encode {key}: {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
    /// An update named an entry that is not stored.
    #[error("no stored entry with id {0}")]
    UnknownEntry(String),
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.conn.path())
            .finish()
    }
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS storage (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Result<Option<String>, DbError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM storage WHERE key = ?",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn set(&self, key: &str, value: &str) -> Result<(), DbError> {
        self.conn.execute(
            "
            INSERT INTO storage (key, value) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            ",
            params![key, value],
        )?;
        Ok(())
    }

    /// Applies several writes atomically.
    ///
    /// `Some(value)` sets the key, `None` removes it.
    pub fn write_all(&mut self, writes: &[(&str, Option<&str>)]) -> Result<(), DbError> {
        let tx = self.conn.transaction()?;
        for (key, value) in writes {
            match value {
                Some(value) => {
                    tx.execute(
                        "
                        INSERT INTO storage (key, value) VALUES (?, ?)
                        ON CONFLICT(key) DO UPDATE SET value = excluded.value
                        ",
                        params![key, value],
                    )?;
                }
                None => {
                    tx.execute("DELETE FROM storage WHERE key = ?", params![key])?;
                }
            }
        }
        tx.commit()?;
        Ok(())
    }
}
