//! SQLite-backed key-value storage.
//!
//! The journal lives as one JSON value under [`STORE_KEY`] in the `kv`
//! table, the local-storage equivalent for a desktop install.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use super::data_dir;
use crate::error::{CoreError, DatabaseError, Result};
use crate::journal::{JournalBackend, STORE_KEY};

/// Database file name inside the data directory.
pub const DB_FILE: &str = "lazyriver.db";

/// SQLite database holding the application's key-value entries.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data dir>/lazyriver.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory or database cannot be opened.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join(DB_FILE);
        Self::open_at(&path)
    }

    /// Open (or create) a database file at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a key. Removing a missing key is not an error.
    pub fn kv_delete(&self, key: &str) -> Result<(), DatabaseError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

impl JournalBackend for Database {
    fn load(&self) -> Result<Option<String>> {
        self.kv_get(STORE_KEY).map_err(CoreError::from)
    }

    fn save(&self, document: &str) -> Result<()> {
        self.kv_set(STORE_KEY, document).map_err(CoreError::from)
    }

    fn clear(&self) -> Result<()> {
        self.kv_delete(STORE_KEY).map_err(CoreError::from)
    }
}
