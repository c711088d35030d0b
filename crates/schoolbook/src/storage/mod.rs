//! Storage layer for schoolbook.
//!
//! This module provides `SQLite`-backed named slots. A slot is a single
//! key-value entry that is read whole and overwritten whole; the school list
//! is mirrored into one of them.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::error::{Error, Result};
use crate::slot::Slot;

/// `SQLite` database holding named slots.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        debug!("Database ready at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Open the database at `path` only if it already exists.
    ///
    /// Returns `None` without touching the file system when there is no
    /// database yet.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing database cannot be opened.
    pub fn open_existing(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No database at {}", path.display());
            return Ok(None);
        }
        Self::open(path).map(Some)
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn read(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM slots WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Store `value` under `key`, replacing whatever was there.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn write(&self, key: &str, value: &str) -> Result<()> {
        let updated_at = Utc::now().to_rfc3339();
        self.conn.execute(
            r"
            INSERT INTO slots (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            params![key, value, updated_at],
        )?;
        debug!("Wrote {} bytes to slot '{}'", value.len(), key);
        Ok(())
    }

    /// Remove the slot stored under `key`.
    ///
    /// Returns `true` if a slot was removed, `false` if there was none.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn remove(&self, key: &str) -> Result<bool> {
        let affected = self.conn.execute("DELETE FROM slots WHERE key = ?1", [key])?;
        Ok(affected > 0)
    }

    /// Describe the slot stored under `key` without reading its value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn info(&self, key: &str) -> Result<Option<SlotInfo>> {
        let row: Option<(i64, String)> = self
            .conn
            .query_row(
                "SELECT length(CAST(value AS BLOB)), updated_at FROM slots WHERE key = ?1",
                [key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        Ok(row.map(|(bytes, updated_at)| SlotInfo {
            key: key.to_string(),
            value_bytes: u64::try_from(bytes).unwrap_or(0),
            updated_at: DateTime::parse_from_rfc3339(&updated_at)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
        }))
    }

    /// Size of the database file in bytes (0 for in-memory databases).
    #[must_use]
    pub fn db_size_bytes(&self) -> u64 {
        if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        }
    }
}

/// Metadata about a stored slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotInfo {
    /// Key of the slot.
    pub key: String,
    /// Size of the stored value in bytes.
    pub value_bytes: u64,
    /// When the slot was last written, if the timestamp is readable.
    pub updated_at: Option<DateTime<Utc>>,
}

/// A [`Slot`] backed by one key of a [`Storage`] database.
#[derive(Debug)]
pub struct SqliteSlot {
    storage: Storage,
    key: String,
}

impl SqliteSlot {
    /// Bind `key` in `storage` as a slot.
    #[must_use]
    pub fn new(storage: Storage, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }
}

impl Slot for SqliteSlot {
    fn key(&self) -> &str {
        &self.key
    }

    fn read(&self) -> Result<Option<String>> {
        self.storage.read(&self.key)
    }

    fn write(&mut self, value: &str) -> Result<()> {
        self.storage.write(&self.key, value)
    }

    fn clear(&mut self) -> Result<()> {
        self.storage.remove(&self.key).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_storage() -> Storage {
        Storage::open_in_memory().expect("failed to create test storage")
    }

    #[test]
    fn test_open_in_memory() {
        let storage = create_test_storage();
        assert_eq!(storage.path(), Path::new(":memory:"));
        assert_eq!(storage.db_size_bytes(), 0);
    }

    #[test]
    fn test_read_missing_slot() {
        let storage = create_test_storage();
        assert_eq!(storage.read("schools").unwrap(), None);
        assert_eq!(storage.info("schools").unwrap(), None);
    }

    #[test]
    fn test_write_then_read() {
        let storage = create_test_storage();
        storage.write("schools", "[]").unwrap();
        assert_eq!(storage.read("schools").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_write_overwrites_whole_value() {
        let storage = create_test_storage();
        storage.write("schools", r#"[{"name":"a"}]"#).unwrap();
        storage.write("schools", "[]").unwrap();
        assert_eq!(storage.read("schools").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_slots_are_independent() {
        let storage = create_test_storage();
        storage.write("schools", "[1]").unwrap();
        storage.write("other", "[2]").unwrap();

        assert_eq!(storage.read("schools").unwrap().as_deref(), Some("[1]"));
        assert_eq!(storage.read("other").unwrap().as_deref(), Some("[2]"));
    }

    #[test]
    fn test_remove() {
        let storage = create_test_storage();
        storage.write("schools", "[]").unwrap();

        assert!(storage.remove("schools").unwrap());
        assert!(!storage.remove("schools").unwrap());
        assert_eq!(storage.read("schools").unwrap(), None);
    }

    #[test]
    fn test_info() {
        let storage = create_test_storage();
        storage.write("schools", "[1,2,3]").unwrap();

        let info = storage.info("schools").unwrap().unwrap();
        assert_eq!(info.key, "schools");
        assert_eq!(info.value_bytes, 7);
        assert!(info.updated_at.is_some());
    }

    #[test]
    fn test_sqlite_slot() {
        let mut slot = SqliteSlot::new(create_test_storage(), "schools");
        assert_eq!(slot.key(), "schools");
        assert_eq!(slot.read().unwrap(), None);

        slot.write("[]").unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("[]"));

        slot.clear().unwrap();
        assert_eq!(slot.read().unwrap(), None);
    }

    #[test]
    fn test_open_creates_parent_dirs_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("schools.db");

        {
            let storage = Storage::open(&path).unwrap();
            storage.write("schools", "[]").unwrap();
        }

        let storage = Storage::open(&path).unwrap();
        assert_eq!(storage.read("schools").unwrap().as_deref(), Some("[]"));
        assert!(storage.db_size_bytes() > 0);
    }

    #[test]
    fn test_open_existing_does_not_create() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("schools.db");

        assert!(Storage::open_existing(&path).unwrap().is_none());
        assert!(!path.exists());
        assert!(!dir.path().join("nested").exists());

        Storage::open(&path).unwrap().write("schools", "[]").unwrap();
        let storage = Storage::open_existing(&path).unwrap().unwrap();
        assert_eq!(storage.read("schools").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_open_fails_on_directory_path() {
        let dir = tempfile::tempdir().unwrap();
        let result = Storage::open(dir.path());
        assert!(result.is_err());
    }
}
