//! Storage layer for certrack.
//!
//! Records are persisted as a single serialized string under a well-known key
//! in a key-value [`Slot`]. The production backend is [`SqliteSlot`]; tests
//! use [`MemorySlot`].

pub mod memory;
pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};

pub use memory::MemorySlot;

/// A key-value store holding whole serialized values.
///
/// Writes replace the previous value unconditionally.
pub trait Slot {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

/// `SQLite`-backed slot storage.
#[derive(Debug)]
pub struct SqliteSlot {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl SqliteSlot {
    /// Open or create a slot database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
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

        info!("Database opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory slot database for testing.
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
}

impl Slot for SqliteSlot {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM slots WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        debug!(key, found = value.is_some(), "Read slot");
        Ok(value)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            r"
            INSERT INTO slots (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            params![key, value],
        )?;
        debug!(key, bytes = value.len(), "Wrote slot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_slot() -> SqliteSlot {
        SqliteSlot::open_in_memory().expect("failed to create test slot")
    }

    #[test]
    fn test_open_in_memory() {
        let slot = create_test_slot();
        assert_eq!(slot.path(), Path::new(":memory:"));
    }

    #[test]
    fn test_read_missing_key() {
        let slot = create_test_slot();
        assert!(slot.read("certificates").unwrap().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let mut slot = create_test_slot();
        slot.write("certificates", "[]").unwrap();
        assert_eq!(slot.read("certificates").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_write_overwrites() {
        let mut slot = create_test_slot();
        slot.write("certificates", "[1]").unwrap();
        slot.write("certificates", "[2]").unwrap();

        assert_eq!(slot.read("certificates").unwrap().as_deref(), Some("[2]"));
    }

    #[test]
    fn test_keys_are_independent() {
        let mut slot = create_test_slot();
        slot.write("a", "1").unwrap();
        slot.write("b", "2").unwrap();

        assert_eq!(slot.read("a").unwrap().as_deref(), Some("1"));
        assert_eq!(slot.read("b").unwrap().as_deref(), Some("2"));
        assert!(slot.read("c").unwrap().is_none());
    }

    #[test]
    fn test_unicode_value() {
        let mut slot = create_test_slot();
        let value = r#"[{"name":"情報セキュリティ 🔐"}]"#;
        slot.write("certificates", value).unwrap();
        assert_eq!(slot.read("certificates").unwrap().as_deref(), Some(value));
    }

    #[test]
    fn test_open_file_based_persists() {
        let db_path =
            std::env::temp_dir().join(format!("certrack_test_{}.db", std::process::id()));

        {
            let mut slot = SqliteSlot::open(&db_path).unwrap();
            slot.write("certificates", "[]").unwrap();
            assert_eq!(slot.path(), db_path);
        }

        let slot = SqliteSlot::open(&db_path).unwrap();
        assert_eq!(slot.read("certificates").unwrap().as_deref(), Some("[]"));

        drop(slot);
        let _ = std::fs::remove_file(&db_path);
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let root = std::env::temp_dir().join(format!("certrack_test_dirs_{}", std::process::id()));
        let nested_path = root.join("nested/db.sqlite");
        let _ = std::fs::remove_dir_all(&root);

        let slot = SqliteSlot::open(&nested_path).unwrap();
        assert!(nested_path.exists());

        drop(slot);
        let _ = std::fs::remove_dir_all(&root);
    }
}
