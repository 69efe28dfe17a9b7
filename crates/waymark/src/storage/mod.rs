//! Storage layer for waymark.
//!
//! This module provides `SQLite`-backed persistence for the activity list.
//! The whole ordered list is the unit of persistence: it is serialized to a
//! single JSON array held under one named slot, mirroring a key-value store
//! with exactly one interesting key.

pub mod schema;

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::activity::Activity;
use crate::error::{Error, Result};

/// The slot key under which the activity list is persisted.
pub const SLOT_KEY: &str = "activities";

/// The current schema version.
const SCHEMA_VERSION: i32 = 1;

/// Storage engine for the activity list.
///
/// Reading a missing or malformed slot yields an empty list, never an
/// error; writing always replaces the full slot content.
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
    /// Returns an error if the database cannot be opened or schema
    /// initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::StorageOpen {
            path: path.clone(),
            source,
        })?;

        // WAL mode for better concurrent read performance
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::StorageOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        initialize_schema(&conn)?;

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

    /// Persist the full activity list, replacing any previous slot content.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the database write fails.
    pub fn save(&self, activities: &[Activity]) -> Result<()> {
        let blob = serde_json::to_string(activities)?;
        self.conn.execute(
            r"
            INSERT INTO slots (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = datetime('now')
            ",
            (SLOT_KEY, &blob),
        )?;
        debug!("Persisted {} activities", activities.len());
        Ok(())
    }

    /// Load the persisted activity list.
    ///
    /// A missing slot or malformed slot content is treated as "no data"
    /// and yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error only if the database read itself fails.
    pub fn load(&self) -> Result<Vec<Activity>> {
        let blob: Option<String> = self
            .conn
            .query_row("SELECT value FROM slots WHERE key = ?1", [SLOT_KEY], |row| {
                row.get(0)
            })
            .optional()?;

        let Some(blob) = blob else {
            debug!("No persisted activities");
            return Ok(Vec::new());
        };

        match serde_json::from_str(&blob) {
            Ok(activities) => Ok(activities),
            Err(err) => {
                warn!("Ignoring malformed slot content: {err}");
                Ok(Vec::new())
            }
        }
    }

    /// Remove the slot entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails.
    pub fn clear(&self) -> Result<()> {
        self.conn
            .execute("DELETE FROM slots WHERE key = ?1", [SLOT_KEY])?;
        debug!("Cleared activity slot");
        Ok(())
    }

    /// Read the raw slot content, if any. Exposed for diagnostics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database read fails.
    pub fn raw_slot(&self) -> Result<Option<String>> {
        let blob = self
            .conn
            .query_row("SELECT value FROM slots WHERE key = ?1", [SLOT_KEY], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(blob)
    }

    #[cfg(test)]
    fn write_raw_slot(&self, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO slots (key, value) VALUES (?1, ?2)",
            (SLOT_KEY, value),
        )?;
        Ok(())
    }
}

/// Initialize the database schema and stamp the schema version.
fn initialize_schema(conn: &Connection) -> Result<()> {
    for statement in schema::SCHEMA_STATEMENTS {
        conn.execute(statement, [])?;
    }
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?1)",
        [SCHEMA_VERSION.to_string()],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{ActivityDetails, Coords};
    use chrono::{TimeZone, Utc};

    fn sample(details: ActivityDetails) -> Activity {
        Activity::new_at(
            details,
            Coords::new(10.0, 20.0),
            30.0,
            15.0,
            Utc.with_ymd_and_hms(2024, 3, 5, 8, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_open_in_memory() {
        let storage = Storage::open_in_memory().unwrap();
        assert_eq!(storage.path(), Path::new(":memory:"));
    }

    #[test]
    fn test_load_empty() {
        let storage = Storage::open_in_memory().unwrap();
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let storage = Storage::open_in_memory().unwrap();
        let activities = vec![
            sample(ActivityDetails::Eating { meals: 2 }),
            sample(ActivityDetails::Shopping { items: 5 }),
        ];

        storage.save(&activities).unwrap();
        let loaded = storage.load().unwrap();

        assert_eq!(loaded, activities);
    }

    #[test]
    fn test_save_replaces_previous_content() {
        let storage = Storage::open_in_memory().unwrap();
        storage
            .save(&[sample(ActivityDetails::Eating { meals: 1 })])
            .unwrap();
        storage.save(&[]).unwrap();

        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_slot_is_empty_list() {
        let storage = Storage::open_in_memory().unwrap();
        storage.write_raw_slot("{not valid json").unwrap();

        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn test_clear_removes_slot() {
        let storage = Storage::open_in_memory().unwrap();
        storage
            .save(&[sample(ActivityDetails::Shopping { items: 3 })])
            .unwrap();
        storage.clear().unwrap();

        assert!(storage.raw_slot().unwrap().is_none());
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn test_clear_twice_is_fine() {
        let storage = Storage::open_in_memory().unwrap();
        storage.clear().unwrap();
        storage.clear().unwrap();
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn test_slot_blob_is_json_array() {
        let storage = Storage::open_in_memory().unwrap();
        storage
            .save(&[sample(ActivityDetails::Eating { meals: 2 })])
            .unwrap();

        let blob = storage.raw_slot().unwrap().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&blob).unwrap();
        let arr = parsed.as_array().unwrap();
        assert_eq!(arr.len(), 1);
        assert_eq!(arr[0]["type"], "eating");
        assert_eq!(arr[0]["meals"], 2);
        assert_eq!(arr[0]["description"], "Eating on March 5");
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = std::env::temp_dir().join("waymark-test-storage");
        let path = dir.join("nested").join("waymark.db");
        let _ = std::fs::remove_dir_all(&dir);

        let storage = Storage::open(&path).unwrap();
        assert!(path.exists());
        drop(storage);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
