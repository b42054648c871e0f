//! Test utilities for database setup.
//!
//! Reuses the authoritative schema initialization so tests never duplicate
//! table definitions.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::db::{self, SqliteStore};

/// Test environment with a migrated SQLite database in a temporary directory.
///
/// The directory (and database file) is removed when the environment drops.
pub struct TestEnv {
    /// Temporary directory (kept alive for database file persistence)
    pub temp: TempDir,
    /// Key-value store over the shared connection
    pub store: SqliteStore,
}

impl TestEnv {
    pub fn new() -> rusqlite::Result<Self> {
        let temp =
            TempDir::new().map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        let pool = db::init_db(&temp.path().join("devlingo.db"))?;
        let store = SqliteStore::new(pool);

        Ok(Self { temp, store })
    }

    /// Get the temporary directory path for creating test files.
    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn db_path(&self) -> PathBuf {
        self.path().join("devlingo.db")
    }
}

/// In-memory [`db::KeyValueStore`] whose reads and writes can be made to fail.
#[derive(Default)]
pub struct MemoryStore {
    values: std::sync::Mutex<std::collections::HashMap<String, String>>,
    pub fail_reads: std::sync::atomic::AtomicBool,
    pub fail_writes: std::sync::atomic::AtomicBool,
}

impl MemoryStore {
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::default();
        store
            .values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        store
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }
}

impl db::KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, db::StoreError> {
        if self.fail_reads.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(db::StoreError::Lock);
        }
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), db::StoreError> {
        if self.fail_writes.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(db::StoreError::Lock);
        }
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
