//! Byte-oriented key-value persistence.
//!
//! Every durable record in the app lives under one of four string keys in
//! an opaque byte store. The production adapter is a single-table SQLite
//! database; [`MemoryStore`] backs tests and embedders that bring their
//! own persistence.
//!
//! Records are serde_json documents. Absence and decode failure are the
//! same thing to callers: the record's `Default`. Saves are best-effort -
//! a failed write is logged and dropped, never retried and never surfaced
//! to the state machines.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StoreError};

/// The four record keys of the core. Each is independently absent on
/// first run.
pub mod keys {
    pub const PREFERENCES: &str = "preferences";
    pub const GAME_STATE: &str = "game-state";
    pub const TASKS: &str = "tasks";
    pub const USER_STATS: &str = "user-stats";

    pub const ALL: [&str; 4] = [PREFERENCES, GAME_STATE, TASKS, USER_STATS];
}

/// Opaque byte store keyed by string identifiers.
pub trait Store: Send + Sync {
    fn save(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Returns `~/.config/chromodoro[-dev]/` based on CHROMODORO_ENV.
///
/// Set CHROMODORO_ENV=dev to use the development data directory, or
/// CHROMODORO_DATA_DIR to override the location outright (tests do).
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf> {
    let dir = if let Ok(dir) = std::env::var("CHROMODORO_DATA_DIR") {
        PathBuf::from(dir)
    } else {
        let base_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config");
        let env = std::env::var("CHROMODORO_ENV").unwrap_or_else(|_| "production".to_string());
        if env == "dev" {
            base_dir.join("chromodoro-dev")
        } else {
            base_dir.join("chromodoro")
        }
    };
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// SQLite-backed store: one `kv` table, value as BLOB.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open the store at `<data_dir>/chromodoro.db`, creating the schema
    /// if needed.
    ///
    /// # Errors
    /// Returns an error if the data directory or database cannot be
    /// opened.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("chromodoro.db");
        Self::open_at(&path)
    }

    /// Open the store at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(StoreError::from)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.lock().execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value BLOB NOT NULL
            );",
        )?;
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        match self.conn.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Store for SqliteStore {
    fn save(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        self.lock().execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, bytes],
        )?;
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let conn = self.lock();
        let mut stmt = conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.lock()
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

/// In-memory store for tests and embedders.
#[derive(Default)]
pub struct MemoryStore {
    map: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn save(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        self.lock().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.lock().get(key).cloned())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.lock().remove(key);
        Ok(())
    }
}

impl MemoryStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        match self.map.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Load a record, treating absence and corrupt bytes as the default.
pub fn load_record<T: DeserializeOwned + Default>(store: &dyn Store, key: &str) -> T {
    let bytes = match store.load(key) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return T::default(),
        Err(e) => {
            tracing::warn!(key, error = %e, "record load failed, using defaults");
            return T::default();
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!(key, error = %e, "record decode failed, using defaults");
            T::default()
        }
    }
}

/// Persist a record, best-effort. A failed encode or write is logged
/// and dropped.
pub fn save_record<T: Serialize>(store: &dyn Store, key: &str, record: &T) {
    let bytes = match serde_json::to_vec(record) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(key, error = %e, "record encode failed, write skipped");
            return;
        }
    };
    if let Err(e) = store.save(key, &bytes) {
        tracing::warn!(key, error = %e, "record write failed");
    }
}

/// Delete the four core records. In-memory state is the caller's to
/// reset.
///
/// # Errors
/// Returns the first delete failure.
pub fn wipe_all(store: &dyn Store) -> Result<(), StoreError> {
    for key in keys::ALL {
        store.delete(key)?;
    }
    Ok(())
}
