pub mod name_store;
pub mod winner_store;

pub use name_store::{LoadedNames, NameStore, SaveReceipt};
pub use winner_store::{AppendReceipt, LoadedWinners, ResetReceipt, WinnerStore};

use crate::config::{StorageBackend, StorageConfig};
use crate::error::{Result, WedlotError};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub const NAMES_KEY: &str = "wedding-lottery-names";
pub const WINNERS_KEY: &str = "wedding-lottery-winners";

pub const DB_FILE: &str = "wedlot.db";

/// Minimal key-value contract the stores are written against.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Returns whether the key existed.
    async fn delete(&self, key: &str) -> Result<bool>;

    fn backend(&self) -> &'static str;
}

/// SQLite-backed store. Every call locks the connection for its own
/// duration only and runs on the blocking pool under a timeout.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    timeout: Duration,
}

impl SqliteStore {
    pub async fn new(db_path: &Path, timeout: Duration) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                WedlotError::storage_unavailable(format!("Failed to create directory: {}", e))
            })?;
        }

        let conn = Connection::open(db_path)?;
        Self::with_connection(conn, timeout)
    }

    /// Private in-process database, mostly useful in tests.
    pub fn open_in_memory(timeout: Duration) -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?, timeout)
    }

    fn with_connection(conn: Connection, timeout: Duration) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            [],
        )?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            timeout,
        })
    }

    async fn run<T, F>(&self, op: &'static str, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let task = tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            f(&guard)
        });

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(WedlotError::internal(format!("Storage task failed: {}", e))),
            Err(_) => Err(WedlotError::storage_unavailable(format!(
                "{} timed out after {:?}",
                op, self.timeout
            ))),
        }
    }
}

#[async_trait]
impl KvStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.run("get", move |conn| {
            let value = conn
                .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                    row.get(0)
                })
                .optional()?;
            Ok(value)
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let key = key.to_string();
        let value = value.to_string();
        self.run("set", move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)",
                params![key, value, Utc::now().timestamp()],
            )?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let key = key.to_string();
        self.run("delete", move |conn| {
            let removed = conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
            Ok(removed > 0)
        })
        .await
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}

/// Process-local store; contents are lost on exit.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.entries.write().remove(key).is_some())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Opens the configured backend, dropping to an in-memory store when the
/// SQLite file cannot be opened.
pub async fn open_store(config: &StorageConfig, data_dir: &Path) -> Arc<dyn KvStore> {
    match config.backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::Sqlite => {
            let db_path = data_dir.join(DB_FILE);
            match SqliteStore::new(&db_path, config.timeout()).await {
                Ok(store) => {
                    tracing::debug!("Opened SQLite store at {}", db_path.display());
                    Arc::new(store)
                }
                Err(e) => {
                    tracing::warn!(
                        "Could not open {} ({}); falling back to in-memory storage",
                        db_path.display(),
                        e
                    );
                    Arc::new(MemoryStore::new())
                }
            }
        }
    }
}

/// Reads a JSON string list. A blob that is not an array reads as absent;
/// non-string entries are skipped.
pub(crate) async fn read_list(store: &dyn KvStore, key: &str) -> Result<Option<Vec<String>>> {
    let Some(blob) = store.get(key).await? else {
        return Ok(None);
    };

    match serde_json::from_str::<serde_json::Value>(&blob)? {
        serde_json::Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
        )),
        other => {
            tracing::warn!("Ignoring non-list value under '{}': {}", key, other);
            Ok(None)
        }
    }
}

pub(crate) async fn write_list(store: &dyn KvStore, key: &str, items: &[String]) -> Result<()> {
    store.set(key, &serde_json::to_string(items)?).await
}

/// Stamps `<key>_<suffix>` with the current time and returns it.
///
/// Best effort: the stamp is written after the data it describes, so a
/// failure here is logged and never turns a committed write into an error.
pub(crate) async fn stamp(store: &dyn KvStore, key: &str, suffix: &str) -> String {
    let now = Utc::now().to_rfc3339();
    let stamp_key = format!("{}_{}", key, suffix);
    if let Err(e) = store.set(&stamp_key, &now).await {
        tracing::warn!("Failed to write '{}': {}", stamp_key, e);
    }
    now
}
