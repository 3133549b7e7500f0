use crate::error::{Result, WedlotError};
use crate::storage::{read_list, stamp, write_list, KvStore, NAMES_KEY};
use crate::types::{DataSource, NamePool};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Result of reading the pool. `detail` carries the storage failure, if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadedNames {
    pub pool: NamePool,
    pub source: DataSource,
    pub detail: Option<String>,
}

impl LoadedNames {
    pub fn message(&self) -> String {
        match (self.source, &self.detail) {
            (DataSource::Persisted, _) => format!("Loaded {} names from storage", self.pool.len()),
            (_, Some(_)) => "Could not read storage, using the default names".to_string(),
            _ => "No saved names, using the default names".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveReceipt {
    pub count: usize,
    pub saved_at: String,
}

/// Canonical list of names that may be drawn.
#[derive(Clone)]
pub struct NameStore {
    store: Arc<dyn KvStore>,
}

impl NameStore {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Never fails: anything short of a persisted, non-empty list yields the
    /// built-in defaults, which are not written back.
    pub async fn load(&self) -> LoadedNames {
        match read_list(self.store.as_ref(), NAMES_KEY).await {
            Ok(Some(raw)) => {
                let pool = NamePool::from_raw(raw);
                if !pool.is_empty() {
                    tracing::debug!("Read {} names from {}", pool.len(), self.store.backend());
                    return LoadedNames {
                        pool,
                        source: DataSource::Persisted,
                        detail: None,
                    };
                }
                tracing::info!("Stored name list is empty, using defaults");
            }
            Ok(None) => tracing::info!("No names stored yet, using defaults"),
            Err(e) => {
                tracing::warn!("Failed to read names, using defaults: {}", e);
                return LoadedNames {
                    pool: NamePool::defaults(),
                    source: DataSource::Default,
                    detail: Some(e.to_string()),
                };
            }
        }

        LoadedNames {
            pool: NamePool::defaults(),
            source: DataSource::Default,
            detail: None,
        }
    }

    /// Like `load`, but a read failure is returned instead of falling back.
    /// Edits start from this so an outage can never write the defaults
    /// over a pool that is still stored.
    pub(crate) async fn load_for_edit(&self) -> Result<NamePool> {
        match read_list(self.store.as_ref(), NAMES_KEY).await? {
            Some(raw) => {
                let pool = NamePool::from_raw(raw);
                if pool.is_empty() {
                    Ok(NamePool::defaults())
                } else {
                    Ok(pool)
                }
            }
            None => Ok(NamePool::defaults()),
        }
    }

    /// Replaces the whole pool with the usable subset of `names`.
    pub async fn save<S: AsRef<str>>(&self, names: &[S]) -> Result<SaveReceipt> {
        let pool = NamePool::from_raw(names.iter());
        if pool.is_empty() {
            return Err(WedlotError::invalid_input("No valid names provided"));
        }

        write_list(self.store.as_ref(), NAMES_KEY, pool.names()).await?;
        let saved_at = stamp(self.store.as_ref(), NAMES_KEY, "updated").await;

        tracing::info!("Saved {} names to {}", pool.len(), self.store.backend());
        Ok(SaveReceipt {
            count: pool.len(),
            saved_at,
        })
    }

    pub async fn save_pool(&self, pool: &NamePool) -> Result<SaveReceipt> {
        self.save(pool.names()).await
    }
}
