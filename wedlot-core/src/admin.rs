//! Operator edits to the name pool.
//!
//! Every edit is a read-modify-write of the whole pool through
//! [`NameStore`], which re-validates what it is given. Edits refuse to run
//! while the stored pool cannot be read.

use crate::error::Result;
use crate::storage::{LoadedNames, NameStore, SaveReceipt};
use crate::types::NamePool;

#[derive(Debug, Clone)]
pub struct EditOutcome {
    pub pool: NamePool,
    pub receipt: SaveReceipt,
    pub summary: String,
}

#[derive(Clone)]
pub struct NameEditor {
    names: NameStore,
}

impl NameEditor {
    pub fn new(names: NameStore) -> Self {
        Self { names }
    }

    pub async fn list(&self) -> LoadedNames {
        self.names.load().await
    }

    pub async fn search(&self, term: &str) -> Vec<(usize, String)> {
        let loaded = self.names.load().await;
        loaded
            .pool
            .search(term)
            .into_iter()
            .map(|(i, name)| (i, name.to_string()))
            .collect()
    }

    async fn commit(&self, pool: NamePool, summary: String) -> Result<EditOutcome> {
        let receipt = self.names.save_pool(&pool).await?;
        tracing::info!("{}", summary);
        Ok(EditOutcome {
            pool,
            receipt,
            summary,
        })
    }

    pub async fn add(&self, name: &str) -> Result<EditOutcome> {
        let mut pool = self.names.load_for_edit().await?;
        let added = pool.add(name)?;
        self.commit(pool, format!("Added '{}'", added)).await
    }

    pub async fn rename(&self, index: usize, name: &str) -> Result<EditOutcome> {
        let mut pool = self.names.load_for_edit().await?;
        let previous = pool.rename(index, name)?;
        let current = pool.names()[index].clone();
        self.commit(pool, format!("Renamed '{}' to '{}'", previous, current))
            .await
    }

    /// Removing the last remaining name is refused by the store, since an
    /// empty pool cannot be saved.
    pub async fn remove(&self, index: usize) -> Result<EditOutcome> {
        let mut pool = self.names.load_for_edit().await?;
        let removed = pool.remove(index)?;
        self.commit(pool, format!("Removed '{}'", removed)).await
    }

    pub async fn reset_to_default(&self) -> Result<EditOutcome> {
        self.commit(NamePool::defaults(), "Restored the default names".to_string())
            .await
    }
}
