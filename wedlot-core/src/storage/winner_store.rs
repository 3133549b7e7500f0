use crate::error::{Result, WedlotError};
use crate::storage::{read_list, stamp, write_list, KvStore, WINNERS_KEY};
use crate::types::{DataSource, WinnerLedger};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadedWinners {
    pub ledger: WinnerLedger,
    pub source: DataSource,
    pub detail: Option<String>,
}

impl LoadedWinners {
    pub fn message(&self) -> String {
        match self.source {
            DataSource::Error => "Failed to read the winner history".to_string(),
            _ if self.ledger.is_empty() => "No winners yet".to_string(),
            _ => format!("{} winners so far", self.ledger.len()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppendReceipt {
    pub ledger: WinnerLedger,
    pub added: Vec<String>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetReceipt {
    /// False when there was nothing to clear.
    pub cleared: bool,
    pub reset_at: String,
}

/// Persistent history of drawn names.
#[derive(Clone)]
pub struct WinnerStore {
    store: Arc<dyn KvStore>,
}

impl WinnerStore {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Never fails; an unreadable ledger reads as empty with source `Error`.
    pub async fn load(&self) -> LoadedWinners {
        match read_list(self.store.as_ref(), WINNERS_KEY).await {
            Ok(raw) => {
                let ledger = WinnerLedger::from_raw(raw.unwrap_or_default());
                tracing::debug!("Read {} winners from {}", ledger.len(), self.store.backend());
                LoadedWinners {
                    ledger,
                    source: DataSource::Persisted,
                    detail: None,
                }
            }
            Err(e) => {
                tracing::warn!("Failed to read winners: {}", e);
                LoadedWinners {
                    ledger: WinnerLedger::new(),
                    source: DataSource::Error,
                    detail: Some(e.to_string()),
                }
            }
        }
    }

    /// Merges `new_winners` into the stored ledger, skipping names already
    /// recorded. Submitting the same names twice is a no-op the second time.
    pub async fn append<S: AsRef<str>>(&self, new_winners: &[S]) -> Result<AppendReceipt> {
        let submitted = WinnerLedger::from_raw(new_winners.iter());
        if submitted.is_empty() {
            return Err(WedlotError::invalid_input("No valid winners provided"));
        }

        // Unlike `load`, a read failure here must surface: merging onto an
        // empty ledger would silently drop history.
        let existing = read_list(self.store.as_ref(), WINNERS_KEY).await?;
        let mut ledger = WinnerLedger::from_raw(existing.unwrap_or_default());
        let added = ledger.merge(submitted.names());

        write_list(self.store.as_ref(), WINNERS_KEY, ledger.names()).await?;
        stamp(self.store.as_ref(), WINNERS_KEY, "updated").await;

        tracing::info!(
            "Recorded {} new winners, {} in total",
            added.len(),
            ledger.len()
        );

        let total = ledger.len();
        Ok(AppendReceipt {
            ledger,
            added,
            total,
        })
    }

    /// Clears the ledger. Succeeds when it was already empty; fails only
    /// when storage cannot be reached.
    pub async fn reset(&self) -> Result<ResetReceipt> {
        let cleared = self.store.delete(WINNERS_KEY).await?;
        let reset_at = stamp(self.store.as_ref(), WINNERS_KEY, "reset").await;

        if cleared {
            tracing::info!("Winner history reset");
        } else {
            tracing::info!("Winner history was already empty");
        }

        Ok(ResetReceipt { cleared, reset_at })
    }
}
