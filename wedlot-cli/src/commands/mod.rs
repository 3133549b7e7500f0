pub mod announce;
pub mod draw;
pub mod names;
pub mod serve;
pub mod winners;

pub use announce::handle_announce_command;
pub use draw::handle_draw_command;
pub use names::{handle_names_command, NamesCommands};
pub use serve::handle_serve_command;
pub use winners::{handle_winners_command, WinnersCommands};

use std::path::Path;
use wedlot_core::config::StorageConfig;
use wedlot_core::storage::open_store;
use wedlot_core::{NameEditor, NameStore, WinnerStore};
use wedlot_draw::DrawEngine;

/// Stores opened once per invocation.
pub struct Session {
    pub names: NameStore,
    pub winners: WinnerStore,
    pub engine: DrawEngine,
    pub editor: NameEditor,
}

impl Session {
    pub async fn open(config: &StorageConfig, data_dir: &Path) -> Self {
        let store = open_store(config, data_dir).await;
        tracing::debug!("Using {} storage", store.backend());

        let names = NameStore::new(store.clone());
        let winners = WinnerStore::new(store);
        Self {
            engine: DrawEngine::new(names.clone(), winners.clone()),
            editor: NameEditor::new(names.clone()),
            names,
            winners,
        }
    }
}

/// Positions are shown starting at 1.
pub(crate) fn position_to_index(position: usize) -> anyhow::Result<usize> {
    position
        .checked_sub(1)
        .ok_or_else(|| anyhow::anyhow!("Positions start at 1"))
}
