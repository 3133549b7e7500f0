//! Shared application state.

use std::sync::Arc;
use wedlot_core::announce::SpeechProvider;
use wedlot_core::{Announcer, KvStore, NameStore, WinnerStore};
use wedlot_draw::DrawEngine;

/// Everything the handlers need, built once at startup.
pub struct ServerContext {
    pub names: NameStore,
    pub winners: WinnerStore,
    pub engine: DrawEngine,
    /// Proxied by `POST /api/announce`. `None` without credentials.
    pub speech: Option<Arc<dyn SpeechProvider>>,
    /// Speaks on the server host after `POST /api/draw`.
    pub announcer: Option<Arc<Announcer>>,
}

impl ServerContext {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        let names = NameStore::new(store.clone());
        let winners = WinnerStore::new(store);
        let engine = DrawEngine::new(names.clone(), winners.clone());

        Self {
            names,
            winners,
            engine,
            speech: None,
            announcer: None,
        }
    }

    #[must_use]
    pub fn with_speech(mut self, provider: Arc<dyn SpeechProvider>) -> Self {
        self.speech = Some(provider);
        self
    }

    #[must_use]
    pub fn with_announcer(mut self, announcer: Arc<Announcer>) -> Self {
        self.announcer = Some(announcer);
        self
    }
}

pub type AppState = Arc<ServerContext>;
