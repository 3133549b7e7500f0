//! Composition root: storage, speech and the router are wired here only.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::info;
use wedlot_core::announce::{HttpSpeechProvider, SpeechProvider};
use wedlot_core::storage::open_store;
use wedlot_core::{Announcer, AppConfig};

use crate::state::{AppState, ServerContext};

/// Builds the shared state from configuration.
///
/// The speech proxy is enabled only when provider credentials are set.
/// `announce_on_host` additionally speaks each server-side draw on this
/// machine.
pub async fn bootstrap(
    config: &AppConfig,
    data_dir: &Path,
    announce_on_host: bool,
) -> Result<AppState> {
    config.validate()?;

    let store = open_store(&config.storage, data_dir).await;
    info!("Using {} storage", store.backend());

    let mut ctx = ServerContext::new(store);

    if config.speech.has_credentials() {
        let provider: Arc<dyn SpeechProvider> =
            Arc::new(HttpSpeechProvider::new(config.speech.clone())?);
        ctx = ctx.with_speech(provider);
    } else {
        info!("Speech provider credentials not set, /api/announce will report 502");
    }

    if announce_on_host {
        ctx = ctx.with_announcer(Arc::new(Announcer::from_config(&config.speech)?));
    }

    Ok(Arc::new(ctx))
}

pub async fn start_server(
    config: &AppConfig,
    data_dir: &Path,
    announce_on_host: bool,
) -> Result<()> {
    let state = bootstrap(config, data_dir, announce_on_host).await?;
    let app = crate::routes::create_router(state, config.server.cors_allow_all);

    let addr = format!("0.0.0.0:{}", config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("wedlot server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
