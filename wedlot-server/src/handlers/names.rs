//! Name pool handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use wedlot_core::DataSource;

use crate::error::HttpError;
use crate::handlers::string_list;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamesResponse {
    pub names: Vec<String>,
    pub source: DataSource,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveNamesResponse {
    pub success: bool,
    pub count: usize,
    pub message: String,
}

/// Current pool. Falls back to the default names and never fails.
pub async fn list(State(state): State<AppState>) -> Json<NamesResponse> {
    let loaded = state.names.load().await;
    let message = loaded.message();
    let source = match loaded.source {
        DataSource::Persisted => DataSource::Persisted,
        _ => DataSource::Default,
    };

    Json(NamesResponse {
        names: loaded.pool.into_inner(),
        source,
        message,
    })
}

/// Replaces the whole pool.
pub async fn save(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SaveNamesResponse>, HttpError> {
    let names = string_list(body, "names")?;
    let receipt = state
        .names
        .save(&names)
        .await
        .map_err(|e| HttpError::from_core("Failed to save names", e))?;

    Ok(Json(SaveNamesResponse {
        success: true,
        count: receipt.count,
        message: format!("Saved {} names", receipt.count),
    }))
}
