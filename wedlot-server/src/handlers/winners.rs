//! Winner ledger handlers.

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
pub struct WinnersResponse {
    pub winners: Vec<String>,
    pub source: DataSource,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendWinnersResponse {
    pub success: bool,
    pub winners: Vec<String>,
    pub new_count: usize,
    pub total_count: usize,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetWinnersResponse {
    pub success: bool,
    pub cleared: bool,
    pub message: String,
}

/// Recorded winners. An unreadable ledger is reported in `source`, not as
/// an HTTP error.
pub async fn list(State(state): State<AppState>) -> Json<WinnersResponse> {
    let loaded = state.winners.load().await;
    let message = loaded.message();

    Json(WinnersResponse {
        winners: loaded.ledger.into_inner(),
        source: loaded.source,
        message,
    })
}

/// Merges winners into the ledger, skipping names already recorded.
pub async fn append(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AppendWinnersResponse>, HttpError> {
    let winners = string_list(body, "winners")?;
    let receipt = state
        .winners
        .append(&winners)
        .await
        .map_err(|e| HttpError::from_core("Failed to save winners", e))?;

    let new_count = receipt.added.len();
    Ok(Json(AppendWinnersResponse {
        success: true,
        message: format!(
            "Added {} new winners, {} in total",
            new_count, receipt.total
        ),
        winners: receipt.ledger.into_inner(),
        new_count,
        total_count: receipt.total,
    }))
}

pub async fn reset(State(state): State<AppState>) -> Result<Json<ResetWinnersResponse>, HttpError> {
    let receipt = state
        .winners
        .reset()
        .await
        .map_err(|e| HttpError::from_core("Failed to reset winners", e))?;

    let message = if receipt.cleared {
        "Winner history reset"
    } else {
        "Winner history was already empty"
    };

    Ok(Json(ResetWinnersResponse {
        success: true,
        cleared: receipt.cleared,
        message: message.to_string(),
    }))
}
