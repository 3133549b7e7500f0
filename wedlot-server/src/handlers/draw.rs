//! Server-side draw.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use wedlot_draw::DrawResult;

use crate::error::HttpError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawResponse {
    #[serde(flatten)]
    pub result: DrawResult,
    /// `queued` when the host speaks the result, `disabled` otherwise.
    pub announcement: &'static str,
}

/// Draws and records two winners, then queues the announcement without
/// waiting for it.
pub async fn draw(State(state): State<AppState>) -> Result<Json<DrawResponse>, HttpError> {
    let result = state.engine.draw().await?;

    let announcement = match &state.announcer {
        Some(announcer) => {
            announcer.spawn(result.winners.to_vec());
            "queued"
        }
        None => "disabled",
    };

    Ok(Json(DrawResponse {
        result,
        announcement,
    }))
}
