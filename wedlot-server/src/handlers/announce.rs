//! Speech proxy. The browser posts the phrase and plays the returned audio.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use crate::error::HttpError;
use crate::state::AppState;

pub async fn synthesize(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Json(body) = body.map_err(|e| HttpError::BadRequest(e.body_text()))?;
    let text = body
        .get("text")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| HttpError::BadRequest("Text is required".to_string()))?;

    let provider = state.speech.as_ref().ok_or_else(|| HttpError::SpeechProvider {
        details: "No speech provider credentials configured".to_string(),
        provider_error: None,
    })?;

    let audio = provider.synthesize(text).await.map_err(|e| {
        tracing::warn!("Speech synthesis failed: {}", e);
        HttpError::from(e)
    })?;

    tracing::debug!("Synthesized {} bytes of audio", audio.bytes.len());
    Ok((
        [
            (header::CONTENT_TYPE, "audio/mpeg"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        audio.bytes,
    )
        .into_response())
}
