//! HTTP error type and its mapping from core and draw errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use wedlot_core::{SpeechError, WedlotError};
use wedlot_draw::DrawError;

#[derive(Debug, Error)]
pub enum HttpError {
    /// Malformed or invalid request body.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The backing store could not be read or written.
    #[error("{error}: {details}")]
    Storage { error: String, details: String },

    /// The draw policy refused the request.
    #[error("{message}")]
    DrawRejected { message: String, kind: &'static str },

    /// The speech provider did not return audio.
    #[error("Speech provider failed: {details}")]
    SpeechProvider {
        details: String,
        provider_error: Option<String>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct Troubleshooting {
    step1: &'static str,
    step2: &'static str,
    step3: &'static str,
}

const STORAGE_STEPS: Troubleshooting = Troubleshooting {
    step1: "Check the WEDLOT_STORAGE setting",
    step2: "Make sure the data directory is writable",
    step3: "Check that no other process holds the database lock",
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    troubleshooting: Option<Troubleshooting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    provider_error: Option<String>,
}

impl ErrorBody {
    fn message(error: String) -> Self {
        Self {
            error,
            details: None,
            troubleshooting: None,
            kind: None,
            provider_error: None,
        }
    }
}

impl HttpError {
    /// Maps a core error raised while doing `context`. Storage failures keep
    /// `context` as the headline and the cause as details.
    pub fn from_core(context: &str, err: WedlotError) -> Self {
        if err.is_storage_failure() {
            tracing::error!("{}: {}", context, err);
            HttpError::Storage {
                error: context.to_string(),
                details: err.to_string(),
            }
        } else {
            err.into()
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HttpError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            HttpError::DrawRejected { .. } => StatusCode::CONFLICT,
            HttpError::SpeechProvider { .. } => StatusCode::BAD_GATEWAY,
            HttpError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            HttpError::BadRequest(msg) | HttpError::Internal(msg) => ErrorBody::message(msg),
            HttpError::Storage { error, details } => ErrorBody {
                details: Some(details),
                troubleshooting: Some(STORAGE_STEPS),
                ..ErrorBody::message(error)
            },
            HttpError::DrawRejected { message, kind } => ErrorBody {
                kind: Some(kind),
                ..ErrorBody::message(message)
            },
            HttpError::SpeechProvider {
                details,
                provider_error,
            } => ErrorBody {
                details: Some(details),
                provider_error,
                ..ErrorBody::message("Speech synthesis failed".to_string())
            },
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<WedlotError> for HttpError {
    fn from(err: WedlotError) -> Self {
        match err {
            WedlotError::InvalidInput(msg) => HttpError::BadRequest(msg),
            e @ (WedlotError::DuplicateName { .. } | WedlotError::IndexOutOfRange { .. }) => {
                HttpError::BadRequest(e.to_string())
            }
            WedlotError::Speech(e) => e.into(),
            e if e.is_storage_failure() => HttpError::Storage {
                error: "Storage failure".to_string(),
                details: e.to_string(),
            },
            e => HttpError::Internal(e.to_string()),
        }
    }
}

impl From<DrawError> for HttpError {
    fn from(err: DrawError) -> Self {
        match err {
            DrawError::Core(e) => HttpError::from_core("Failed to record the draw", e),
            rejection => HttpError::DrawRejected {
                kind: rejection.kind(),
                message: rejection.to_string(),
            },
        }
    }
}

impl From<SpeechError> for HttpError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::MissingText => HttpError::BadRequest(err.to_string()),
            SpeechError::NonAudio {
                ref details,
                ref error_code,
                ..
            } => HttpError::SpeechProvider {
                provider_error: error_code.clone(),
                details: details.to_string(),
            },
            other => HttpError::SpeechProvider {
                details: other.to_string(),
                provider_error: None,
            },
        }
    }
}
