use thiserror::Error;

pub type Result<T> = std::result::Result<T, WedlotError>;

#[derive(Error, Debug)]
pub enum WedlotError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Name already exists: {name}")]
    DuplicateName { name: String },

    #[error("Index {index} out of range (pool has {len} names)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Speech error: {0}")]
    Speech(#[from] SpeechError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WedlotError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn storage_unavailable(msg: impl Into<String>) -> Self {
        Self::StorageUnavailable(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// True when the backing store could not be reached or misbehaved.
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            Self::StorageUnavailable(_) | Self::Storage(_) | Self::Serialization(_) | Self::Io(_)
        )
    }
}

/// Failures along the announcement chain.
#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("Missing text parameter")]
    MissingText,

    #[error("Speech provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Speech provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Speech provider returned non-audio payload ({content_type})")]
    NonAudio {
        content_type: String,
        details: serde_json::Value,
        error_code: Option<String>,
    },

    #[error("Audio playback failed: {0}")]
    Playback(String),

    #[error("On-device speech unavailable: {0}")]
    LocalUnavailable(String),

    #[error("On-device speech failed: {0}")]
    LocalFailed(String),
}
