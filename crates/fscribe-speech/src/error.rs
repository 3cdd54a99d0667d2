//! Speech adapter error types.
//!
//! These errors stay internal to the adapter: the public `transcribe` call
//! absorbs them into a degraded [`fscribe_models::Transcript`].

use thiserror::Error;

/// Result type for speech backend calls.
pub type SpeechResult<T> = Result<T, SpeechError>;

/// Errors from the speech backend call.
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Recognition request failed: {0}")]
    RequestFailed(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpeechError {
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self::RequestFailed(msg.into())
    }
}
