//! Pipeline error types.

use thiserror::Error;

use fscribe_media::MediaError;
use fscribe_store::StoreError;

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors that abort a running job.
///
/// Each variant names the stage it came from; the variant message becomes
/// the job record's error message and [`diagnostic`](PipelineError::diagnostic)
/// its detail field. Transcription has no variant here: its failures are
/// absorbed into a degraded transcript and never abort the job.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Video download failed: {0}")]
    Download(#[source] MediaError),

    #[error("Keyframe extraction failed: {0}")]
    Keyframes(#[source] MediaError),

    #[error("Audio extraction failed: {0}")]
    Audio(#[source] MediaError),

    #[error("Scratch setup failed: {0}")]
    Scratch(#[source] MediaError),

    #[error("Status write failed: {0}")]
    Store(#[from] StoreError),

    #[error("Result encoding failed: {0}")]
    Encode(#[source] std::io::Error),
}

impl PipelineError {
    /// Detail string for the job record's diagnostic field.
    pub fn diagnostic(&self) -> String {
        match self {
            PipelineError::Download(e)
            | PipelineError::Keyframes(e)
            | PipelineError::Audio(e)
            | PipelineError::Scratch(e) => e.diagnostic(),
            PipelineError::Store(e) => e.to_string(),
            PipelineError::Encode(e) => e.to_string(),
        }
    }
}
