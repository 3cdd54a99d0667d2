//! Error types for media operations.

use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur during media download and transcoding.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("FFmpeg command failed: {message}")]
    FfmpegFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("Download failed: {message}")]
    DownloadFailed { message: String },

    #[error("Downloaded content is HTML, not media (content-type {content_type})")]
    NonMediaContent {
        content_type: String,
        /// Leading bytes of the HTML body, for diagnosing confirmation pages
        preview: String,
    },

    #[error("Downloaded file too small ({size} bytes, content-type {content_type})")]
    FileTooSmall { size: u64, content_type: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// Create an FFmpeg failure error.
    pub fn ffmpeg_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::FfmpegFailed {
            message: message.into(),
            stderr,
            exit_code,
        }
    }

    /// Create a download failure error.
    pub fn download_failed(message: impl Into<String>) -> Self {
        Self::DownloadFailed {
            message: message.into(),
        }
    }

    /// Detail string suitable for a job record's diagnostic field.
    pub fn diagnostic(&self) -> String {
        match self {
            MediaError::FfmpegFailed {
                stderr: Some(stderr),
                exit_code,
                ..
            } => format!("exit code {:?}; stderr: {}", exit_code, stderr),
            MediaError::NonMediaContent { preview, .. } => {
                format!("body preview: {:?}", preview)
            }
            other => other.to_string(),
        }
    }
}
