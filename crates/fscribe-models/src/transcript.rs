//! Transcript payloads and the degraded-mode sentinels.
//!
//! Transcription is a value-add stage: when the speech backend is not
//! configured or its call fails, the job still completes and the transcript
//! carries one of the fixed sentinel texts instead.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `fullText` sentinel when speech credentials are not configured.
pub const TRANSCRIPT_UNAVAILABLE: &str =
    "Transcription unavailable (speech credentials not configured)";

/// `fullText` sentinel when the speech backend call failed.
pub const TRANSCRIPT_FAILED: &str = "Transcription failed";

/// One recognized utterance with its approximate start offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptSegment {
    /// Start offset formatted `MM:SS`
    pub timestamp: String,
    pub text: String,
}

/// Speech transcript of the extracted audio track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    pub full_text: String,

    /// Ordered segments; empty in degraded mode
    pub timestamped: Vec<TranscriptSegment>,

    /// Diagnostic attached when the backend call failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Transcript {
    pub fn new(full_text: impl Into<String>, timestamped: Vec<TranscriptSegment>) -> Self {
        Self {
            full_text: full_text.into(),
            timestamped,
            error: None,
        }
    }

    /// Sentinel transcript for an unconfigured speech backend.
    pub fn unavailable() -> Self {
        Self::new(TRANSCRIPT_UNAVAILABLE, Vec::new())
    }

    /// Sentinel transcript for a failed speech backend call.
    pub fn failed(diagnostic: impl Into<String>) -> Self {
        Self {
            full_text: TRANSCRIPT_FAILED.to_string(),
            timestamped: Vec::new(),
            error: Some(diagnostic.into()),
        }
    }

    /// True when this transcript carries a sentinel instead of real text.
    pub fn is_degraded(&self) -> bool {
        self.timestamped.is_empty()
            && (self.full_text == TRANSCRIPT_UNAVAILABLE || self.full_text == TRANSCRIPT_FAILED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_are_degraded() {
        assert!(Transcript::unavailable().is_degraded());
        assert!(Transcript::failed("quota exceeded").is_degraded());
        assert!(!Transcript::new("hello world", Vec::new()).is_degraded());
    }

    #[test]
    fn test_failed_attaches_diagnostic() {
        let t = Transcript::failed("connection reset");
        assert_eq!(t.full_text, TRANSCRIPT_FAILED);
        assert!(t.timestamped.is_empty());
        assert_eq!(t.error.as_deref(), Some("connection reset"));
    }

    #[test]
    fn test_unavailable_serializes_without_error_field() {
        let json = serde_json::to_value(Transcript::unavailable()).unwrap();
        assert_eq!(json["fullText"], TRANSCRIPT_UNAVAILABLE);
        assert_eq!(json["timestamped"], serde_json::json!([]));
        assert!(json.get("error").is_none());
    }
}
