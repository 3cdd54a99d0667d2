//! Speech-to-Text REST client.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use gcp_auth::{CustomServiceAccount, TokenProvider};
use reqwest::Client;
use tracing::{info, warn};

use fscribe_models::{format_timestamp, Transcript, TranscriptSegment};

use crate::error::{SpeechError, SpeechResult};
use crate::types::{RecognitionAudio, RecognitionConfig, RecognizeRequest, RecognizeResponse};

/// OAuth scope for the Speech-to-Text API.
const SPEECH_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Default recognition endpoint.
const DEFAULT_ENDPOINT: &str = "https://speech.googleapis.com/v1/speech:recognize";

/// Speech client configuration.
#[derive(Debug, Clone)]
pub struct SpeechConfig {
    /// Recognition endpoint URL
    pub endpoint: String,
    /// BCP-47 language code for recognition
    pub language_code: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            language_code: "en-US".to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

impl SpeechConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            endpoint: std::env::var("SPEECH_ENDPOINT").unwrap_or(defaults.endpoint),
            language_code: std::env::var("SPEECH_LANGUAGE_CODE").unwrap_or(defaults.language_code),
            timeout: defaults.timeout,
        }
    }
}

/// Transcription adapter over the Speech-to-Text REST API.
///
/// Transcription is a value-add, not a correctness-critical stage: the
/// public [`transcribe`](SpeechClient::transcribe) call always returns a
/// transcript. Missing credentials and backend failures degrade into the
/// sentinel transcripts from `fscribe-models`.
pub struct SpeechClient {
    http: Client,
    auth: Option<Arc<dyn TokenProvider>>,
    config: SpeechConfig,
}

impl SpeechClient {
    /// Create a new client. Passing `None` for `auth` yields a permanently
    /// degraded client that reports transcription as unavailable.
    pub fn new(config: SpeechConfig, auth: Option<Arc<dyn TokenProvider>>) -> SpeechResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("fscribe-speech/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(SpeechError::Network)?;

        Ok(Self { http, auth, config })
    }

    /// Create from environment variables.
    ///
    /// Credential problems never fail construction; they only switch the
    /// client into degraded mode.
    pub fn from_env() -> SpeechResult<Self> {
        let auth: Option<Arc<dyn TokenProvider>> = match CustomServiceAccount::from_env() {
            Ok(Some(service_account)) => Some(Arc::new(service_account)),
            Ok(None) => {
                info!("No speech credentials configured, transcription will be unavailable");
                None
            }
            Err(e) => {
                warn!(
                    "Failed to load speech service account, transcription will be unavailable: {}",
                    e
                );
                None
            }
        };

        Self::new(SpeechConfig::from_env(), auth)
    }

    /// Whether a real speech backend is configured.
    pub fn is_configured(&self) -> bool {
        self.auth.is_some()
    }

    /// Transcribe the PCM audio file at `audio_path`.
    ///
    /// Never fails: degraded outcomes are encoded in the returned
    /// transcript so the calling job can still complete.
    pub async fn transcribe(&self, audio_path: &Path) -> Transcript {
        let Some(auth) = self.auth.clone() else {
            return Transcript::unavailable();
        };

        match self.recognize(&auth, audio_path).await {
            Ok(response) => response_to_transcript(&response),
            Err(e) => {
                warn!(audio = %audio_path.display(), "Transcription failed: {}", e);
                Transcript::failed(e.to_string())
            }
        }
    }

    async fn recognize(
        &self,
        auth: &Arc<dyn TokenProvider>,
        audio_path: &Path,
    ) -> SpeechResult<RecognizeResponse> {
        let audio = tokio::fs::read(audio_path).await?;

        let token = auth
            .token(&[SPEECH_SCOPE])
            .await
            .map_err(|e| SpeechError::auth(format!("Failed to obtain auth token: {}", e)))?;

        let request = RecognizeRequest {
            config: RecognitionConfig::linear16(&self.config.language_code),
            audio: RecognitionAudio {
                content: BASE64.encode(audio),
            },
        };

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(token.as_str())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::request_failed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }
}

/// Map a recognition response to a transcript.
///
/// Each result's top alternative becomes one segment; the segment timestamp
/// comes from that alternative's first word offset, `00:00` when absent.
pub fn response_to_transcript(response: &RecognizeResponse) -> Transcript {
    let mut lines = Vec::new();
    let mut segments = Vec::new();

    for result in &response.results {
        let Some(alternative) = result.alternatives.first() else {
            continue;
        };

        let start_secs = alternative
            .words
            .first()
            .and_then(|w| w.start_time.as_deref())
            .and_then(parse_offset_secs)
            .unwrap_or(0.0);

        lines.push(alternative.transcript.clone());
        segments.push(TranscriptSegment {
            timestamp: format_timestamp(start_secs),
            text: alternative.transcript.clone(),
        });
    }

    Transcript::new(lines.join("\n"), segments)
}

/// Parse a protobuf duration string (`"1.500s"`) into seconds.
pub fn parse_offset_secs(offset: &str) -> Option<f64> {
    offset.trim().strip_suffix('s').unwrap_or(offset).parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fscribe_models::TRANSCRIPT_UNAVAILABLE;

    #[tokio::test]
    async fn test_unconfigured_client_returns_unavailable_sentinel() {
        let client = SpeechClient::new(SpeechConfig::default(), None).unwrap();
        assert!(!client.is_configured());

        let transcript = client.transcribe(Path::new("/nonexistent/audio.wav")).await;
        assert_eq!(transcript.full_text, TRANSCRIPT_UNAVAILABLE);
        assert!(transcript.timestamped.is_empty());
        assert!(transcript.error.is_none());
    }

    #[test]
    fn test_parse_offset_secs() {
        assert_eq!(parse_offset_secs("1.500s"), Some(1.5));
        assert_eq!(parse_offset_secs("0s"), Some(0.0));
        assert_eq!(parse_offset_secs("90s"), Some(90.0));
        assert_eq!(parse_offset_secs("12.25"), Some(12.25));
        assert_eq!(parse_offset_secs("n/a"), None);
    }

    #[test]
    fn test_response_mapping() {
        let response: RecognizeResponse = serde_json::from_str(
            r#"{
                "results": [
                    {
                        "alternatives": [{
                            "transcript": "welcome to the show",
                            "words": [
                                {"startTime": "1.200s", "word": "welcome"},
                                {"startTime": "1.700s", "word": "to"}
                            ]
                        }]
                    },
                    {
                        "alternatives": [{
                            "transcript": "second scene",
                            "words": [{"startTime": "65.100s", "word": "second"}]
                        }]
                    }
                ]
            }"#,
        )
        .unwrap();

        let transcript = response_to_transcript(&response);
        assert_eq!(transcript.full_text, "welcome to the show\nsecond scene");
        assert_eq!(transcript.timestamped.len(), 2);
        assert_eq!(transcript.timestamped[0].timestamp, "00:01");
        assert_eq!(transcript.timestamped[1].timestamp, "01:05");
        assert!(transcript.error.is_none());
    }

    #[test]
    fn test_response_mapping_without_word_offsets() {
        let response: RecognizeResponse = serde_json::from_str(
            r#"{"results": [{"alternatives": [{"transcript": "no offsets here"}]}]}"#,
        )
        .unwrap();

        let transcript = response_to_transcript(&response);
        assert_eq!(transcript.timestamped[0].timestamp, "00:00");
    }

    #[test]
    fn test_empty_response_maps_to_empty_transcript() {
        let transcript = response_to_transcript(&RecognizeResponse::default());
        assert_eq!(transcript.full_text, "");
        assert!(transcript.timestamped.is_empty());
    }
}
