//! Speech-to-Text REST API types.

use serde::{Deserialize, Serialize};

/// `speech:recognize` request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognizeRequest {
    pub config: RecognitionConfig,
    pub audio: RecognitionAudio,
}

/// Recognition parameters; fixed to the audio contract of the extraction
/// stage (mono 16 kHz 16-bit PCM).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionConfig {
    pub encoding: String,
    pub sample_rate_hertz: u32,
    pub language_code: String,
    pub enable_automatic_punctuation: bool,
    pub enable_word_time_offsets: bool,
}

impl RecognitionConfig {
    pub fn linear16(language_code: impl Into<String>) -> Self {
        Self {
            encoding: "LINEAR16".to_string(),
            sample_rate_hertz: 16_000,
            language_code: language_code.into(),
            enable_automatic_punctuation: true,
            enable_word_time_offsets: true,
        }
    }
}

/// Inline audio content, base64-encoded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionAudio {
    pub content: String,
}

/// `speech:recognize` response body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognizeResponse {
    #[serde(default)]
    pub results: Vec<RecognitionResult>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionResult {
    #[serde(default)]
    pub alternatives: Vec<RecognitionAlternative>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionAlternative {
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub words: Vec<WordInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordInfo {
    /// Offset from audio start, e.g. `"1.500s"`
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub word: String,
}
