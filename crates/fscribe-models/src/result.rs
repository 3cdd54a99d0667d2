//! Completed-job payload: encoded keyframes plus the transcript.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::transcript::Transcript;

/// A keyframe captured at a scene change, encoded for transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Screenshot {
    /// Source filename inside the frames directory (`frame_0001.png`)
    pub filename: String,

    /// Frame ordinal parsed from the filename. Approximate offset only;
    /// list order is authoritative for sequencing, not this value.
    pub timestamp: u32,

    /// PNG bytes, base64-encoded
    pub base64: String,
}

/// The payload returned to callers once a job is `done`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobResult {
    pub success: bool,

    /// Keyframes in scene-detection emission order
    pub screenshots: Vec<Screenshot>,

    pub transcript: Transcript,

    /// Always equals `screenshots.len()`
    pub total_screenshots: u32,

    /// The caller-supplied correlation id
    pub video_id: String,
}

impl JobResult {
    pub fn new(
        screenshots: Vec<Screenshot>,
        transcript: Transcript,
        video_id: impl Into<String>,
    ) -> Self {
        let total_screenshots = screenshots.len() as u32;
        Self {
            success: true,
            screenshots,
            transcript,
            total_screenshots,
            video_id: video_id.into(),
        }
    }
}
