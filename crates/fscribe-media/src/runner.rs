//! The media pipeline runner: configured entry point over download and
//! transcoding.
//!
//! Configuration is an explicit value passed at construction; there is no
//! process-wide transcoder state.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;

use crate::download::{self, MIN_MEDIA_BYTES};
use crate::error::{MediaError, MediaResult};
use crate::keyframes::{self, ExtractedFrame};
use crate::{audio, scratch::JobScratch};

/// Media pipeline configuration.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Connect timeout for the download client
    pub connect_timeout: Duration,
    /// Total request timeout for one download
    pub download_timeout: Duration,
    /// Minimum plausible downloaded-file size
    pub min_media_bytes: u64,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            download_timeout: Duration::from_secs(600),
            min_media_bytes: MIN_MEDIA_BYTES,
        }
    }
}

/// Runner for the download and transcoding stages of one job.
#[derive(Debug, Clone)]
pub struct MediaPipeline {
    http: Client,
    config: MediaConfig,
}

impl MediaPipeline {
    /// Create a new runner with the given configuration.
    pub fn new(config: MediaConfig) -> MediaResult<Self> {
        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.download_timeout)
            .user_agent(concat!("fscribe-media/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(MediaError::Http)?;

        Ok(Self { http, config })
    }

    /// Create a job-scoped scratch directory under `scratch_root`.
    pub async fn create_scratch(&self, scratch_root: &Path, job_id: &str) -> MediaResult<JobScratch> {
        JobScratch::create(scratch_root, job_id).await
    }

    /// Stream the remote video to local scratch storage.
    pub async fn fetch_to_local(&self, url: &str, dest: &Path) -> MediaResult<()> {
        download::fetch_to_local(&self.http, url, dest, self.config.min_media_bytes).await
    }

    /// Extract one keyframe per detected scene change.
    pub async fn extract_keyframes(
        &self,
        video: &Path,
        frames_dir: &Path,
        sensitivity: f64,
    ) -> MediaResult<Vec<ExtractedFrame>> {
        keyframes::extract_keyframes(video, frames_dir, sensitivity).await
    }

    /// Extract the mono 16 kHz PCM audio track.
    pub async fn extract_audio(&self, video: &Path, dest: &Path) -> MediaResult<()> {
        audio::extract_audio(video, dest).await
    }
}
