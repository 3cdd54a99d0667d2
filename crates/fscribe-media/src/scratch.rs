//! Job-scoped scratch storage.
//!
//! Every job gets its own directory under the scratch root, keyed by job id
//! so concurrent jobs never collide. The directory holds the downloaded
//! video, the extracted audio track, and the keyframe images, and is removed
//! best-effort when the job reaches a terminal state.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::MediaResult;

/// Scratch directory for a single job.
#[derive(Debug, Clone)]
pub struct JobScratch {
    root: PathBuf,
}

impl JobScratch {
    /// Create (idempotently) the scratch directory for `job_id`.
    pub async fn create(scratch_root: &Path, job_id: &str) -> MediaResult<Self> {
        let root = scratch_root.join(job_id);
        tokio::fs::create_dir_all(root.join("frames")).await?;
        Ok(Self { root })
    }

    /// Destination for the downloaded video.
    pub fn video_path(&self) -> PathBuf {
        self.root.join("source.mp4")
    }

    /// Destination for the extracted audio track.
    pub fn audio_path(&self) -> PathBuf {
        self.root.join("audio.wav")
    }

    /// Directory receiving extracted keyframes.
    pub fn frames_dir(&self) -> PathBuf {
        self.root.join("frames")
    }

    /// Remove all artifacts for this job.
    ///
    /// Best-effort: a removal failure is logged and never escalated to a
    /// job failure.
    pub async fn cleanup(&self) {
        match tokio::fs::remove_dir_all(&self.root).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(
                    path = %self.root.display(),
                    "Failed to remove scratch directory: {}",
                    e
                );
            }
        }
    }
}
