//! The job orchestrator.
//!
//! Admission is synchronous and cheap: synthesize the job id, spawn the
//! detached pipeline task, return. The task owns the whole lifecycle from
//! there — it persists `processing`, drives the stages strictly in order,
//! persists the terminal state, and cleans up scratch storage on success
//! and failure alike. Failures terminate in a status-store write, never in
//! a propagated error: once admission has returned there is no caller left
//! to receive one.

use std::path::PathBuf;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::{error, info, warn};

use fscribe_media::{ExtractedFrame, JobScratch, MediaPipeline};
use fscribe_models::{JobFailure, JobId, JobRecord, JobResult, Screenshot};
use fscribe_speech::SpeechClient;
use fscribe_store::JobStore;

use crate::error::{PipelineError, PipelineResult};

/// Advisory stage labels written to the job record.
pub mod stage {
    pub const DOWNLOADING: &str = "downloading";
    pub const EXTRACTING_KEYFRAMES: &str = "extracting-keyframes";
    pub const EXTRACTING_AUDIO: &str = "extracting-audio";
    pub const TRANSCRIBING: &str = "transcribing";
    pub const ENCODING_RESULTS: &str = "encoding-results";
}

/// A validated processing request, ready for admission.
#[derive(Debug, Clone)]
pub struct AdmissionRequest {
    /// Remote video locator
    pub source_url: String,
    /// Opaque caller-supplied correlation id
    pub correlation_id: String,
    /// Scene-change threshold in (0, 1]
    pub sensitivity: f64,
}

/// Drives admitted jobs to a terminal state.
#[derive(Clone)]
pub struct Orchestrator {
    media: Arc<MediaPipeline>,
    speech: Arc<SpeechClient>,
    jobs: JobStore,
    scratch_root: PathBuf,
}

impl Orchestrator {
    pub fn new(
        media: Arc<MediaPipeline>,
        speech: Arc<SpeechClient>,
        jobs: JobStore,
        scratch_root: PathBuf,
    ) -> Self {
        Self {
            media,
            speech,
            jobs,
            scratch_root,
        }
    }

    /// Admit a request: allocate the job id and spawn the detached pipeline
    /// task.
    ///
    /// Returns before any durable write so the caller-facing path has
    /// bounded latency regardless of media size; the retrieval heuristic
    /// covers the window until the first write converges. Once admitted, a
    /// job runs to a terminal state — there is no cancellation.
    pub fn admit(&self, request: AdmissionRequest) -> JobId {
        let job_id = JobId::generate(&request.correlation_id);
        let record = JobRecord::new(
            job_id.clone(),
            request.source_url,
            request.correlation_id,
            request.sensitivity,
        );

        info!(job_id = %job_id, source_url = %record.source_url, "Admitted processing job");

        let orchestrator = self.clone();
        tokio::spawn(async move {
            orchestrator.run(record).await;
        });

        job_id
    }

    /// Detached job body with its own error boundary.
    pub async fn run(&self, record: JobRecord) {
        let record = record.start();

        match self.execute(&record).await {
            Ok(()) => info!(job_id = %record.job_id, "Job completed"),
            Err(e) => {
                error!(job_id = %record.job_id, "Job failed: {}", e);
                self.record_failure(record, &e).await;
            }
        }
    }

    async fn execute(&self, record: &JobRecord) -> PipelineResult<()> {
        // First durable write already reflects `processing`
        self.jobs.save(record).await?;

        let scratch = self
            .media
            .create_scratch(&self.scratch_root, record.job_id.as_str())
            .await
            .map_err(PipelineError::Scratch)?;

        let outcome = self.run_stages(record, &scratch).await;

        // Scratch artifacts go away on success and failure alike
        scratch.cleanup().await;

        outcome
    }

    /// Run the pipeline stages strictly in order; any failure aborts the
    /// remaining stages.
    async fn run_stages(&self, record: &JobRecord, scratch: &JobScratch) -> PipelineResult<()> {
        self.touch_stage(record, stage::DOWNLOADING).await;
        self.media
            .fetch_to_local(&record.source_url, &scratch.video_path())
            .await
            .map_err(PipelineError::Download)?;

        self.touch_stage(record, stage::EXTRACTING_KEYFRAMES).await;
        let frames = self
            .media
            .extract_keyframes(
                &scratch.video_path(),
                &scratch.frames_dir(),
                record.sensitivity,
            )
            .await
            .map_err(PipelineError::Keyframes)?;

        self.touch_stage(record, stage::EXTRACTING_AUDIO).await;
        self.media
            .extract_audio(&scratch.video_path(), &scratch.audio_path())
            .await
            .map_err(PipelineError::Audio)?;

        self.touch_stage(record, stage::TRANSCRIBING).await;
        let transcript = self.speech.transcribe(&scratch.audio_path()).await;

        // Transport encoding happens only here, once every stage has
        // succeeded, so interrupted jobs never leak partial results.
        self.touch_stage(record, stage::ENCODING_RESULTS).await;
        let screenshots = encode_screenshots(&frames).await?;
        let result = JobResult::new(screenshots, transcript, &record.video_id);

        self.jobs.save(&record.clone().complete(result)).await?;
        Ok(())
    }

    /// Persist an advisory stage label. Best-effort: a failed write is
    /// logged and the pipeline continues.
    async fn touch_stage(&self, record: &JobRecord, stage: &str) {
        let update = record.clone().with_stage(stage);
        if let Err(e) = self.jobs.save(&update).await {
            warn!(job_id = %record.job_id, stage = stage, "Failed to persist stage update: {}", e);
        }
    }

    /// Persist the terminal error record. Best-effort: if this write fails
    /// too, the job stays observable as non-terminal — the one acknowledged
    /// gap in the failure model.
    async fn record_failure(&self, record: JobRecord, error: &PipelineError) {
        let failure = JobFailure::new(error.to_string()).with_diagnostic(error.diagnostic());
        let failed = record.fail(failure);

        if let Err(e) = self.jobs.save(&failed).await {
            error!(job_id = %failed.job_id, "Failed to persist error status: {}", e);
        }
    }
}

/// Re-read each keyframe from scratch storage and encode it for transport,
/// preserving the scene-detection emission order.
async fn encode_screenshots(frames: &[ExtractedFrame]) -> PipelineResult<Vec<Screenshot>> {
    let mut screenshots = Vec::with_capacity(frames.len());
    for frame in frames {
        let bytes = tokio::fs::read(&frame.path)
            .await
            .map_err(PipelineError::Encode)?;
        screenshots.push(Screenshot {
            filename: frame.filename.clone(),
            timestamp: frame.ordinal,
            base64: BASE64.encode(bytes),
        });
    }
    Ok(screenshots)
}
