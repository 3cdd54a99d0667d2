//! Application state.

use std::sync::Arc;

use tracing::{info, warn};

use fscribe_media::{MediaConfig, MediaPipeline};
use fscribe_pipeline::Orchestrator;
use fscribe_speech::SpeechClient;
use fscribe_store::{DocumentStore, HttpBlobStore, JobStore, MemoryStore};

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub jobs: JobStore,
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    /// Create new application state.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let store: Arc<dyn DocumentStore> = if std::env::var("BLOB_STORE_URL").is_ok() {
            info!("Using HTTP blob store for job status");
            Arc::new(HttpBlobStore::from_env()?)
        } else {
            warn!(
                "BLOB_STORE_URL not set, falling back to the in-memory job store; \
                 job status will not survive a restart"
            );
            Arc::new(MemoryStore::new())
        };
        let jobs = JobStore::new(store);

        let media = Arc::new(MediaPipeline::new(MediaConfig::default())?);
        let speech = Arc::new(SpeechClient::from_env()?);
        if !speech.is_configured() {
            info!("Speech backend not configured; transcripts will carry the unavailable sentinel");
        }

        let orchestrator = Arc::new(Orchestrator::new(
            media,
            speech,
            jobs.clone(),
            config.scratch_root.clone(),
        ));

        Ok(Self {
            config,
            jobs,
            orchestrator,
        })
    }
}
