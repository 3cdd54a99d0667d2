//! Typed access to job records.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use fscribe_models::{JobId, JobRecord};

use crate::client::DocumentStore;
use crate::error::StoreResult;

/// Typed wrapper over a [`DocumentStore`] for [`JobRecord`] documents,
/// keyed by job id.
#[derive(Clone)]
pub struct JobStore {
    store: Arc<dyn DocumentStore>,
}

impl JobStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Persist the record under its job id.
    pub async fn save(&self, record: &JobRecord) -> StoreResult<()> {
        let document: Value = serde_json::to_value(record)?;
        self.store.put(record.job_id.as_str(), document).await?;
        debug!(job_id = %record.job_id, status = record.status.as_str(), "Persisted job record");
        Ok(())
    }

    /// Load the record for `job_id`, if the store has surfaced one.
    pub async fn load(&self, job_id: &JobId) -> StoreResult<Option<JobRecord>> {
        match self.store.get(job_id.as_str()).await? {
            Some(document) => Ok(Some(serde_json::from_value(document)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use fscribe_models::{JobFailure, JobId};

    fn job_store() -> JobStore {
        JobStore::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_save_load_round_trip() {
        let store = job_store();
        let id = JobId::generate("abc123");
        let record = JobRecord::new(id.clone(), "https://host/v.mp4", "abc123", 0.15).start();

        store.save(&record).await.unwrap();
        let loaded = store.load(&id).await.unwrap().unwrap();

        assert_eq!(loaded.job_id, id);
        assert_eq!(loaded.status, record.status);
        assert_eq!(loaded.source_url, "https://host/v.mp4");
    }

    #[tokio::test]
    async fn test_load_absent_job() {
        let store = job_store();
        assert!(store
            .load(&JobId::from_string("nope-1-2"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_latest_save_wins() {
        let store = job_store();
        let id = JobId::generate("abc123");
        let record = JobRecord::new(id.clone(), "https://host/v.mp4", "abc123", 0.15).start();

        store.save(&record).await.unwrap();
        store
            .save(&record.fail(JobFailure::new("download failed")))
            .await
            .unwrap();

        let loaded = store.load(&id).await.unwrap().unwrap();
        assert_eq!(loaded.status, fscribe_models::JobStatus::Error);
        assert!(loaded.error.is_some());
    }
}
