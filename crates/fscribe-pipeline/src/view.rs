//! Result retrieval: mapping a stored record (or its absence) to a caller
//! view.
//!
//! A missing record is ambiguous between "job never existed" and "job
//! exists but the store has not converged yet". The embedded creation time
//! in the job id resolves the ambiguity: inside a bounded freshness window
//! a missing record reads as a synthetic `queued` job, outside it as not
//! found. This trades a small false-`queued` risk for a fresh-looking
//! nonexistent id against a much larger false-`not found` risk right after
//! admission, and the window bounds how long the former can last.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use fscribe_models::{JobId, JobRecord, JobResult, JobStatus};

/// How long after its embedded creation time a missing job still reads as
/// `queued`.
pub const FRESHNESS_WINDOW: Duration = Duration::minutes(10);

/// Summary line of every failure payload.
pub const ERROR_SUMMARY: &str = "Video processing failed";

/// Fallback detail when an error record carries no message.
const UNKNOWN_ERROR: &str = "Unknown error";

/// Caller-facing view of one job.
#[derive(Debug, Clone, PartialEq)]
pub enum JobView {
    /// Terminal success; the payload is returned flattened
    Done(JobResult),
    /// Terminal failure
    Failed { error: String, details: String },
    /// Still running (or synthetic `queued` for a fresh missing record)
    Progress(ProgressView),
    /// Unknown job id outside the freshness window
    NotFound,
}

/// Progress payload echoed while a job is non-terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressView {
    /// Always `false`; distinguishes progress bodies from results
    pub success: bool,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
    pub job_id: JobId,
}

/// Resolve the stored record (or its absence) into a caller view.
pub fn resolve_status(job_id: &JobId, record: Option<JobRecord>, now: DateTime<Utc>) -> JobView {
    match record {
        Some(record) => resolve_record(record),
        None => resolve_missing(job_id, now),
    }
}

fn resolve_record(record: JobRecord) -> JobView {
    match record.status {
        JobStatus::Done => match record.result {
            Some(result) => JobView::Done(result),
            // Corrupt store state; surface as a failure rather than a lie
            None => JobView::Failed {
                error: ERROR_SUMMARY.to_string(),
                details: "job record is marked done but carries no result".to_string(),
            },
        },
        JobStatus::Error => JobView::Failed {
            error: ERROR_SUMMARY.to_string(),
            details: record
                .error
                .map(|e| e.message)
                .unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
        },
        _ => JobView::Progress(ProgressView {
            success: false,
            status: record.status,
            stage: record.stage,
            updated_at: record.updated_at,
            meta: record.meta,
            job_id: record.job_id,
        }),
    }
}

fn resolve_missing(job_id: &JobId, now: DateTime<Utc>) -> JobView {
    match job_id.creation_time() {
        // A negative age (embedded time ahead of our clock) still counts as
        // fresh; that is clock skew, not a stale id.
        Some(created) if now.signed_duration_since(created) <= FRESHNESS_WINDOW => {
            JobView::Progress(ProgressView {
                success: false,
                status: JobStatus::Queued,
                stage: None,
                updated_at: None,
                meta: None,
                job_id: job_id.clone(),
            })
        }
        _ => JobView::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fscribe_models::{JobFailure, Transcript};

    fn id_created_at(now: DateTime<Utc>, age: Duration) -> JobId {
        let millis = (now - age).timestamp_millis();
        JobId::from_string(format!("abc123-{}-deadbeef1234", millis))
    }

    fn processing_record(job_id: &JobId) -> JobRecord {
        JobRecord::new(job_id.clone(), "https://host/v.mp4", "abc123", 0.15).start()
    }

    #[test]
    fn test_missing_record_within_window_reads_as_queued() {
        let now = Utc::now();
        let job_id = id_created_at(now, Duration::minutes(5));

        match resolve_status(&job_id, None, now) {
            JobView::Progress(progress) => {
                assert!(!progress.success);
                assert_eq!(progress.status, JobStatus::Queued);
                assert_eq!(progress.job_id, job_id);
                assert!(progress.stage.is_none());
            }
            other => panic!("expected queued progress, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_record_outside_window_is_not_found() {
        let now = Utc::now();
        let job_id = id_created_at(now, Duration::minutes(20));
        assert_eq!(resolve_status(&job_id, None, now), JobView::NotFound);
    }

    #[test]
    fn test_missing_record_with_unparseable_id_is_not_found() {
        let now = Utc::now();
        assert_eq!(
            resolve_status(&JobId::from_string("garbage"), None, now),
            JobView::NotFound
        );
    }

    #[test]
    fn test_clock_skew_counts_as_fresh() {
        let now = Utc::now();
        let job_id = id_created_at(now, Duration::minutes(-2));
        assert!(matches!(
            resolve_status(&job_id, None, now),
            JobView::Progress(_)
        ));
    }

    #[test]
    fn test_processing_record_echoes_progress_fields() {
        let now = Utc::now();
        let job_id = JobId::generate("abc123");
        let record = processing_record(&job_id).with_stage("downloading");

        match resolve_status(&job_id, Some(record), now) {
            JobView::Progress(progress) => {
                assert_eq!(progress.status, JobStatus::Processing);
                assert_eq!(progress.stage.as_deref(), Some("downloading"));
                assert!(progress.updated_at.is_some());
            }
            other => panic!("expected progress, got {:?}", other),
        }
    }

    #[test]
    fn test_done_record_returns_flattened_result() {
        let now = Utc::now();
        let job_id = JobId::generate("abc123");
        let result = JobResult::new(Vec::new(), Transcript::unavailable(), "abc123");
        let record = processing_record(&job_id).complete(result.clone());

        assert_eq!(
            resolve_status(&job_id, Some(record), now),
            JobView::Done(result)
        );
    }

    #[test]
    fn test_error_record_returns_failure_details() {
        let now = Utc::now();
        let job_id = JobId::generate("abc123");
        let record = processing_record(&job_id)
            .fail(JobFailure::new("Video download failed: HTTP 404"));

        match resolve_status(&job_id, Some(record), now) {
            JobView::Failed { error, details } => {
                assert_eq!(error, ERROR_SUMMARY);
                assert_eq!(details, "Video download failed: HTTP 404");
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_terminal_views_are_idempotent() {
        let now = Utc::now();
        let job_id = JobId::generate("abc123");
        let result = JobResult::new(Vec::new(), Transcript::unavailable(), "abc123");
        let record = processing_record(&job_id).complete(result);

        let first = resolve_status(&job_id, Some(record.clone()), now);
        let second = resolve_status(&job_id, Some(record), now + Duration::hours(1));
        assert_eq!(first, second);
    }

    #[test]
    fn test_done_without_result_is_reported_as_failure() {
        let now = Utc::now();
        let job_id = JobId::generate("abc123");
        let mut record = processing_record(&job_id);
        record.status = JobStatus::Done; // simulate a corrupt store document

        assert!(matches!(
            resolve_status(&job_id, Some(record), now),
            JobView::Failed { .. }
        ));
    }
}
