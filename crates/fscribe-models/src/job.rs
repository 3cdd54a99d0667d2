//! Job identifiers, status state machine, and the persisted job record.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::result::JobResult;

/// Default scene-change threshold when the caller does not supply one.
pub const DEFAULT_SENSITIVITY: f64 = 0.15;

/// Unique identifier for a processing job.
///
/// Encoded as `<correlationId>-<creationEpochMillis>-<hexSuffix>`. The
/// embedded creation time lets the retrieval path distinguish a freshly
/// admitted job the store has not surfaced yet from one that never existed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(String);

/// Length of the random hex suffix appended to every job id.
const SUFFIX_LEN: usize = 12;

impl JobId {
    /// Generate a new id for the given correlation id.
    ///
    /// The random suffix guarantees uniqueness across repeated admissions
    /// with identical caller input.
    pub fn generate(correlation_id: &str) -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!(
            "{}-{}-{}",
            correlation_id,
            Utc::now().timestamp_millis(),
            &suffix[..SUFFIX_LEN]
        ))
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Creation time embedded in the id, if parseable.
    ///
    /// Correlation ids may themselves contain hyphens, so the millis
    /// component is located by position from the end: the final segment is
    /// the random suffix, the one before it the epoch millis.
    pub fn creation_time(&self) -> Option<DateTime<Utc>> {
        let mut segments = self.0.rsplit('-');
        let _suffix = segments.next()?;
        let millis: i64 = segments.next()?.parse().ok()?;
        DateTime::from_timestamp_millis(millis)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Job state in the status store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Admitted but not yet durably recorded
    #[default]
    Queued,
    /// Pipeline stages are running
    Processing,
    /// Completed with a result
    Done,
    /// Failed with a captured error
    Error,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Done => "done",
            JobStatus::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Error)
    }
}

/// Terminal failure details captured into the job record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobFailure {
    /// Human-readable summary of what went wrong
    pub message: String,
    /// Underlying cause chain, stderr tail, or similar detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

impl JobFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            diagnostic: None,
        }
    }

    pub fn with_diagnostic(mut self, diagnostic: impl Into<String>) -> Self {
        self.diagnostic = Some(diagnostic.into());
        self
    }
}

/// The durable job record, persisted after every lifecycle transition.
///
/// `result` and `error` are mutually exclusive; each implies the matching
/// terminal status. Transitions are monotonic: once a record is terminal,
/// `start`, `complete`, and `fail` leave it unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub job_id: JobId,

    pub status: JobStatus,

    /// Advisory label for the active pipeline step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,

    /// Remote video locator supplied at admission
    pub source_url: String,

    /// Caller-supplied correlation id, echoed as `videoId` in results
    pub video_id: String,

    /// Scene-change threshold in (0, 1]
    pub sensitivity: f64,

    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<DateTime<Utc>>,

    /// Present only when `status` is `done`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<JobResult>,

    /// Present only when `status` is `error`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JobFailure>,

    /// Free-form metadata echoed in progress responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl JobRecord {
    /// Create a new record at admission time.
    pub fn new(
        job_id: JobId,
        source_url: impl Into<String>,
        video_id: impl Into<String>,
        sensitivity: f64,
    ) -> Self {
        Self {
            job_id,
            status: JobStatus::Queued,
            stage: None,
            source_url: source_url.into(),
            video_id: video_id.into(),
            sensitivity,
            created_at: Utc::now(),
            updated_at: None,
            completed_at: None,
            failed_at: None,
            result: None,
            error: None,
            meta: None,
        }
    }

    /// Move into the active `processing` state.
    pub fn start(mut self) -> Self {
        if self.status.is_terminal() {
            return self;
        }
        self.status = JobStatus::Processing;
        self.updated_at = Some(Utc::now());
        self
    }

    /// Record the active pipeline step.
    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        if self.status.is_terminal() {
            return self;
        }
        self.stage = Some(stage.into());
        self.updated_at = Some(Utc::now());
        self
    }

    /// Mark the job done with its assembled result.
    pub fn complete(mut self, result: JobResult) -> Self {
        if self.status.is_terminal() {
            return self;
        }
        self.status = JobStatus::Done;
        self.stage = None;
        self.result = Some(result);
        self.completed_at = Some(Utc::now());
        self.updated_at = self.completed_at;
        self
    }

    /// Mark the job failed with the captured error.
    pub fn fail(mut self, failure: JobFailure) -> Self {
        if self.status.is_terminal() {
            return self;
        }
        self.status = JobStatus::Error;
        self.error = Some(failure);
        self.failed_at = Some(Utc::now());
        self.updated_at = self.failed_at;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::Transcript;

    fn sample_result() -> JobResult {
        JobResult::new(Vec::new(), Transcript::unavailable(), "vid123")
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = JobId::generate("file42");
        let b = JobId::generate("file42");
        assert_ne!(a, b);
    }

    #[test]
    fn test_id_embeds_creation_time() {
        let before = Utc::now().timestamp_millis();
        let id = JobId::generate("abc123");
        let after = Utc::now().timestamp_millis();

        let created = id.creation_time().expect("parseable creation time");
        assert!(created.timestamp_millis() >= before);
        assert!(created.timestamp_millis() <= after);
    }

    #[test]
    fn test_creation_time_with_hyphenated_correlation_id() {
        let id = JobId::from_string("drive-file-7-1723100000000-deadbeef1234");
        let created = id.creation_time().unwrap();
        assert_eq!(created.timestamp_millis(), 1723100000000);
    }

    #[test]
    fn test_creation_time_unparseable() {
        assert!(JobId::from_string("garbage").creation_time().is_none());
        assert!(JobId::from_string("a-b-c").creation_time().is_none());
        assert!(JobId::from_string("").creation_time().is_none());
    }

    #[test]
    fn test_record_transitions() {
        let record = JobRecord::new(JobId::generate("abc123"), "https://host/v.mp4", "abc123", 0.15);
        assert_eq!(record.status, JobStatus::Queued);

        let started = record.start();
        assert_eq!(started.status, JobStatus::Processing);
        assert!(started.updated_at.is_some());

        let done = started.complete(sample_result());
        assert_eq!(done.status, JobStatus::Done);
        assert!(done.result.is_some());
        assert!(done.error.is_none());
        assert!(done.completed_at.is_some());
    }

    #[test]
    fn test_terminal_states_are_absorbing() {
        let record = JobRecord::new(JobId::generate("abc123"), "https://host/v.mp4", "abc123", 0.15);
        let done = record.start().complete(sample_result());

        let still_done = done.clone().fail(JobFailure::new("late failure"));
        assert_eq!(still_done.status, JobStatus::Done);
        assert!(still_done.error.is_none());

        let failed = JobRecord::new(JobId::generate("x1"), "https://host/v.mp4", "x1", 0.15)
            .start()
            .fail(JobFailure::new("boom").with_diagnostic("stage detail"));
        assert_eq!(failed.status, JobStatus::Error);
        assert!(failed.result.is_none());
        assert!(failed.clone().complete(sample_result()).result.is_none());
    }

    #[test]
    fn test_record_round_trips_as_camel_case_json() {
        let record = JobRecord::new(
            JobId::from_string("abc123-1723100000000-deadbeef1234"),
            "https://host/v.mp4",
            "abc123",
            0.3,
        )
        .start();

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["jobId"], "abc123-1723100000000-deadbeef1234");
        assert_eq!(json["status"], "processing");
        assert_eq!(json["videoId"], "abc123");
        assert!(json.get("result").is_none());

        let back: JobRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back.status, JobStatus::Processing);
        assert_eq!(back.sensitivity, 0.3);
    }
}
