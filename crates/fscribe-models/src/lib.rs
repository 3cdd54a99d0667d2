//! Shared data models for the FrameScribe backend.
//!
//! This crate provides Serde-serializable types for:
//! - Job identifiers and their documented encoding
//! - Job records and the status state machine
//! - Completed-job payloads (screenshots + transcript)
//! - Transcript segments and timestamp formatting

pub mod job;
pub mod result;
pub mod timestamp;
pub mod transcript;

// Re-export common types
pub use job::{JobFailure, JobId, JobRecord, JobStatus, DEFAULT_SENSITIVITY};
pub use result::{JobResult, Screenshot};
pub use timestamp::format_timestamp;
pub use transcript::{
    Transcript, TranscriptSegment, TRANSCRIPT_FAILED, TRANSCRIPT_UNAVAILABLE,
};
