//! Job orchestration for FrameScribe.
//!
//! This crate owns the job lifecycle: admission, the detached background
//! task driving the pipeline stages (download → keyframes → audio →
//! transcription), status persistence after each transition, scratch
//! cleanup on every path, and the retrieval view with the eventual
//! consistency bridging heuristic.

pub mod error;
pub mod orchestrator;
pub mod view;

pub use error::{PipelineError, PipelineResult};
pub use orchestrator::{stage, AdmissionRequest, Orchestrator};
pub use view::{resolve_status, JobView, ProgressView, FRESHNESS_WINDOW};
