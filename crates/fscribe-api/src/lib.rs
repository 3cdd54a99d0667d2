//! Axum HTTP API server for FrameScribe.
//!
//! This crate provides:
//! - Non-blocking job admission (`POST /api/process`)
//! - Status/result polling (`GET /api/process/{jobId}`)
//! - Health probes, CORS, request logging, and body-size limits

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
