//! Job admission and polling handlers.
//!
//! Admission returns immediately with the job id; the pipeline runs as a
//! detached background task. Callers poll the status endpoint until they
//! observe a terminal payload.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

use fscribe_models::{JobId, DEFAULT_SENSITIVITY};
use fscribe_pipeline::{resolve_status, AdmissionRequest, JobView};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// ============================================================================
// Types
// ============================================================================

/// Request to process a video.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    /// Remote video URL
    pub source_url: String,
    /// Opaque caller correlation id, echoed back as `videoId`
    pub correlation_id: String,
    /// Scene-change threshold in (0, 1]; lower yields more keyframes
    #[serde(default)]
    pub sensitivity: Option<f64>,
}

/// Admission response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    pub success: bool,
    pub job_id: JobId,
}

/// Terminal failure payload.
#[derive(Serialize)]
pub struct FailurePayload {
    pub error: String,
    pub details: String,
}

/// Unknown-job payload.
#[derive(Serialize)]
pub struct NotFoundPayload {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Admit a processing job.
///
/// The 202 signals "accepted for async processing", not completion.
pub async fn submit_job(
    State(state): State<AppState>,
    Json(request): Json<ProcessRequest>,
) -> ApiResult<(StatusCode, Json<ProcessResponse>)> {
    let admission = validate_request(request)?;

    let job_id = state.orchestrator.admit(admission);
    info!(job_id = %job_id, "Accepted processing request");

    Ok((
        StatusCode::ACCEPTED,
        Json(ProcessResponse {
            success: true,
            job_id,
        }),
    ))
}

/// Poll the status of a job.
///
/// Returns the flattened result payload once done, an error descriptor on
/// failure, a progress payload while running, and 404 for unknown ids that
/// fall outside the freshness window.
pub async fn job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Response> {
    let job_id = JobId::from_string(job_id);
    let record = state.jobs.load(&job_id).await?;

    Ok(match resolve_status(&job_id, record, Utc::now()) {
        JobView::Done(result) => (StatusCode::OK, Json(result)).into_response(),
        JobView::Failed { error, details } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(FailurePayload { error, details }),
        )
            .into_response(),
        JobView::Progress(progress) => (StatusCode::ACCEPTED, Json(progress)).into_response(),
        JobView::NotFound => (
            StatusCode::NOT_FOUND,
            Json(NotFoundPayload {
                error: "Job not found".to_string(),
            }),
        )
            .into_response(),
    })
}

// ============================================================================
// Validation
// ============================================================================

const MAX_CORRELATION_ID_LEN: usize = 64;

fn validate_request(request: ProcessRequest) -> Result<AdmissionRequest, ApiError> {
    let source_url = request.source_url.trim().to_string();
    if source_url.is_empty() {
        return Err(ApiError::bad_request("sourceUrl is required"));
    }

    let parsed =
        Url::parse(&source_url).map_err(|_| ApiError::bad_request("sourceUrl must be a valid URL"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ApiError::bad_request("sourceUrl must use http or https"));
    }
    if parsed.host_str().is_none() {
        return Err(ApiError::bad_request("sourceUrl must have a host"));
    }

    if !is_valid_correlation_id(&request.correlation_id) {
        return Err(ApiError::bad_request(format!(
            "correlationId must be 1-{} characters of [A-Za-z0-9_-]",
            MAX_CORRELATION_ID_LEN
        )));
    }

    let sensitivity = request.sensitivity.unwrap_or(DEFAULT_SENSITIVITY);
    if !(sensitivity > 0.0 && sensitivity <= 1.0) {
        return Err(ApiError::bad_request("sensitivity must be within (0, 1]"));
    }

    Ok(AdmissionRequest {
        source_url,
        correlation_id: request.correlation_id,
        sensitivity,
    })
}

/// Validate correlation id format to prevent path/key injection.
pub fn is_valid_correlation_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_CORRELATION_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
