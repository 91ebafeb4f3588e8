//! Route definitions for Senti Server.
//!
//! Provides endpoints for analyzing review uploads, downloading results, fetching an
//! example document, and health checks.

use axum::{
    body::Bytes,
    extract::{
        multipart::MultipartRejection,
        rejection::BytesRejection,
        DefaultBodyLimit, Multipart, State,
    },
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use senti_common::config::Config;
use senti_common::Error;
use senti_core::{
    analyze_upload, AnalysisResult, SentimentScorer, UploadError, UploadErrorKind, EXAMPLE_INPUT,
    RESULT_MIME_TYPE,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::middleware::trace_middleware;
use crate::SERVICE_NAME;

/// Multipart field that carries the uploaded document.
pub const UPLOAD_FIELD: &str = "file";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub scorer: Arc<dyn SentimentScorer>,
    pub download_file_name: Arc<str>,
}

/// Analysis outcome returned to the client.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AnalyzeResponse {
    Success {
        result: AnalysisResult,
        file_name: String,
    },
    Warning {
        message: String,
        code: String,
    },
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub service: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Build the complete router using the configured scorer.
pub fn build_all_routes(config: &Config, scorer: Arc<dyn SentimentScorer>) -> Router {
    let state = AppState {
        scorer,
        download_file_name: config.analysis.download_file_name.as_str().into(),
    };

    Router::new()
        .merge(analysis_routes(state))
        .merge(health_routes())
        .layer(DefaultBodyLimit::max(config.server.max_upload_bytes))
        .layer(middleware::from_fn(trace_middleware))
}

/// Build the analysis routes.
pub fn analysis_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/analyze", post(analyze_file_handler))
        .route("/api/v1/analyze/json", post(analyze_json_handler))
        .route("/api/v1/analyze/download", post(download_handler))
        .route("/api/v1/example", get(example_handler))
        .with_state(state)
}

/// Build health check routes.
pub fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/health", get(health_handler))
}

// ─────────────────────────────────────────────────────────────────────────────
// Error Mapping
// ─────────────────────────────────────────────────────────────────────────────

/// Classify an upload failure for status code selection.
fn service_error(err: &UploadError) -> Error {
    let message = err.to_string();
    match err.kind() {
        UploadErrorKind::Parse => Error::InvalidInput(message),
        UploadErrorKind::Structural | UploadErrorKind::EmptyInput => Error::Unprocessable(message),
        UploadErrorKind::Unexpected => Error::Internal(message),
    }
}

fn error_response(status: StatusCode, error: impl Into<String>, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

/// Report a body the extractors could not read.
///
/// Oversized bodies are tagged `PAYLOAD_TOO_LARGE` regardless of which extractor hit
/// the limit.
fn rejected_body(status: StatusCode, reason: String, code: &str) -> ApiError {
    let code = if status == StatusCode::PAYLOAD_TOO_LARGE {
        "PAYLOAD_TOO_LARGE"
    } else {
        code
    };
    tracing::info!(status = status.as_u16(), code, error = %reason, "Rejected request body");
    error_response(status, reason, code)
}

/// Turn a failed analysis into a warning body or an error response.
fn upload_failure(err: UploadError) -> Response {
    if err.is_warning() {
        tracing::warn!(code = err.code(), "{}", err);
        return Json(AnalyzeResponse::Warning {
            message: err.to_string(),
            code: err.code().into(),
        })
        .into_response();
    }

    let status = StatusCode::from_u16(service_error(&err).status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if status.is_server_error() {
        tracing::error!(code = err.code(), error = %err, "Review analysis failed");
    } else {
        tracing::info!(code = err.code(), error = %err, "Rejected review upload");
    }

    error_response(status, err.to_string(), err.code()).into_response()
}

fn analyze(state: &AppState, bytes: &[u8]) -> Result<AnalysisResult, UploadError> {
    tracing::debug!(bytes = bytes.len(), "Analyzing review document");
    analyze_upload(bytes, state.scorer.as_ref())
}

fn success(state: &AppState, result: AnalysisResult) -> Response {
    Json(AnalyzeResponse::Success {
        result,
        file_name: state.download_file_name.to_string(),
    })
    .into_response()
}

// ─────────────────────────────────────────────────────────────────────────────
// Analysis Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Read the uploaded document out of a multipart form.
async fn read_upload_field(multipart: &mut Multipart) -> Result<Bytes, ApiError> {
    loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| rejected_body(e.status(), e.body_text(), "INVALID_MULTIPART"))?;

        let Some(field) = field else {
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                format!("Multipart form must contain a '{UPLOAD_FIELD}' field."),
                "FILE_MISSING",
            ));
        };

        if field.name() == Some(UPLOAD_FIELD) {
            return field
                .bytes()
                .await
                .map_err(|e| rejected_body(e.status(), e.body_text(), "INVALID_MULTIPART"));
        }
    }
}

/// Analyze a document sent as a multipart file upload.
async fn analyze_file_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(e) => {
            return rejected_body(e.status(), e.body_text(), "INVALID_MULTIPART").into_response();
        }
    };

    let bytes = match read_upload_field(&mut multipart).await {
        Ok(bytes) => bytes,
        Err(err) => return err.into_response(),
    };

    match analyze(&state, &bytes) {
        Ok(result) => success(&state, result),
        Err(err) => upload_failure(err),
    }
}

/// Analyze a document sent as the raw request body.
async fn analyze_json_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(e) => {
            return rejected_body(e.status(), e.body_text(), "INVALID_REQUEST").into_response();
        }
    };

    match analyze(&state, &body) {
        Ok(result) => success(&state, result),
        Err(err) => upload_failure(err),
    }
}

/// Analyze a document and return the result as a downloadable file.
async fn download_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(e) => {
            return rejected_body(e.status(), e.body_text(), "INVALID_REQUEST").into_response();
        }
    };

    let result = match analyze(&state, &body) {
        Ok(result) => result,
        Err(err) => return upload_failure(err),
    };

    let rendered = match result.to_pretty_json() {
        Ok(rendered) => rendered,
        Err(e) => {
            tracing::error!(error = %e, "Failed to render analysis result");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Unexpected Error: {e}"),
                "UNEXPECTED_ERROR",
            )
            .into_response();
        }
    };

    let disposition = format!("attachment; filename=\"{}\"", state.download_file_name);
    (
        [
            (header::CONTENT_TYPE, RESULT_MIME_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        rendered,
    )
        .into_response()
}

/// Return an example of a valid upload.
async fn example_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, RESULT_MIME_TYPE)], EXAMPLE_INPUT)
}

// ─────────────────────────────────────────────────────────────────────────────
// Health Handlers
// ─────────────────────────────────────────────────────────────────────────────

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        service: SERVICE_NAME.into(),
    })
}
