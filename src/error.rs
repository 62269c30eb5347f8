//! Error taxonomy shared by the pipeline, the query layer and the HTTP
//! surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Result type for pipeline and query operations
pub type AnalyzeResult<T> = Result<T, AnalyzeError>;

/// Errors surfaced to callers; never panics, never swallowed
#[derive(Debug, Clone, Error)]
pub enum AnalyzeError {
    /// Malformed dataset row or dataset shape
    #[error("schema error: {0}")]
    Schema(String),

    /// Odds value with no defined probability conversion
    #[error("odds error: {0}")]
    Odds(String),

    /// Bad query parameter
    #[error("validation error: {0}")]
    Validation(String),

    /// Dataset file missing or unreadable
    #[error("data unavailable: {0}")]
    DataUnavailable(String),
}

impl AnalyzeError {
    /// Machine-readable kind reported in error responses
    pub fn kind(&self) -> &'static str {
        match self {
            AnalyzeError::Schema(_) => "schema_error",
            AnalyzeError::Odds(_) => "odds_error",
            AnalyzeError::Validation(_) => "validation_error",
            AnalyzeError::DataUnavailable(_) => "data_unavailable",
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request: the caller sent something unusable
            AnalyzeError::Validation(_) => StatusCode::BAD_REQUEST,

            // 500 Internal Server Error: the dataset itself is defective
            AnalyzeError::Schema(_) | AnalyzeError::Odds(_) => StatusCode::INTERNAL_SERVER_ERROR,

            // 503 Service Unavailable: the process is up but has no data
            AnalyzeError::DataUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
    pub code: u16,
}

impl From<AnalyzeError> for ErrorResponse {
    fn from(err: AnalyzeError) -> Self {
        Self {
            error: err.kind(),
            code: err.status_code().as_u16(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for AnalyzeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}
