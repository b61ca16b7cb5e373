//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, ApiError>`; both the store's
//! `AppError` and the pipeline's `PipelineError` convert into `ApiError` and
//! render consistently (status, JSON body, logging).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use storereel_core::{AppError, ErrorMetadata, LogLevel, PipelineError};

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable error code for programmatic handling
    pub code: String,
}

#[derive(Debug)]
pub enum ApiError {
    App(AppError),
    Pipeline(PipelineError),
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError::App(err)
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        ApiError::Pipeline(err)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::App(AppError::from(err))
    }
}

fn pipeline_error_parts(err: &PipelineError) -> (StatusCode, &'static str) {
    match err {
        PipelineError::Validation(_) => (StatusCode::BAD_REQUEST, "UPLOAD_VALIDATION"),
        PipelineError::RemoteService(_) => (StatusCode::BAD_GATEWAY, "ASSET_SERVICE_ERROR"),
        PipelineError::Transfer(_) => (StatusCode::BAD_GATEWAY, "TRANSFER_FAILED"),
        PipelineError::Timeout { .. } => (StatusCode::GATEWAY_TIMEOUT, "PROCESSING_TIMEOUT"),
        PipelineError::SessionActive => (StatusCode::CONFLICT, "UPLOAD_IN_PROGRESS"),
        PipelineError::Cancelled => (StatusCode::CONFLICT, "UPLOAD_CANCELLED"),
        PipelineError::Commit(_) => (StatusCode::INTERNAL_SERVER_ERROR, "COMMIT_FAILED"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::App(err) => {
                match err.log_level() {
                    LogLevel::Debug => tracing::debug!(error = %err, "request failed"),
                    LogLevel::Warn => tracing::warn!(error = %err, "request failed"),
                    LogLevel::Error => tracing::error!(error = %err, "request failed"),
                }
                let status = StatusCode::from_u16(err.http_status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, err.error_code(), err.client_message())
            }
            ApiError::Pipeline(err) => {
                tracing::warn!(error = %err, "upload request failed");
                let (status, code) = pipeline_error_parts(err);
                (status, code, err.to_string())
            }
        };

        let body = Json(ErrorResponse {
            error: message,
            code: code.to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storereel_core::TransferFailure;

    #[test]
    fn pipeline_errors_map_to_gateway_statuses() {
        let (status, code) = pipeline_error_parts(&PipelineError::RemoteService("x".into()));
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(code, "ASSET_SERVICE_ERROR");

        let (status, _) =
            pipeline_error_parts(&PipelineError::Transfer(TransferFailure::Status(500)));
        assert_eq!(status, StatusCode::BAD_GATEWAY);

        let (status, code) = pipeline_error_parts(&PipelineError::Timeout { attempts: 60 });
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(code, "PROCESSING_TIMEOUT");
    }

    #[test]
    fn busy_session_is_a_conflict() {
        let (status, code) = pipeline_error_parts(&PipelineError::SessionActive);
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(code, "UPLOAD_IN_PROGRESS");
    }

    #[test]
    fn local_validation_is_a_bad_request() {
        let (status, code) = pipeline_error_parts(&PipelineError::Validation("not video".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "UPLOAD_VALIDATION");
    }
}
