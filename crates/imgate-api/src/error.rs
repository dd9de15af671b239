//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. Library errors (`StorageError`,
//! `ProcessingError`) convert into [`AppError`] here, and every error renders
//! as the same JSON envelope:
//!
//! ```json
//! {"status": 404, "message": "File not found: abc.png", "data": null, "code": "NOT_FOUND"}
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use imgate_core::{AppError, ErrorMetadata, LogLevel};
use imgate_processing::ProcessingError;
use imgate_storage::StorageError;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// HTTP status code, repeated in the body
    pub status: u16,
    pub message: String,
    /// Always null for errors
    #[schema(value_type = Option<Object>)]
    pub data: Option<serde_json::Value>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Internal error text; only present outside production for non-sensitive errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn from_app_error(error: &AppError, include_details: bool) -> Self {
        Self {
            status: error.http_status_code(),
            message: error.client_message(),
            data: None,
            code: error.error_code().to_string(),
            details: include_details.then(|| error.detailed_message()),
        }
    }
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rules: IntoResponse and AppError both live in other crates)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let include_details = !is_production_env() && !app_error.is_sensitive();
        let body = ErrorResponse::from_app_error(app_error, include_details);

        (status, Json(body)).into_response()
    }
}

// Convert domain errors to HttpAppError

fn storage_error(err: StorageError) -> AppError {
    match err {
        StorageError::NotFound(key) => AppError::NotFound(key),
        StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
        StorageError::UploadFailed(msg) => AppError::StorageFailure(msg),
        StorageError::DownloadFailed(msg) => AppError::StorageFailure(msg),
        StorageError::IoError(err) => AppError::StorageFailure(format!("IO error: {}", err)),
        StorageError::ConfigError(msg) => AppError::Internal(msg),
    }
}

fn processing_error(err: ProcessingError) -> AppError {
    match err {
        ProcessingError::InvalidFilename(msg) => AppError::InvalidInput(msg),
        ProcessingError::InvalidDimensions(msg) => AppError::InvalidInput(msg),
        ProcessingError::Storage(err) => storage_error(err),
        err @ ProcessingError::ProcessFailed { .. } => AppError::TransformFailure(err.to_string()),
        err @ ProcessingError::Spawn { .. } => AppError::TransformFailure(err.to_string()),
        err @ ProcessingError::Timeout { .. } => AppError::TransformTimeout(err.to_string()),
        err @ ProcessingError::Cancelled { .. } => AppError::Unavailable(err.to_string()),
        ProcessingError::Io(err) => AppError::Internal(format!("IO error: {}", err)),
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(storage_error(err))
    }
}

impl From<ProcessingError> for HttpAppError {
    fn from(err: ProcessingError) -> Self {
        HttpAppError(processing_error(err))
    }
}
