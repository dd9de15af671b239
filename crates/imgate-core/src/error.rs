//! Error types module
//!
//! Every failure a request can hit is expressed as an [`AppError`]. The
//! [`ErrorMetadata`] trait tells the HTTP layer how each variant is presented
//! (status, machine code, client message) and logged, so all handlers share one
//! response contract.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like timeouts
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "STORAGE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Generic message for failures whose cause is not the client's business.
pub const GENERIC_SERVER_ERROR: &str = "Server error";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The multipart `image` field was absent or the body could not be read.
    #[error("Upload failed: {0}")]
    MissingUpload(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Storage error: {0}")]
    StorageFailure(String),

    #[error("Transform failed: {0}")]
    TransformFailure(String),

    #[error("Transform timed out: {0}")]
    TransformTimeout(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", false, LogLevel::Debug),
        AppError::MissingUpload(_) => (500, "UPLOAD_FAILED", false, LogLevel::Warn),
        AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE", false, LogLevel::Debug),
        AppError::StorageFailure(_) => (500, "STORAGE_ERROR", true, LogLevel::Error),
        AppError::TransformFailure(_) => (500, "TRANSFORM_FAILED", false, LogLevel::Error),
        AppError::TransformTimeout(_) => (504, "TRANSFORM_TIMEOUT", false, LogLevel::Warn),
        AppError::Unavailable(_) => (503, "SERVICE_UNAVAILABLE", false, LogLevel::Warn),
        AppError::NotFound(_) => (404, "NOT_FOUND", false, LogLevel::Debug),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", true, LogLevel::Error),
        AppError::InternalWithSource { .. } => (500, "INTERNAL_ERROR", true, LogLevel::Error),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::MissingUpload(_) => "MissingUpload",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::StorageFailure(_) => "StorageFailure",
            AppError::TransformFailure(_) => "TransformFailure",
            AppError::TransformTimeout(_) => "TransformTimeout",
            AppError::Unavailable(_) => "Unavailable",
            AppError::NotFound(_) => "NotFound",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::MissingUpload(_) => GENERIC_SERVER_ERROR.to_string(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::StorageFailure(_) => GENERIC_SERVER_ERROR.to_string(),
            AppError::TransformFailure(_) => GENERIC_SERVER_ERROR.to_string(),
            AppError::TransformTimeout(_) => "Image processing timed out".to_string(),
            AppError::Unavailable(_) => "Service is shutting down".to_string(),
            AppError::NotFound(ref name) => format!("File not found: {}", name),
            AppError::Internal(_) => GENERIC_SERVER_ERROR.to_string(),
            AppError::InternalWithSource { .. } => GENERIC_SERVER_ERROR.to_string(),
        }
    }
}
