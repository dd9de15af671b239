use imgate_storage::StorageError;
use std::time::Duration;

/// Errors raised while naming, transforming or storing an image
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("{program} exited with status {exit_code:?}: {stderr}")]
    ProcessFailed {
        program: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("{program} did not finish within {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    #[error("{program} was cancelled")]
    Cancelled { program: String },

    #[error("Failed to start {program}: {message}")]
    Spawn { program: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
