//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// Handlers and the transformer only ever talk to this trait, so the backend
/// (local directory, in-memory map) is a deployment choice.
///
/// Objects are immutable once written: the service never overwrites or
/// deletes a key, and every key it writes is freshly generated.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store `data` under `key` and return the key.
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<String>;

    /// Fetch the bytes stored under `key`.
    ///
    /// Returns [`StorageError::NotFound`] when nothing was stored there.
    async fn get(&self, key: &str) -> StorageResult<Bytes>;

    /// Check if an object exists
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
