//! imgate core library
//!
//! Configuration, error types and the storage backend selector shared by every
//! imgate crate.

pub mod config;
pub mod error;
pub mod storage_types;

pub use config::{Config, LogFormat, ProcessingConfig, ServerConfig};
pub use error::{AppError, ErrorMetadata, LogLevel, GENERIC_SERVER_ERROR};
pub use storage_types::StorageBackend;
