//! Shared key validation for storage backends.
//!
//! Keys come straight from request paths on the retrieval endpoint, so every
//! backend runs them through [`validate_key`] before use.

use crate::traits::{StorageError, StorageResult};

/// Longest key accepted, matching common filesystem name limits.
pub const MAX_KEY_LENGTH: usize = 255;

/// Reject keys that could escape the flat storage namespace.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }

    if key.len() > MAX_KEY_LENGTH {
        return Err(StorageError::InvalidKey(format!(
            "Storage key exceeds {} bytes",
            MAX_KEY_LENGTH
        )));
    }

    if key.contains('/') || key.contains('\\') || key.contains("..") {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }

    if key.starts_with('.') {
        return Err(StorageError::InvalidKey(
            "Storage key must not start with '.'".to_string(),
        ));
    }

    if key.chars().any(|c| c.is_control()) {
        return Err(StorageError::InvalidKey(
            "Storage key contains control characters".to_string(),
        ));
    }

    Ok(())
}
