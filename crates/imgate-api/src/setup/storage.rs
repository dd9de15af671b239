//! Storage backend setup

use anyhow::{Context, Result};
use imgate_core::Config;
use imgate_storage::{create_storage, Storage};
use std::sync::Arc;

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let storage = create_storage(config)
        .await
        .with_context(|| format!("Failed to initialize {} storage", config.storage_backend()))?;

    tracing::info!(backend = %storage.backend_type(), "Storage backend ready");
    Ok(storage)
}
