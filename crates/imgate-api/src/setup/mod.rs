//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use imgate_core::Config;
use imgate_storage::Storage;
use std::sync::Arc;

/// Initialize the entire application: telemetry, storage, state and routes
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.log_format())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    let storage = storage::setup_storage(&config).await?;

    build_app(config, storage)
}

/// Build state and router around an existing storage backend
pub fn build_app(
    config: Config,
    storage: Arc<dyn Storage>,
) -> Result<(Arc<AppState>, axum::Router)> {
    let state = Arc::new(AppState::new(config.clone(), storage));
    let router = routes::setup_routes(&config, state.clone())?;
    Ok((state, router))
}
