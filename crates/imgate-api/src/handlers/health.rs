use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthCheckResponse {
    pub status: String,
    pub storage: String,
    pub storage_backend: String,
    pub ffmpeg_path: String,
    pub png_compressor_path: String,
    /// Transform slots not currently in use
    pub available_transform_slots: usize,
    pub max_concurrent_transforms: usize,
}

/// Liveness probe - always 200 while the process can respond
#[utoipa::path(
    get,
    path = "/live",
    tag = "health",
    responses((status = 200, description = "Process is alive"))
)]
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "alive"
        })),
    )
}

/// Health check - 503 when the storage backend does not answer
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service healthy", body = HealthCheckResponse),
        (status = 503, description = "Storage unavailable", body = HealthCheckResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    const TIMEOUT: Duration = Duration::from_secs(5);

    let runner = state.images.transformer().runner();
    let mut response = HealthCheckResponse {
        status: "healthy".to_string(),
        storage: "unknown".to_string(),
        storage_backend: state.storage.backend_type().to_string(),
        ffmpeg_path: state.config.ffmpeg_path().to_string(),
        png_compressor_path: state.config.png_compressor_path().to_string(),
        available_transform_slots: runner.available_permits(),
        max_concurrent_transforms: runner.max_concurrent(),
    };

    // A lightweight exists check verifies the backend without writing anything
    let healthy = match tokio::time::timeout(
        TIMEOUT,
        state.storage.exists("health-check-non-existent-key"),
    )
    .await
    {
        Ok(Ok(_)) => {
            response.storage = "healthy".to_string();
            true
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Storage health check failed");
            response.storage = format!("unhealthy: {}", e);
            false
        }
        Err(_) => {
            tracing::error!("Storage health check timed out");
            response.storage = "timeout".to_string();
            false
        }
    };

    let status_code = if healthy {
        StatusCode::OK
    } else {
        response.status = "unhealthy".to_string();
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
