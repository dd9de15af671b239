#![cfg(unix)]

mod helpers;

use async_trait::async_trait;
use bytes::Bytes;
use helpers::{setup_test_app, setup_test_app_with_storage};
use imgate_core::StorageBackend;
use imgate_storage::{MemoryStorage, Storage, StorageError, StorageResult};
use serde_json::Value;
use std::sync::Arc;

/// Backend whose every call fails
struct BrokenStorage;

#[async_trait]
impl Storage for BrokenStorage {
    async fn put(&self, _key: &str, _data: Bytes) -> StorageResult<String> {
        Err(StorageError::UploadFailed("disk unavailable".to_string()))
    }

    async fn get(&self, _key: &str) -> StorageResult<Bytes> {
        Err(StorageError::DownloadFailed("disk unavailable".to_string()))
    }

    async fn exists(&self, _key: &str) -> StorageResult<bool> {
        Err(StorageError::DownloadFailed("disk unavailable".to_string()))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[tokio::test]
async fn test_health_reports_storage_and_tools() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "healthy");
    assert_eq!(body["storage_backend"], "memory");
    assert_eq!(body["ffmpeg_path"], app.tools.ffmpeg.as_str());
    assert_eq!(body["png_compressor_path"], app.tools.pngloss.as_str());
    assert_eq!(body["available_transform_slots"], body["max_concurrent_transforms"]);
}

#[tokio::test]
async fn test_health_is_unavailable_when_storage_fails() {
    let app =
        setup_test_app_with_storage(Arc::new(BrokenStorage), MemoryStorage::new(), |_, _| {}).await;

    let response = app.client().get("/health").await;
    assert_eq!(response.status_code(), 503);

    let body: Value = response.json();
    assert_eq!(body["status"], "unhealthy");
}

#[tokio::test]
async fn test_storage_failure_hides_details() {
    let app =
        setup_test_app_with_storage(Arc::new(BrokenStorage), MemoryStorage::new(), |_, _| {}).await;

    let response = app
        .client()
        .post(&helpers::api_path("/convert"))
        .multipart(helpers::fixtures::png_form())
        .await;
    assert_eq!(response.status_code(), 500);

    let body: Value = response.json();
    assert_eq!(body["code"], "STORAGE_ERROR");
    assert_eq!(body["message"], "Server error");
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_liveness() {
    let app = setup_test_app().await;

    let response = app.client().get("/live").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn test_request_id_is_generated_and_propagated() {
    let app = setup_test_app().await;

    let generated = app.client().get("/live").await;
    assert!(!generated.header("x-request-id").is_empty());

    let propagated = app
        .client()
        .get("/live")
        .add_header("X-Request-ID", "trace-abc-123")
        .await;
    assert_eq!(propagated.header("x-request-id"), "trace-abc-123");

    // Error responses carry it too
    let not_found = app.client().get(&helpers::api_path("/view/nope.png")).await;
    assert!(!not_found.header("x-request-id").is_empty());
}

#[tokio::test]
async fn test_openapi_and_docs_are_served() {
    let app = setup_test_app().await;

    let spec = app.client().get("/api/openapi.json").await;
    assert_eq!(spec.status_code(), 200);
    let body: Value = spec.json();
    assert!(body["paths"]["/api/v1/convert"].is_object());
    assert!(body["paths"]["/api/v1/view/{filename}"].is_object());

    let docs = app.client().get("/docs").await;
    assert_eq!(docs.status_code(), 200);
}
