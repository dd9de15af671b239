//! Shared setup for API integration tests.

#![allow(dead_code)]

pub mod fixtures;
pub mod tools;

use axum_test::TestServer;
use imgate_api::state::AppState;
use imgate_core::{Config, StorageBackend};
use imgate_storage::{MemoryStorage, Storage};
use std::sync::Arc;
use tools::FakeTools;

pub const TEST_BASE_URL: &str = "http://img.test";

/// Returns the versioned API path, e.g. `api_path("/convert")` -> `/api/v1/convert`.
pub fn api_path(path: &str) -> String {
    format!("{}{}", imgate_api::constants::API_PREFIX, path)
}

/// Test application state
pub struct TestApp {
    pub server: TestServer,
    pub storage: MemoryStorage,
    pub state: Arc<AppState>,
    pub tools: FakeTools,
}

impl TestApp {
    /// Get the HTTP test client
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

fn create_test_config(tools: &FakeTools) -> Config {
    let mut config = Config::default();
    config.server.public_base_url = TEST_BASE_URL.to_string();
    config.processing.storage_backend = StorageBackend::Memory;
    config.processing.ffmpeg_path = tools.ffmpeg.clone();
    config.processing.png_compressor_path = tools.pngloss.clone();
    config.processing.transform_timeout_secs = 10;
    config
}

/// Setup a test application backed by in-memory storage and fake tools
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|_, _| {}).await
}

/// Like [`setup_test_app`], with a hook to adjust the configuration
pub async fn setup_test_app_with(customize: impl FnOnce(&mut Config, &FakeTools)) -> TestApp {
    let storage = MemoryStorage::new();
    setup_test_app_with_storage(Arc::new(storage.clone()), storage, customize).await
}

/// Build the app around an arbitrary storage backend; `storage` is the handle
/// kept for assertions.
pub async fn setup_test_app_with_storage(
    backend: Arc<dyn Storage>,
    storage: MemoryStorage,
    customize: impl FnOnce(&mut Config, &FakeTools),
) -> TestApp {
    let tools = FakeTools::install();
    let mut config = create_test_config(&tools);
    customize(&mut config, &tools);

    let (state, app) =
        imgate_api::setup::build_app(config, backend).expect("Failed to build app");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        storage,
        state,
        tools,
    }
}

/// Filename at the end of an `imageUrl`
pub fn file_name_from_url(url: &str) -> String {
    url.rsplit('/').next().unwrap_or_default().to_string()
}
