//! Application state shared by every handler.

use crate::services::ImageService;
use imgate_core::Config;
use imgate_processing::{ImageTransformer, ProcessRunner, ToolConfig};
use imgate_storage::Storage;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub images: ImageService,
    /// Cancelled on graceful shutdown; running tools are killed when it fires.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(config: Config, storage: Arc<dyn Storage>) -> Self {
        let shutdown = CancellationToken::new();
        let runner = ProcessRunner::new(config.transform_timeout(), config.max_concurrent_transforms())
            .with_cancellation(shutdown.clone());
        let transformer =
            ImageTransformer::new(storage.clone(), runner, ToolConfig::from_config(&config));
        let images = ImageService::new(storage.clone(), transformer, config.public_base_url());

        Self {
            config,
            storage,
            images,
            shutdown,
        }
    }
}
