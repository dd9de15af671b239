//! Upload, transform and retrieval of images.

use crate::constants::API_PREFIX;
use crate::error::HttpAppError;
use crate::utils::upload::UploadedImage;
use bytes::Bytes;
use imgate_processing::{ImageName, ImageTransformer, TransformOperation};
use imgate_storage::keys::validate_key;
use imgate_storage::Storage;
use std::sync::Arc;

/// Result of a successful transform
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub input: ImageName,
    pub output: ImageName,
    pub image_url: String,
}

pub struct ImageService {
    storage: Arc<dyn Storage>,
    transformer: ImageTransformer,
    public_base_url: String,
}

impl ImageService {
    pub fn new(
        storage: Arc<dyn Storage>,
        transformer: ImageTransformer,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            transformer,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn transformer(&self) -> &ImageTransformer {
        &self.transformer
    }

    /// Public URL of a stored image on the view endpoint
    pub fn image_url(&self, name: &ImageName) -> String {
        format!(
            "{}{}/view/{}",
            self.public_base_url,
            API_PREFIX,
            name.file_name()
        )
    }

    /// Persist an upload under a freshly generated name
    #[tracing::instrument(skip(self, upload), fields(original_filename = %upload.original_filename))]
    pub async fn store_upload(&self, upload: &UploadedImage) -> Result<ImageName, HttpAppError> {
        let name = ImageName::for_upload(&upload.original_filename)?;
        self.storage
            .put(&name.file_name(), upload.data.clone())
            .await?;

        tracing::info!(
            image = %name,
            size_bytes = upload.data.len(),
            content_type = ?upload.content_type,
            "Upload stored"
        );
        Ok(name)
    }

    /// Persist an upload, apply `operation` to it and return where the result lives
    pub async fn process(
        &self,
        upload: &UploadedImage,
        operation: &TransformOperation,
    ) -> Result<ProcessedImage, HttpAppError> {
        let input = self.store_upload(upload).await?;
        let output = self.transformer.transform(&input, operation).await?;
        let image_url = self.image_url(&output);

        Ok(ProcessedImage {
            input,
            output,
            image_url,
        })
    }

    /// Raw bytes of a stored image, addressed by its filename
    pub async fn fetch(&self, filename: &str) -> Result<Bytes, HttpAppError> {
        validate_key(filename)?;
        Ok(self.storage.get(filename).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgate_core::AppError;
    use imgate_processing::{ProcessRunner, ToolConfig};
    use imgate_storage::MemoryStorage;
    use std::time::Duration;

    fn service(storage: MemoryStorage) -> ImageService {
        let storage: Arc<dyn Storage> = Arc::new(storage);
        let transformer = ImageTransformer::new(
            storage.clone(),
            ProcessRunner::new(Duration::from_secs(5), 1),
            ToolConfig::default(),
        );
        ImageService::new(storage, transformer, "https://img.example.com/")
    }

    fn upload(filename: &str) -> UploadedImage {
        UploadedImage {
            data: Bytes::from_static(b"image bytes"),
            original_filename: filename.to_string(),
            content_type: Some("image/png".to_string()),
        }
    }

    #[test]
    fn test_image_url() {
        let service = service(MemoryStorage::new());
        assert_eq!(
            service.image_url(&ImageName::new("abc", "jpeg")),
            "https://img.example.com/api/v1/view/abc.jpeg"
        );
    }

    #[tokio::test]
    async fn test_store_upload_keeps_extension() {
        let storage = MemoryStorage::new();
        let service = service(storage.clone());

        let name = service.store_upload(&upload("Photo.PNG")).await.unwrap();
        assert_eq!(name.extension(), "png");
        assert_eq!(storage.keys().await, vec![name.file_name()]);
    }

    #[tokio::test]
    async fn test_store_upload_rejects_missing_extension() {
        let storage = MemoryStorage::new();
        let service = service(storage.clone());

        let result = service.store_upload(&upload("README")).await;
        assert!(matches!(result, Err(HttpAppError(AppError::InvalidInput(_)))));
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_fetch_validates_and_reads() {
        let storage = MemoryStorage::new();
        storage
            .put("abc.png", Bytes::from_static(b"png"))
            .await
            .unwrap();
        let service = service(storage);

        assert_eq!(service.fetch("abc.png").await.unwrap(), Bytes::from_static(b"png"));
        assert!(matches!(
            service.fetch("missing.png").await,
            Err(HttpAppError(AppError::NotFound(_)))
        ));
        assert!(matches!(
            service.fetch("../abc.png").await,
            Err(HttpAppError(AppError::InvalidInput(_)))
        ));
    }
}
