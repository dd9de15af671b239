//! Multipart upload extraction for the transform endpoints

use crate::constants::IMAGE_FIELD;
use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::http::StatusCode;
use bytes::Bytes;
use imgate_core::AppError;
use std::collections::HashMap;

/// The `image` part of an upload
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub data: Bytes,
    pub original_filename: String,
    pub content_type: Option<String>,
}

/// Everything a transform request carried
#[derive(Debug, Clone)]
pub struct UploadForm {
    pub image: UploadedImage,
    /// Text fields other than `image`, e.g. `width` and `height`
    pub fields: HashMap<String, String>,
}

impl UploadForm {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

fn read_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::MissingUpload(format!("Failed to read multipart body: {}", e.body_text()))
    }
}

/// Read the whole multipart body.
///
/// The first `image` part with a filename is the upload; later `image` parts
/// are ignored. No such part (or a body that is not multipart at all) is a
/// [`AppError::MissingUpload`]. Files larger than `max_file_size` bytes are
/// rejected with [`AppError::PayloadTooLarge`].
pub async fn extract_upload(
    multipart: Result<Multipart, MultipartRejection>,
    max_file_size: usize,
) -> Result<UploadForm, AppError> {
    let mut multipart = multipart.map_err(|rejection| {
        AppError::MissingUpload(format!("Expected a multipart body: {}", rejection.body_text()))
    })?;

    let mut image: Option<UploadedImage> = None;
    let mut fields = HashMap::new();

    while let Some(field) = multipart.next_field().await.map_err(read_error)? {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if field_name == IMAGE_FIELD {
            // Only the first `image` part carrying a file counts
            let Some(original_filename) = field.file_name().map(|s| s.to_string()) else {
                tracing::debug!("Ignoring '{}' part without a filename", IMAGE_FIELD);
                continue;
            };
            if image.is_some() {
                tracing::debug!("Ignoring additional '{}' file part", IMAGE_FIELD);
                continue;
            }

            let content_type = field.content_type().map(|s| s.to_string());
            let data = field.bytes().await.map_err(read_error)?;

            image = Some(UploadedImage {
                data,
                original_filename,
                content_type,
            });
        } else if !field_name.is_empty() {
            let value = field.text().await.map_err(read_error)?;
            fields.insert(field_name, value);
        }
    }

    let image = image.ok_or_else(|| {
        AppError::MissingUpload(format!("Multipart field '{}' is required", IMAGE_FIELD))
    })?;

    validate_file_size(image.data.len(), max_file_size)?;
    if image.data.is_empty() {
        return Err(AppError::InvalidInput("Uploaded image is empty".to_string()));
    }

    Ok(UploadForm { image, fields })
}

/// Validate file size
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}
