//! Convert, resize and compress endpoints.
//!
//! Each endpoint takes a multipart upload with an `image` file part, stores it
//! under a generated name, runs the operation and answers with the URL of the
//! derived image.

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use imgate_processing::{ResizeDimensions, TransformOperation};

use crate::error::{ErrorResponse, HttpAppError};
use crate::response::TransformResponse;
use crate::state::AppState;
use crate::utils::upload::{extract_upload, UploadForm};

async fn run_transform(
    state: &AppState,
    form: UploadForm,
    operation: TransformOperation,
) -> Result<Json<TransformResponse>, HttpAppError> {
    let processed = state.images.process(&form.image, &operation).await?;

    tracing::info!(
        input = %processed.input,
        output = %processed.output,
        operation = operation.name(),
        "Transform request completed"
    );

    Ok(Json(TransformResponse::new(&operation, processed.image_url)))
}

/// Re-encode an uploaded image as JPEG
#[utoipa::path(
    post,
    path = "/api/v1/convert",
    tag = "images",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "`image`: the file to convert"),
    responses(
        (status = 200, description = "Image converted successfully", body = TransformResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Missing upload or transform failure", body = ErrorResponse),
        (status = 504, description = "Transform timed out", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "convert_image"))]
pub async fn convert_image(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TransformResponse>, HttpAppError> {
    let form = extract_upload(multipart, state.config.max_file_size_bytes()).await?;
    run_transform(&state, form, TransformOperation::Convert).await
}

/// Scale an uploaded image to exactly `width` x `height` pixels
#[utoipa::path(
    post,
    path = "/api/v1/resize",
    tag = "images",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "`image`: the file to resize; `width`, `height`: target size in pixels (1-16384)"),
    responses(
        (status = 200, description = "Image resized successfully", body = TransformResponse),
        (status = 400, description = "Invalid input or dimensions", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Missing upload or transform failure", body = ErrorResponse),
        (status = 504, description = "Transform timed out", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "resize_image"))]
pub async fn resize_image(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TransformResponse>, HttpAppError> {
    let form = extract_upload(multipart, state.config.max_file_size_bytes()).await?;

    // Validate before anything is written to storage
    let dimensions = ResizeDimensions::parse(
        form.field("width").unwrap_or_default(),
        form.field("height").unwrap_or_default(),
    )?;

    run_transform(&state, form, TransformOperation::Resize(dimensions)).await
}

/// Lossy re-encode of an uploaded image (pngloss for PNG, ffmpeg otherwise)
#[utoipa::path(
    post,
    path = "/api/v1/compress",
    tag = "images",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "`image`: the file to compress"),
    responses(
        (status = 200, description = "Image compressed successfully", body = TransformResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Missing upload or transform failure", body = ErrorResponse),
        (status = 504, description = "Transform timed out", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "compress_image"))]
pub async fn compress_image(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TransformResponse>, HttpAppError> {
    let form = extract_upload(multipart, state.config.max_file_size_bytes()).await?;
    run_transform(&state, form, TransformOperation::Compress).await
}
