use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::constants::VIEW_CACHE_CONTROL;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// Serve a stored image by filename
///
/// The content type is guessed from the extension and falls back to
/// `application/octet-stream`.
#[utoipa::path(
    get,
    path = "/api/v1/view/{filename}",
    tag = "images",
    params(
        ("filename" = String, Path, description = "Stored image filename, e.g. `0f8e...c1.jpeg`")
    ),
    responses(
        (status = 200, description = "Image bytes", content_type = "application/octet-stream"),
        (status = 400, description = "Invalid filename", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "view_image"))]
pub async fn view_image(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response, HttpAppError> {
    let data = state.images.fetch(&filename).await?;
    let content_type = mime_guess::from_path(&filename).first_or_octet_stream();

    tracing::debug!(size_bytes = data.len(), content_type = %content_type, "Serving image");

    Ok((
        [
            (header::CONTENT_TYPE, content_type.essence_str().to_string()),
            (header::CACHE_CONTROL, VIEW_CACHE_CONTROL.to_string()),
        ],
        data,
    )
        .into_response())
}
