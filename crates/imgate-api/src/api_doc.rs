//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use crate::response;

/// OpenAPI document served at `/api/openapi.json`
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "imgate API",
        version = "0.1.0",
        description = "Image conversion, resizing and compression over HTTP. Uploads are stored under generated names; derived images are served from /api/v1/view/{filename}."
    ),
    paths(
        handlers::transform::convert_image,
        handlers::transform::resize_image,
        handlers::transform::compress_image,
        handlers::view::view_image,
        handlers::health::health_check,
        handlers::health::liveness_check,
    ),
    components(
        schemas(
            response::TransformResponse,
            response::ImageUrlData,
            handlers::health::HealthCheckResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "images", description = "Image transformation and retrieval"),
        (name = "health", description = "Liveness and health probes")
    )
)]
pub struct ApiDoc;
