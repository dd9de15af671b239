//! Success envelope shared by the transform endpoints.

use imgate_processing::TransformOperation;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ImageUrlData {
    /// Absolute URL of the derived image on the view endpoint
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TransformResponse {
    pub status: u16,
    pub message: String,
    pub data: ImageUrlData,
}

impl TransformResponse {
    pub fn new(operation: &TransformOperation, image_url: String) -> Self {
        Self {
            status: 200,
            message: format!("Image {} successfully", operation.past_tense()),
            data: ImageUrlData { image_url },
        }
    }
}
