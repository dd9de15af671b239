//! API constants

/// Prefix of every image endpoint
pub const API_PREFIX: &str = "/api/v1";

/// Objects never change once written, so views may be cached indefinitely.
pub const VIEW_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Allowance on top of the file size limit for multipart framing and text fields
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Name of the multipart field carrying the image
pub const IMAGE_FIELD: &str = "image";
