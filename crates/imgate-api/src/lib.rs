//! imgate API library
//!
//! HTTP handlers, middleware and application setup. The `imgate-api` binary
//! is a thin wrapper around [`setup::initialize_app`] and
//! [`setup::server::start_server`].

mod api_doc;
pub mod constants;
mod handlers;
mod middleware;
mod services;
pub mod setup;
mod telemetry;
mod utils;

pub mod error;
pub mod response;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use response::TransformResponse;
pub use services::ImageService;
pub use utils::upload::{UploadForm, UploadedImage};
