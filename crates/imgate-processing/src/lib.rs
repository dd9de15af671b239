//! imgate image processing library
//!
//! Pixel work is delegated to external command-line tools. This crate names
//! the files involved, builds the tool command lines, and runs them under a
//! deadline, a cancellation token and a concurrency cap.

pub mod error;
pub mod naming;
pub mod operation;
pub mod runner;
pub mod transformer;

// Re-export commonly used types
pub use error::ProcessingError;
pub use naming::{extract_extension, ImageName};
pub use operation::{CommandSpec, ResizeDimensions, ToolConfig, TransformOperation};
pub use runner::{ProcessRunner, TaskOutcome};
pub use transformer::ImageTransformer;
