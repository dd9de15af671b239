//! Transform operations and the tool command lines that implement them.

use crate::error::ProcessingError;
use crate::naming::ImageName;
use imgate_core::Config;
use std::ffi::OsString;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;
use validator::Validate;

/// Largest width or height accepted for a resize.
pub const MAX_DIMENSION: u32 = 16384;

/// Extension every converted image is written with
pub const CONVERT_EXTENSION: &str = "jpeg";

/// Target size of a resize, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Validate)]
pub struct ResizeDimensions {
    #[validate(range(min = 1, max = MAX_DIMENSION, message = "width must be between 1 and 16384"))]
    pub width: u32,
    #[validate(range(min = 1, max = MAX_DIMENSION, message = "height must be between 1 and 16384"))]
    pub height: u32,
}

impl ResizeDimensions {
    pub fn new(width: u32, height: u32) -> Result<Self, ProcessingError> {
        let dimensions = Self { width, height };
        dimensions
            .validate()
            .map_err(|e| ProcessingError::InvalidDimensions(e.to_string()))?;
        Ok(dimensions)
    }

    /// Parse the raw `width` / `height` form values
    pub fn parse(width: &str, height: &str) -> Result<Self, ProcessingError> {
        Self::new(parse_side("width", width)?, parse_side("height", height)?)
    }
}

fn parse_side(field: &str, raw: &str) -> Result<u32, ProcessingError> {
    raw.trim().parse::<u32>().map_err(|_| {
        ProcessingError::InvalidDimensions(format!(
            "{} must be a positive integer, got '{}'",
            field, raw
        ))
    })
}

/// External tools and their tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    pub ffmpeg_path: String,
    pub png_compressor_path: String,
    pub compress_quality: u8,
}

impl ToolConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            ffmpeg_path: config.ffmpeg_path().to_string(),
            png_compressor_path: config.png_compressor_path().to_string(),
            compress_quality: config.compress_quality(),
        }
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// A program and its argument vector; never passed through a shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<OsString>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl Display for CommandSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformOperation {
    /// Re-encode as JPEG
    Convert,
    Resize(ResizeDimensions),
    /// Lossy re-encode at the configured quality
    Compress,
}

impl TransformOperation {
    pub fn name(&self) -> &'static str {
        match self {
            TransformOperation::Convert => "convert",
            TransformOperation::Resize(_) => "resize",
            TransformOperation::Compress => "compress",
        }
    }

    /// Past tense used in success messages
    pub fn past_tense(&self) -> &'static str {
        match self {
            TransformOperation::Convert => "converted",
            TransformOperation::Resize(_) => "resized",
            TransformOperation::Compress => "compressed",
        }
    }

    /// Name the derived image is stored under.
    ///
    /// A convert of an image that is already `.jpeg` would collide with its
    /// input, so it gets a `_converted` suffix instead.
    pub fn output_name(&self, input: &ImageName) -> ImageName {
        match self {
            TransformOperation::Convert if input.extension() == CONVERT_EXTENSION => {
                input.with_suffix("converted")
            }
            TransformOperation::Convert => input.with_extension(CONVERT_EXTENSION),
            TransformOperation::Resize(d) => {
                input.with_suffix(&format!("{}x{}", d.width, d.height))
            }
            TransformOperation::Compress => input.with_suffix("compressed"),
        }
    }

    /// Command line producing `output_path` from `input_path`
    pub fn command(
        &self,
        tools: &ToolConfig,
        input: &ImageName,
        input_path: &Path,
        output_path: &Path,
    ) -> CommandSpec {
        match self {
            TransformOperation::Convert => CommandSpec::new(&tools.ffmpeg_path)
                .arg("-i")
                .arg(input_path)
                .arg("-y")
                .arg(output_path),
            TransformOperation::Resize(d) => CommandSpec::new(&tools.ffmpeg_path)
                .arg("-i")
                .arg(input_path)
                .arg("-vf")
                .arg(format!("scale={}:{}", d.width, d.height))
                .arg("-y")
                .arg(output_path),
            TransformOperation::Compress if input.extension() == "png" => {
                CommandSpec::new(&tools.png_compressor_path)
                    .arg("-o")
                    .arg(output_path)
                    .arg(input_path)
            }
            TransformOperation::Compress => CommandSpec::new(&tools.ffmpeg_path)
                .arg("-i")
                .arg(input_path)
                .arg("-qscale:v")
                .arg(tools.compress_quality.to_string())
                .arg("-y")
                .arg(output_path),
        }
    }
}
