use crate::error::ProcessingError;
use crate::naming::ImageName;
use crate::operation::{ToolConfig, TransformOperation};
use crate::runner::ProcessRunner;
use bytes::Bytes;
use imgate_storage::Storage;
use std::sync::Arc;
use std::time::Instant;

/// Applies [`TransformOperation`]s to stored images.
///
/// The input is copied out of storage into a private scratch directory, the
/// tool writes its output there, and the result is put back into storage under
/// the operation's output name. The scratch directory is removed on every path.
#[derive(Clone)]
pub struct ImageTransformer {
    storage: Arc<dyn Storage>,
    runner: ProcessRunner,
    tools: ToolConfig,
}

impl ImageTransformer {
    pub fn new(storage: Arc<dyn Storage>, runner: ProcessRunner, tools: ToolConfig) -> Self {
        Self {
            storage,
            runner,
            tools,
        }
    }

    pub fn runner(&self) -> &ProcessRunner {
        &self.runner
    }

    pub fn tools(&self) -> &ToolConfig {
        &self.tools
    }

    #[tracing::instrument(
        skip(self, input, operation),
        fields(operation = operation.name(), input = %input)
    )]
    pub async fn transform(
        &self,
        input: &ImageName,
        operation: &TransformOperation,
    ) -> Result<ImageName, ProcessingError> {
        let start = Instant::now();
        let output = operation.output_name(input);

        let data = self.storage.get(&input.file_name()).await?;

        let scratch = tempfile::Builder::new().prefix("imgate-").tempdir()?;
        let input_path = scratch.path().join(format!("input.{}", input.extension()));
        let output_path = scratch
            .path()
            .join(format!("output.{}", output.extension()));
        tokio::fs::write(&input_path, &data).await?;

        let command = operation.command(&self.tools, input, &input_path, &output_path);
        let produced = self
            .runner
            .run(&command, &output_path)
            .await
            .into_result(&command.program)?;

        let transformed = tokio::fs::read(&produced).await?;
        let size = transformed.len();
        self.storage
            .put(&output.file_name(), Bytes::from(transformed))
            .await?;

        tracing::info!(
            output = %output,
            input_size_bytes = data.len(),
            output_size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image transformed"
        );

        Ok(output)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::operation::ResizeDimensions;
    use imgate_storage::{MemoryStorage, StorageError};
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use std::time::Duration;
    use tempfile::TempDir;

    /// Stand-in for ffmpeg: copies the file after `-i` to the last argument,
    /// appending the remaining arguments so tests can see what was asked for.
    const FAKE_FFMPEG: &str = r#"#!/bin/sh
in="$2"
for last in "$@"; do :; done
cp "$in" "$last" && printf '|%s' "$@" >> "$last"
"#;

    /// Stand-in for pngloss: `-o <out> <in>`
    const FAKE_PNG_COMPRESSOR: &str = r#"#!/bin/sh
cp "$3" "$2" && printf '|pngloss' >> "$2"
"#;

    fn write_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn fake_tools(dir: &TempDir) -> ToolConfig {
        ToolConfig {
            ffmpeg_path: write_tool(dir.path(), "ffmpeg", FAKE_FFMPEG)
                .to_string_lossy()
                .to_string(),
            png_compressor_path: write_tool(dir.path(), "pngloss", FAKE_PNG_COMPRESSOR)
                .to_string_lossy()
                .to_string(),
            compress_quality: 25,
        }
    }

    async fn setup(tools: ToolConfig) -> (MemoryStorage, ImageTransformer) {
        let storage = MemoryStorage::new();
        let transformer = ImageTransformer::new(
            Arc::new(storage.clone()),
            ProcessRunner::new(Duration::from_secs(10), 2),
            tools,
        );
        (storage, transformer)
    }

    async fn stored_text(storage: &MemoryStorage, name: &ImageName) -> String {
        let bytes = storage.get(&name.file_name()).await.unwrap();
        String::from_utf8_lossy(&bytes).to_string()
    }

    #[tokio::test]
    async fn test_convert_stores_jpeg_output() {
        let tools_dir = tempfile::tempdir().unwrap();
        let (storage, transformer) = setup(fake_tools(&tools_dir)).await;
        let input = ImageName::new("abc", "png");
        storage
            .put(&input.file_name(), Bytes::from_static(b"PNG"))
            .await
            .unwrap();

        let output = transformer
            .transform(&input, &TransformOperation::Convert)
            .await
            .unwrap();

        assert_eq!(output.file_name(), "abc.jpeg");
        let text = stored_text(&storage, &output).await;
        assert!(text.starts_with("PNG|-i|"));
        assert!(text.contains("|-y|"));
        // input untouched
        assert_eq!(stored_text(&storage, &input).await, "PNG");
    }

    #[tokio::test]
    async fn test_resize_passes_scale_filter() {
        let tools_dir = tempfile::tempdir().unwrap();
        let (storage, transformer) = setup(fake_tools(&tools_dir)).await;
        let input = ImageName::new("abc", "webp");
        storage
            .put(&input.file_name(), Bytes::from_static(b"WEBP"))
            .await
            .unwrap();

        let op = TransformOperation::Resize(ResizeDimensions::new(64, 32).unwrap());
        let output = transformer.transform(&input, &op).await.unwrap();

        assert_eq!(output.file_name(), "abc_64x32.webp");
        assert!(stored_text(&storage, &output)
            .await
            .contains("|-vf|scale=64:32|"));
    }

    #[tokio::test]
    async fn test_compress_dispatches_on_extension() {
        let tools_dir = tempfile::tempdir().unwrap();
        let (storage, transformer) = setup(fake_tools(&tools_dir)).await;

        let png = ImageName::new("p", "png");
        let jpg = ImageName::new("j", "jpg");
        storage
            .put(&png.file_name(), Bytes::from_static(b"PNG"))
            .await
            .unwrap();
        storage
            .put(&jpg.file_name(), Bytes::from_static(b"JPG"))
            .await
            .unwrap();

        let png_out = transformer
            .transform(&png, &TransformOperation::Compress)
            .await
            .unwrap();
        let jpg_out = transformer
            .transform(&jpg, &TransformOperation::Compress)
            .await
            .unwrap();

        assert_eq!(png_out.file_name(), "p_compressed.png");
        assert_eq!(stored_text(&storage, &png_out).await, "PNG|pngloss");
        assert_eq!(jpg_out.file_name(), "j_compressed.jpg");
        assert!(stored_text(&storage, &jpg_out)
            .await
            .contains("|-qscale:v|25|"));
    }

    #[tokio::test]
    async fn test_missing_input_is_storage_not_found() {
        let tools_dir = tempfile::tempdir().unwrap();
        let (_storage, transformer) = setup(fake_tools(&tools_dir)).await;

        let result = transformer
            .transform(&ImageName::new("ghost", "png"), &TransformOperation::Convert)
            .await;
        assert!(matches!(
            result,
            Err(ProcessingError::Storage(StorageError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_tool_failure_stores_nothing() {
        let tools_dir = tempfile::tempdir().unwrap();
        let failing = write_tool(
            tools_dir.path(),
            "broken-ffmpeg",
            "#!/bin/sh\necho 'Invalid data found' >&2\nexit 1\n",
        );
        let tools = ToolConfig {
            ffmpeg_path: failing.to_string_lossy().to_string(),
            ..fake_tools(&tools_dir)
        };
        let (storage, transformer) = setup(tools).await;
        let input = ImageName::new("abc", "png");
        storage
            .put(&input.file_name(), Bytes::from_static(b"not really a png"))
            .await
            .unwrap();

        let result = transformer
            .transform(&input, &TransformOperation::Convert)
            .await;
        match result {
            Err(ProcessingError::ProcessFailed {
                exit_code, stderr, ..
            }) => {
                assert_eq!(exit_code, Some(1));
                assert!(stderr.contains("Invalid data found"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(storage.keys().await, vec!["abc.png".to_string()]);
    }
}
