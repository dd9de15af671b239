//! Configuration module
//!
//! Settings are read from the environment (a `.env` file is loaded first when
//! present) and validated once at startup.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::storage_types::StorageBackend;

const DEFAULT_PORT: u16 = 8080;
const MAX_FILE_SIZE_MB: usize = 20;
const COMPRESS_QUALITY: u8 = 25;
const TRANSFORM_TIMEOUT_SECS: u64 = 60;
const MAX_CONCURRENT_TRANSFORMS: usize = 4;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;

/// Log output format for the tracing subscriber
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

/// HTTP server settings
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub server_port: u16,
    pub public_base_url: String,
    pub cors_origins: Vec<String>,
    pub http_concurrency_limit: usize,
    pub environment: String,
    pub log_format: LogFormat,
}

/// Storage and external tool settings
#[derive(Clone, Debug)]
pub struct ProcessingConfig {
    pub storage_backend: StorageBackend,
    pub local_storage_path: PathBuf,
    pub max_file_size_bytes: usize,
    pub ffmpeg_path: String,
    pub png_compressor_path: String,
    pub compress_quality: u8,
    pub transform_timeout_secs: u64,
    pub max_concurrent_transforms: usize,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub processing: ProcessingConfig,
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T, anyhow::Error> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number, got '{}'", name, raw)),
        _ => Ok(default),
    }
}

/// Convert a megabyte limit to bytes, rejecting values that do not fit in `usize`
fn megabytes_to_bytes(name: &str, mb: usize) -> Result<usize, anyhow::Error> {
    mb.checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("{} is too large: {}", name, mb))
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let server_port = match env::var("PORT").or_else(|_| env::var("APP_PORT")) {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            Err(_) => DEFAULT_PORT,
        };

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| format!("http://localhost:{}", server_port));

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let log_format = match env::var("LOG_FORMAT")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "json" => LogFormat::Json,
            _ => LogFormat::Compact,
        };

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(raw) => raw.parse()?,
            Err(_) => StorageBackend::Local,
        };

        let max_file_size_mb: usize = parse_or("MAX_FILE_SIZE_MB", MAX_FILE_SIZE_MB)?;
        let max_file_size_bytes = megabytes_to_bytes("MAX_FILE_SIZE_MB", max_file_size_mb)?;

        let config = Config {
            server: ServerConfig {
                server_port,
                public_base_url,
                cors_origins,
                http_concurrency_limit: parse_or("HTTP_CONCURRENCY_LIMIT", HTTP_CONCURRENCY_LIMIT)?,
                environment,
                log_format,
            },
            processing: ProcessingConfig {
                storage_backend,
                local_storage_path: env::var("LOCAL_STORAGE_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("./images")),
                max_file_size_bytes,
                ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
                png_compressor_path: env::var("PNG_COMPRESSOR_PATH")
                    .unwrap_or_else(|_| "pngloss".to_string()),
                compress_quality: parse_or("COMPRESS_QUALITY", COMPRESS_QUALITY)?,
                transform_timeout_secs: parse_or("TRANSFORM_TIMEOUT_SECS", TRANSFORM_TIMEOUT_SECS)?,
                max_concurrent_transforms: parse_or(
                    "MAX_CONCURRENT_TRANSFORMS",
                    MAX_CONCURRENT_TRANSFORMS,
                )?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.server.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if !(self.server.public_base_url.starts_with("http://")
            || self.server.public_base_url.starts_with("https://"))
        {
            return Err(anyhow::anyhow!(
                "PUBLIC_BASE_URL must start with http:// or https://"
            ));
        }

        if !(1..=31).contains(&self.processing.compress_quality) {
            return Err(anyhow::anyhow!("COMPRESS_QUALITY must be between 1 and 31"));
        }

        if self.processing.transform_timeout_secs == 0 {
            return Err(anyhow::anyhow!("TRANSFORM_TIMEOUT_SECS must be greater than 0"));
        }

        if self.processing.max_concurrent_transforms == 0 {
            return Err(anyhow::anyhow!(
                "MAX_CONCURRENT_TRANSFORMS must be greater than 0"
            ));
        }

        if self.processing.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }

        if self.processing.ffmpeg_path.trim().is_empty()
            || self.processing.png_compressor_path.trim().is_empty()
        {
            return Err(anyhow::anyhow!(
                "FFMPEG_PATH and PNG_COMPRESSOR_PATH must not be empty"
            ));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.server.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.server.server_port
    }

    /// Base for every `imageUrl` returned to clients, without trailing slash.
    pub fn public_base_url(&self) -> &str {
        self.server.public_base_url.trim_end_matches('/')
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.server.cors_origins
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.server.http_concurrency_limit.max(1)
    }

    pub fn environment(&self) -> &str {
        &self.server.environment
    }

    pub fn log_format(&self) -> LogFormat {
        self.server.log_format
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.processing.storage_backend
    }

    pub fn local_storage_path(&self) -> &std::path::Path {
        &self.processing.local_storage_path
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.processing.max_file_size_bytes
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.processing.ffmpeg_path
    }

    pub fn png_compressor_path(&self) -> &str {
        &self.processing.png_compressor_path
    }

    pub fn compress_quality(&self) -> u8 {
        self.processing.compress_quality
    }

    pub fn transform_timeout(&self) -> Duration {
        Duration::from_secs(self.processing.transform_timeout_secs)
    }

    pub fn max_concurrent_transforms(&self) -> usize {
        self.processing.max_concurrent_transforms
    }
}

impl Default for Config {
    /// Development defaults, identical to `from_env` with an empty environment.
    fn default() -> Self {
        Config {
            server: ServerConfig {
                server_port: DEFAULT_PORT,
                public_base_url: format!("http://localhost:{}", DEFAULT_PORT),
                cors_origins: vec!["*".to_string()],
                http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
                environment: "development".to_string(),
                log_format: LogFormat::Compact,
            },
            processing: ProcessingConfig {
                storage_backend: StorageBackend::Local,
                local_storage_path: PathBuf::from("./images"),
                max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
                ffmpeg_path: "ffmpeg".to_string(),
                png_compressor_path: "pngloss".to_string(),
                compress_quality: COMPRESS_QUALITY,
                transform_timeout_secs: TRANSFORM_TIMEOUT_SECS,
                max_concurrent_transforms: MAX_CONCURRENT_TRANSFORMS,
            },
        }
    }
}
