//! Per-format extraction pipelines.
//!
//! Each pipeline turns a list of [`SourceFile`]s into one [`BatchResult`](crate::model::BatchResult).
//! Files are analysed concurrently up to a limit, results keep input order,
//! and a failing file becomes a placeholder record instead of failing the
//! batch.

pub mod probe;
pub mod psd;
pub mod raster;

use std::io::ErrorKind;
use std::time::Duration;

use crate::config::{AnalyzerConfig, DEFAULT_CONCURRENCY, DEFAULT_VISION_TIMEOUT_SECS};
use crate::error::{AdlensError, ErrorBody, ErrorCode};
use crate::model::{ExtractionResult, SourceFile};

pub use probe::{decode_rgb, probe, ImageInfo};
pub use psd::PsdPipeline;
pub use raster::RasterPipeline;

/// Tracing target for pipeline progress.
pub const TRACING_TARGET: &str = "adlens::pipeline";

/// Knobs shared by both pipelines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Files analysed at once.
    pub concurrency: usize,
    /// Bound on each vision call.
    pub vision_timeout: Duration,
    /// Include debug details in placeholder error bodies.
    pub dev_mode: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            vision_timeout: Duration::from_secs(DEFAULT_VISION_TIMEOUT_SECS),
            dev_mode: false,
        }
    }
}

impl From<&AnalyzerConfig> for PipelineOptions {
    fn from(config: &AnalyzerConfig) -> Self {
        Self {
            concurrency: config.concurrency.max(1),
            vision_timeout: config.vision.timeout(),
            dev_mode: config.dev_mode,
        }
    }
}

/// Reads a source file, reporting a missing path as `INVALID_FILE`.
pub(crate) async fn read_source(file: &SourceFile) -> Result<Vec<u8>, AdlensError> {
    match tokio::fs::read(&file.path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(AdlensError::invalid_input(
            ErrorCode::InvalidFile,
            format!("Invalid file path: {}", file.path.display()),
        )),
        Err(source) => Err(AdlensError::FileRead {
            path: file.path.clone(),
            source,
        }),
    }
}

/// Logs a per-file failure and turns it into a placeholder record.
pub(crate) fn placeholder(
    file: &SourceFile,
    stage: &'static str,
    error: &AdlensError,
    dev_mode: bool,
) -> ExtractionResult {
    tracing::warn!(
        target: TRACING_TARGET,
        file = %file.file_name(),
        stage,
        code = %error.code(),
        error = %error,
        "extraction failed"
    );
    ExtractionResult::placeholder(file, ErrorBody::from_error(error, dev_mode))
}

/// Maps a panicked or cancelled blocking task to an error.
pub(crate) fn join_error(err: tokio::task::JoinError) -> AdlensError {
    AdlensError::Task(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_invalid_file() {
        let file = SourceFile::from_path("/definitely/not/here.png");
        let err = read_source(&file).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidFile);
        assert!(err.to_string().contains("Invalid file path"));
    }

    #[test]
    fn test_options_follow_config() {
        let config = AnalyzerConfig {
            concurrency: 8,
            dev_mode: true,
            ..Default::default()
        };
        let options = PipelineOptions::from(&config);
        assert_eq!(options.concurrency, 8);
        assert!(options.dev_mode);
        assert_eq!(options.vision_timeout, Duration::from_secs(10));
    }
}
