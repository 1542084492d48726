//! Analyzer configuration.
//!
//! Values come from three layers, later ones winning: built-in defaults, an
//! optional YAML file, and CLI flags / `ADLENS_*` environment variables.
//!
//! ```yaml
//! vision:
//!   endpoint: https://vision.internal/api/v1
//!   timeout_secs: 5
//! max_file_size: 5242880
//! concurrency: 8
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::AdlensError;

/// Largest accepted upload, in bytes (10 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Files analysed at once within one pipeline.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Bound on each vision call.
pub const DEFAULT_VISION_TIMEOUT_SECS: u64 = 10;

/// MIME types accepted at the upload boundary.
pub const DEFAULT_ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/bmp",
    "image/tiff",
    "image/vnd.adobe.photoshop",
];

/// Everything the coordinator and intake need to run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    pub vision: VisionConfig,
    /// Uploads larger than this are rejected with `FILE_TOO_LARGE`.
    pub max_file_size: u64,
    /// Per-pipeline file concurrency.
    pub concurrency: usize,
    /// Include debug details in error bodies.
    pub dev_mode: bool,
    pub allowed_mime_types: Vec<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            vision: VisionConfig::default(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
            dev_mode: false,
            allowed_mime_types: DEFAULT_ALLOWED_MIME_TYPES
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

impl AnalyzerConfig {
    /// Reads a YAML config file. Missing keys take their defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self, AdlensError> {
        let data = std::fs::read_to_string(path).map_err(|source| AdlensError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&data)
            .map_err(|e| AdlensError::Config(format!("{}: {e}", path.display())))
    }

    pub fn from_yaml_str(data: &str) -> Result<Self, String> {
        serde_yaml::from_str(data).map_err(|e| e.to_string())
    }

    /// Checks that the values can drive an analysis.
    pub fn validate(&self) -> Result<(), AdlensError> {
        if self.max_file_size == 0 {
            return Err(AdlensError::Config("max_file_size must be positive".into()));
        }
        if self.concurrency == 0 {
            return Err(AdlensError::Config("concurrency must be at least 1".into()));
        }
        if self.vision.timeout_secs == 0 {
            return Err(AdlensError::Config(
                "vision.timeout_secs must be at least 1".into(),
            ));
        }
        if let Some(endpoint) = &self.vision.endpoint {
            if !matches!(endpoint.scheme(), "http" | "https") {
                return Err(AdlensError::Config(format!(
                    "vision.endpoint must be http(s), got '{endpoint}'"
                )));
            }
        }
        Ok(())
    }
}

/// Where and how to reach the vision service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VisionConfig {
    /// Base URL; when unset, raster files get no label or text detections.
    pub endpoint: Option<Url>,
    /// Sent as a bearer token.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout_secs: DEFAULT_VISION_TIMEOUT_SECS,
        }
    }
}

impl VisionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
