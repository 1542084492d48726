//! Uploaded asset references.

use std::path::{Path, PathBuf};

/// Extension that routes a file to the PSD pipeline.
///
/// Matching is literal and case-sensitive: `banner.PSD` is treated as a
/// raster file. Routing never looks at file contents or the declared MIME.
pub const PSD_EXTENSION: &str = ".psd";

/// A reference to one uploaded asset.
///
/// Created by the upload boundary before extraction starts and read-only
/// afterwards. Removing the file from disk is the boundary's job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    /// Location of the uploaded bytes.
    pub path: PathBuf,
    /// MIME type declared by the uploader. Informational only.
    pub mime_type: Option<String>,
    /// Declared size in bytes.
    pub size: u64,
    /// Extension including the leading dot (empty when there is none).
    pub extension: String,
}

impl SourceFile {
    /// Creates a source file, deriving the extension from the path.
    pub fn new(path: impl Into<PathBuf>, mime_type: Option<String>, size: u64) -> Self {
        let path = path.into();
        let extension = extension_of(&path);
        Self {
            path,
            mime_type,
            size,
            extension,
        }
    }

    /// Creates a source file with no declared MIME type or size.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::new(path, None, 0)
    }

    /// Base name of the file, used in output records and logs.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Returns true if this file belongs to the PSD pipeline.
    pub fn is_psd(&self) -> bool {
        self.extension == PSD_EXTENSION
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}
