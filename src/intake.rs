//! The upload boundary: turning paths into validated [`SourceFile`]s.
//!
//! Validation rejects the whole request on the first violation, mirroring
//! what an HTTP upload handler answers with. Paths that do not exist are let
//! through so the pipelines can report them per file as `INVALID_FILE`.

use std::path::{Path, PathBuf};

use mime::Mime;
use walkdir::WalkDir;

use crate::config::AnalyzerConfig;
use crate::error::{AdlensError, ErrorCode};
use crate::model::SourceFile;

/// MIME type of layered Photoshop documents.
pub const PSD_MIME: &str = "image/vnd.adobe.photoshop";

/// Guesses a MIME type from a file extension (without the dot).
///
/// Matching ignores ASCII case.
pub fn mime_for_extension(extension: &str) -> Option<Mime> {
    let mime = match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => mime::IMAGE_JPEG,
        "png" => mime::IMAGE_PNG,
        "gif" => mime::IMAGE_GIF,
        "bmp" => mime::IMAGE_BMP,
        "webp" => return "image/webp".parse().ok(),
        "tif" | "tiff" => return "image/tiff".parse().ok(),
        "psd" => return PSD_MIME.parse().ok(),
        _ => return None,
    };
    Some(mime)
}

/// Guesses a MIME type from a path's extension.
pub fn mime_for_path(path: &Path) -> Option<Mime> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(mime_for_extension)
}

/// Limits enforced on an upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntakeLimits {
    pub max_file_size: u64,
    pub allowed_mime_types: Vec<String>,
}

impl From<&AnalyzerConfig> for IntakeLimits {
    fn from(config: &AnalyzerConfig) -> Self {
        Self {
            max_file_size: config.max_file_size,
            allowed_mime_types: config.allowed_mime_types.clone(),
        }
    }
}

impl Default for IntakeLimits {
    fn default() -> Self {
        Self::from(&AnalyzerConfig::default())
    }
}

impl IntakeLimits {
    fn allows(&self, mime: &str) -> bool {
        self.allowed_mime_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(mime))
    }
}

/// Checks an upload against the limits.
///
/// # Errors
/// - `NO_FILES_UPLOADED` when `files` is empty
/// - `INVALID_FILE_TYPE` when a file's declared (or guessed) MIME type is
///   missing or not allowed
/// - `FILE_TOO_LARGE` when a declared size exceeds the maximum
pub fn validate_upload(files: &[SourceFile], limits: &IntakeLimits) -> Result<(), AdlensError> {
    if files.is_empty() {
        return Err(AdlensError::invalid_input(
            ErrorCode::NoFilesUploaded,
            "No files were uploaded",
        ));
    }

    for file in files {
        let mime = file
            .mime_type
            .clone()
            .or_else(|| mime_for_path(&file.path).map(|m| m.essence_str().to_string()));
        match mime {
            Some(mime) if limits.allows(&mime) => {}
            Some(mime) => {
                return Err(AdlensError::invalid_input(
                    ErrorCode::InvalidFileType,
                    format!("Unsupported file type '{mime}' for {}", file.file_name()),
                ))
            }
            None => {
                return Err(AdlensError::invalid_input(
                    ErrorCode::InvalidFileType,
                    format!("Unknown file type for {}", file.file_name()),
                ))
            }
        }

        if file.size > limits.max_file_size {
            return Err(AdlensError::invalid_input(
                ErrorCode::FileTooLarge,
                format!(
                    "{} is {} bytes, larger than the {} byte limit",
                    file.file_name(),
                    file.size,
                    limits.max_file_size
                ),
            ));
        }
    }

    Ok(())
}

/// Expands paths into source files.
///
/// Directories are walked recursively and contribute every file with a known
/// image extension, in sorted order. Explicit file paths are kept as given,
/// even when they do not exist.
///
/// # Errors
/// Returns `INVALID_FILE` for an existing empty file, and an I/O error if a
/// directory cannot be walked.
pub fn collect_sources(paths: &[PathBuf]) -> Result<Vec<SourceFile>, AdlensError> {
    let mut sources = Vec::new();

    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry.map_err(|e| AdlensError::Io(e.into()))?;
                if entry.file_type().is_file() && mime_for_path(entry.path()).is_some() {
                    sources.push(source_for(entry.path())?);
                }
            }
        } else {
            sources.push(source_for(path)?);
        }
    }

    Ok(sources)
}

fn source_for(path: &Path) -> Result<SourceFile, AdlensError> {
    let mime = mime_for_path(path).map(|m| m.essence_str().to_string());
    match std::fs::metadata(path) {
        Ok(meta) if meta.len() == 0 => Err(AdlensError::invalid_input(
            ErrorCode::InvalidFile,
            format!("{} is empty", path.display()),
        )),
        Ok(meta) => Ok(SourceFile::new(path, mime, meta.len())),
        Err(err) => {
            tracing::warn!(
                target: crate::pipeline::TRACING_TARGET,
                file = %path.display(),
                stage = "intake",
                error = %err,
                "cannot stat file, passing it through"
            );
            Ok(SourceFile::new(path, mime, 0))
        }
    }
}
