use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// The main error type for adlens operations.
#[derive(Debug, Error)]
pub enum AdlensError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid input: {message}")]
    InvalidInput { code: ErrorCode, message: String },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Failed to parse layer tree JSON from {path}: {source}")]
    LayerTreeJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported image data in {path}: {message}")]
    ImageProbe { path: PathBuf, message: String },

    #[error("Vision service {operation} failed: {message}")]
    ExternalService {
        operation: &'static str,
        message: String,
    },

    #[error("Vision service {operation} timed out after {}ms", timeout.as_millis())]
    ExternalServiceTimeout {
        operation: &'static str,
        timeout: Duration,
    },

    #[error("Invalid color '{0}': expected 6 hex digits")]
    InvalidColorFormat(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to write output: {0}")]
    OutputWrite(String),

    #[error("Background task failed: {0}")]
    Task(String),
}

impl AdlensError {
    /// Builds an [`AdlensError::InvalidInput`] with the given code.
    pub fn invalid_input(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            code,
            message: message.into(),
        }
    }

    /// Builds an [`AdlensError::Parse`] for the given path.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Builds an [`AdlensError::ExternalService`] failure.
    pub fn external(operation: &'static str, message: impl Into<String>) -> Self {
        Self::ExternalService {
            operation,
            message: message.into(),
        }
    }

    /// The caller-facing error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            AdlensError::InvalidInput { code, .. } => *code,
            AdlensError::Io(_)
            | AdlensError::FileRead { .. }
            | AdlensError::ImageProbe { .. }
            | AdlensError::Parse { .. }
            | AdlensError::LayerTreeJsonParse { .. } => ErrorCode::InvalidFile,
            AdlensError::ExternalService { .. }
            | AdlensError::ExternalServiceTimeout { .. }
            | AdlensError::InvalidColorFormat(_) => ErrorCode::ExtractionFailed,
            AdlensError::Config(_) | AdlensError::OutputWrite(_) | AdlensError::Task(_) => {
                ErrorCode::InternalServerError
            }
        }
    }

    /// The HTTP status a caller-facing boundary should answer with.
    pub fn http_status(&self) -> u16 {
        self.code().http_status()
    }
}

/// Caller-facing error codes, kept stable for HTTP compatibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NoFilesUploaded,
    InvalidFileType,
    FileTooLarge,
    InvalidFile,
    ExtractionFailed,
    InternalServerError,
}

impl ErrorCode {
    /// Returns the wire string for this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NoFilesUploaded => "NO_FILES_UPLOADED",
            ErrorCode::InvalidFileType => "INVALID_FILE_TYPE",
            ErrorCode::FileTooLarge => "FILE_TOO_LARGE",
            ErrorCode::InvalidFile => "INVALID_FILE",
            ErrorCode::ExtractionFailed => "EXTRACTION_FAILED",
            ErrorCode::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }

    /// HTTP status associated with this code.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorCode::NoFilesUploaded
            | ErrorCode::InvalidFileType
            | ErrorCode::FileTooLarge
            | ErrorCode::InvalidFile => 400,
            ErrorCode::ExtractionFailed => 422,
            ErrorCode::InternalServerError => 500,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `{message, code}` body placed in error responses and placeholder records.
///
/// `details` is only populated in development mode.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    /// Renders an error for callers, attaching the debug chain only in dev mode.
    pub fn from_error(err: &AdlensError, dev_mode: bool) -> Self {
        Self {
            message: err.to_string(),
            code: err.code(),
            details: dev_mode.then(|| format!("{err:?}")),
        }
    }
}
