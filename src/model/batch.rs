//! Per-pipeline batch outcomes.

use std::fmt;

use serde::Serialize;

use super::result::ExtractionResult;
use crate::error::ErrorBody;

/// Which pipeline produced a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchKind {
    Image,
    Psd,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    Success,
    Error,
}

/// The outcome of running one pipeline over a set of files.
///
/// `processed_count` counts every file that was attempted, including
/// placeholders; `successful_count` counts only files without an error.
#[derive(Clone, Debug, Serialize)]
pub struct BatchResult {
    #[serde(rename = "type")]
    pub kind: BatchKind,
    pub status: BatchStatus,
    pub processed_count: usize,
    pub successful_count: usize,
    pub results: Vec<ExtractionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl BatchResult {
    /// Builds a successful batch from ordered per-file results.
    pub fn from_results(kind: BatchKind, results: Vec<ExtractionResult>) -> Self {
        let successful_count = results.iter().filter(|r| r.is_success()).count();
        Self {
            kind,
            status: BatchStatus::Success,
            processed_count: results.len(),
            successful_count,
            results,
            error: None,
        }
    }

    /// A well-formed batch for an empty partition.
    pub fn empty(kind: BatchKind) -> Self {
        Self::from_results(kind, Vec::new())
    }

    /// A batch that could not run at all.
    pub fn failed(kind: BatchKind, error: ErrorBody) -> Self {
        Self {
            kind,
            status: BatchStatus::Error,
            processed_count: 0,
            successful_count: 0,
            results: Vec::new(),
            error: Some(error),
        }
    }

    pub fn failed_count(&self) -> usize {
        self.processed_count - self.successful_count
    }
}

impl fmt::Display for BatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.kind {
            BatchKind::Image => "Image batch",
            BatchKind::Psd => "PSD batch",
        };

        if let Some(error) = &self.error {
            return writeln!(f, "{label}: failed [{}] {}", error.code, error.message);
        }

        writeln!(
            f,
            "{label}: {} processed, {} successful, {} failed",
            self.processed_count,
            self.successful_count,
            self.failed_count()
        )?;

        for result in &self.results {
            let info = &result.file_info;
            match &info.error {
                Some(error) => writeln!(f, "  ✗ {} [{}] {}", info.name, error.code, error.message)?,
                None => {
                    let specs = &result.analysis.image_specs;
                    writeln!(
                        f,
                        "  ✓ {} ({}x{} {}, {})",
                        info.name,
                        specs.dimensions.width,
                        specs.dimensions.height,
                        specs.format,
                        specs.size_category.map(|c| c.as_str()).unwrap_or("unknown"),
                    )?;
                    let text = &result.text_extraction;
                    if !text.headline.is_empty() {
                        writeln!(f, "      headline: {}", text.headline)?;
                    }
                    if !text.call_to_action.is_empty() {
                        writeln!(f, "      call to action: {}", text.call_to_action)?;
                    }
                    if let Some(dominant) = &result.analysis.content.color_scheme.dominant {
                        writeln!(f, "      dominant color: {dominant}")?;
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AdlensError, ErrorCode};
    use crate::model::SourceFile;

    #[test]
    fn test_counts_exclude_placeholders() {
        let ok = ExtractionResult::default();
        let source = SourceFile::from_path("b.png");
        let err = AdlensError::invalid_input(ErrorCode::InvalidFile, "Invalid file path");
        let failed = ExtractionResult::placeholder(&source, ErrorBody::from_error(&err, false));

        let batch = BatchResult::from_results(BatchKind::Image, vec![ok.clone(), failed, ok]);
        assert_eq!(batch.processed_count, 3);
        assert_eq!(batch.successful_count, 2);
        assert_eq!(batch.failed_count(), 1);
        assert_eq!(batch.status, BatchStatus::Success);
    }

    #[test]
    fn test_empty_batch_is_well_formed() {
        let batch = BatchResult::empty(BatchKind::Psd);
        let json = serde_json::to_value(&batch).unwrap();
        assert_eq!(json["type"], "psd");
        assert_eq!(json["status"], "success");
        assert_eq!(json["processed_count"], 0);
        assert_eq!(json["results"], serde_json::json!([]));
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_display_lists_failures() {
        let source = SourceFile::from_path("missing.png");
        let err = AdlensError::invalid_input(ErrorCode::InvalidFile, "Invalid file path");
        let failed = ExtractionResult::placeholder(&source, ErrorBody::from_error(&err, false));
        let batch = BatchResult::from_results(BatchKind::Image, vec![failed]);

        let output = batch.to_string();
        assert!(output.contains("1 processed, 0 successful, 1 failed"));
        assert!(output.contains("missing.png [INVALID_FILE]"));
    }
}
