//! Renderings of an analysis response for the command line.
//!
//! JSON is the response body as an HTTP caller would receive it: the raster
//! batch followed by the PSD batch. Text is a human summary built from each
//! batch's `Display`. CSV flattens every file into one row.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::AdlensError;
use crate::model::{BatchKind, BatchResult, ExtractionResult};

/// Output format for `analyse`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Json => "json",
            OutputFormat::Text => "text",
            OutputFormat::Csv => "csv",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = AdlensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "text" => Ok(OutputFormat::Text),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(AdlensError::Config(format!(
                "unknown output format '{other}' (supported: json, text, csv)"
            ))),
        }
    }
}

/// Renders a response in the requested format.
pub fn render(batches: &[BatchResult], format: OutputFormat) -> Result<String, AdlensError> {
    match format {
        OutputFormat::Json => to_json_string(batches),
        OutputFormat::Text => Ok(to_text_string(batches)),
        OutputFormat::Csv => to_csv_string(batches),
    }
}

pub fn to_json_string(batches: &[BatchResult]) -> Result<String, AdlensError> {
    serde_json::to_string_pretty(batches).map_err(|e| AdlensError::OutputWrite(e.to_string()))
}

pub fn to_text_string(batches: &[BatchResult]) -> String {
    batches
        .iter()
        .map(|batch| batch.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// One CSV row per file.
#[derive(Debug, Serialize)]
struct FileRow<'a> {
    batch: &'static str,
    file: &'a str,
    status: &'static str,
    error_code: &'static str,
    width: u32,
    height: u32,
    format: &'a str,
    size_category: &'static str,
    headline: &'a str,
    call_to_action: &'a str,
    primary_text: &'a str,
    dominant_color: &'a str,
    text_coverage: f64,
    visual_coverage: f64,
    balance_score: f64,
}

impl<'a> FileRow<'a> {
    fn new(kind: BatchKind, result: &'a ExtractionResult) -> Self {
        let specs = &result.analysis.image_specs;
        let content = &result.analysis.content;
        let metrics = &content.composition_metrics;
        let error = result.file_info.error.as_ref();
        Self {
            batch: match kind {
                BatchKind::Image => "image",
                BatchKind::Psd => "psd",
            },
            file: &result.file_info.name,
            status: if error.is_some() { "error" } else { "success" },
            error_code: error.map(|e| e.code.as_str()).unwrap_or(""),
            width: specs.dimensions.width,
            height: specs.dimensions.height,
            format: &specs.format,
            size_category: specs.size_category.map(|c| c.as_str()).unwrap_or(""),
            headline: &result.text_extraction.headline,
            call_to_action: &result.text_extraction.call_to_action,
            primary_text: &result.text_extraction.primary_text,
            dominant_color: content.color_scheme.dominant.as_deref().unwrap_or(""),
            text_coverage: metrics.text_coverage,
            visual_coverage: metrics.visual_coverage,
            balance_score: metrics.balance_score,
        }
    }
}

pub fn to_csv_string(batches: &[BatchResult]) -> Result<String, AdlensError> {
    let mut csv_writer = csv::Writer::from_writer(Vec::new());
    for batch in batches {
        for result in &batch.results {
            csv_writer
                .serialize(FileRow::new(batch.kind, result))
                .map_err(|e| AdlensError::OutputWrite(e.to_string()))?;
        }
    }

    let bytes = csv_writer
        .into_inner()
        .map_err(|e| AdlensError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| AdlensError::OutputWrite(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorBody, ErrorCode};
    use crate::model::SourceFile;

    fn batches() -> Vec<BatchResult> {
        let mut ok = ExtractionResult::default();
        ok.file_info.name = "hero.png".into();
        ok.text_extraction.headline = "Save, now".into();

        let err = AdlensError::invalid_input(ErrorCode::InvalidFile, "Invalid file path");
        let failed = ExtractionResult::placeholder(
            &SourceFile::from_path("gone.png"),
            ErrorBody::from_error(&err, false),
        );

        vec![
            BatchResult::from_results(BatchKind::Image, vec![ok, failed]),
            BatchResult::empty(BatchKind::Psd),
        ]
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert!("yaml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::default().to_string(), "json");
    }

    #[test]
    fn test_json_is_array_of_two_batches() {
        let json: serde_json::Value =
            serde_json::from_str(&render(&batches(), OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 2);
        assert_eq!(json[0]["type"], "image");
        assert_eq!(json[1]["processed_count"], 0);
    }

    #[test]
    fn test_csv_has_row_per_file() {
        let csv = render(&batches(), OutputFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("batch,file,status,error_code"));
        assert!(lines[1].contains("\"Save, now\""));
        assert!(lines[2].contains("gone.png,error,INVALID_FILE"));
    }

    #[test]
    fn test_text_lists_both_batches() {
        let text = render(&batches(), OutputFormat::Text).unwrap();
        assert!(text.contains("Image batch: 2 processed, 1 successful, 1 failed"));
        assert!(text.contains("PSD batch: 0 processed"));
    }
}
