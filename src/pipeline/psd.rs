//! Layered document extraction.
//!
//! Parsing and walking are CPU-bound and run on the blocking pool. The
//! parser is injected so binary documents and exported layer trees go
//! through the same assembly.

use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use futures::FutureExt;

use super::{join_error, placeholder, read_source, PipelineOptions, TRACING_TARGET};
use crate::error::AdlensError;
use crate::intake::mime_for_path;
use crate::model::{
    join_texts, Analysis, AnalysisStatus, BatchKind, BatchResult, ColorScheme, CompositionMetrics,
    Content, ContentText, ExtractionResult, FileInfo, ImageSpecs, SizeCategory, SourceFile,
    TextContent, TextExtraction, VisualElements,
};
use crate::psd::node::DEFAULT_RESOLUTION_DPI;
use crate::psd::{walk, BucketedText, NameBucket, PsdDocument, PsdParser, WalkOutput};

/// Format reported for every layered document.
pub const PSD_FORMAT: &str = "psd";

/// Number of colors after the dominant one reported as accents.
const ACCENT_COLORS: usize = 2;

/// Extracts layered documents through an injected parser.
#[derive(Clone)]
pub struct PsdPipeline {
    parser: Arc<dyn PsdParser>,
    options: PipelineOptions,
}

impl PsdPipeline {
    pub fn new(parser: Arc<dyn PsdParser>, options: PipelineOptions) -> Self {
        Self { parser, options }
    }

    /// Extracts every document; a malformed one becomes a placeholder.
    pub async fn run(&self, files: &[SourceFile]) -> BatchResult {
        let started = Instant::now();
        let results: Vec<ExtractionResult> = stream::iter(
            files
                .iter()
                .map(|file| {
                    async move {
                        match self.extract(file).await {
                            Ok(result) => result,
                            Err(err) => placeholder(file, "psd", &err, self.options.dev_mode),
                        }
                    }
                    .boxed()
                })
                .collect::<Vec<_>>(),
        )
        .buffered(self.options.concurrency.max(1))
        .collect()
        .await;

        let batch = BatchResult::from_results(BatchKind::Psd, results);
        tracing::info!(
            target: TRACING_TARGET,
            processed = batch.processed_count,
            successful = batch.successful_count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "psd batch finished"
        );
        batch
    }

    /// Extracts one document.
    ///
    /// # Errors
    /// Fails if the file cannot be read or parsed.
    pub async fn extract(&self, file: &SourceFile) -> Result<ExtractionResult, AdlensError> {
        let started = Instant::now();
        let bytes = read_source(file).await?;
        let byte_len = bytes.len();

        let parser = Arc::clone(&self.parser);
        let path = file.path.clone();
        let (document, walked) = tokio::task::spawn_blocking(move || {
            let document = parser.parse(&path, &bytes)?;
            let walked = walk(&document);
            Ok::<_, AdlensError>((document, walked))
        })
        .await
        .map_err(join_error)??;

        tracing::debug!(
            target: TRACING_TARGET,
            file = %file.file_name(),
            layers = walked.layers.len(),
            groups = walked.groups.len(),
            texts = walked.texts.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "extracted psd file"
        );

        Ok(assemble(file, byte_len, &document, walked))
    }
}

/// Builds the output record from a parsed document and its walk.
pub fn assemble(
    file: &SourceFile,
    byte_len: usize,
    document: &PsdDocument,
    walked: WalkOutput,
) -> ExtractionResult {
    let dimensions = document.dimensions();
    let mut image_specs = ImageSpecs::new(dimensions, PSD_FORMAT, SizeCategory::for_psd(dimensions));
    image_specs.resolution = Some(format_resolution(
        document.resolution.unwrap_or(DEFAULT_RESOLUTION_DPI),
    ));

    let text_extraction = text_extraction(&walked);
    let WalkOutput {
        texts,
        layers,
        groups,
        colors,
        ..
    } = walked;

    let color_scheme = ColorScheme {
        dominant: colors.first().map(|c| c.hex.clone()),
        accent: colors
            .iter()
            .skip(1)
            .take(ACCENT_COLORS)
            .map(|c| c.hex.clone())
            .collect(),
        background: None,
        contrast_ratio: 0.0,
        palette: colors,
    };

    ExtractionResult {
        file_info: FileInfo {
            size: byte_len as u64,
            mime_type: file
                .mime_type
                .clone()
                .or_else(|| mime_for_path(&file.path).map(|m| m.to_string())),
            dimensions: Some(dimensions),
            ..FileInfo::from_source(file)
        },
        analysis: Analysis {
            status: AnalysisStatus::Success,
            image_specs,
            content: Content {
                visual_elements: VisualElements::default(),
                text_content: text_content(texts),
                color_scheme,
                composition_metrics: CompositionMetrics::default(),
                layers,
                groups,
            },
        },
        text_extraction,
    }
}

/// Sorts walked texts into output buckets. Marked primary copy counts as body.
fn text_content(texts: Vec<BucketedText>) -> TextContent {
    let mut content = TextContent::default();
    for BucketedText { bucket, element } in texts {
        match bucket {
            NameBucket::Headline => content.headline.push(element),
            NameBucket::CallToAction => content.cta.push(element),
            NameBucket::Description => content.description.push(element),
            NameBucket::Primary | NameBucket::Body => content.body_text.push(element),
        }
    }
    content
}

fn text_extraction(walked: &WalkOutput) -> TextExtraction {
    let bucket_text = |wanted: NameBucket| {
        join_texts(
            walked
                .texts
                .iter()
                .filter(|t| t.bucket == wanted)
                .map(|t| t.element.text.as_str()),
        )
    };

    let all_text = join_texts(walked.texts.iter().map(|t| t.element.text.as_str()));
    let primary = bucket_text(NameBucket::Primary);

    let mut extraction = TextExtraction {
        primary_text: if primary.is_empty() {
            all_text.clone()
        } else {
            primary
        },
        headline: bucket_text(NameBucket::Headline),
        description: bucket_text(NameBucket::Description),
        call_to_action: bucket_text(NameBucket::CallToAction),
        content_text: ContentText {
            all_text,
            by_group: walked.texts_by_group.clone(),
        },
    };
    extraction.normalize();
    extraction
}

fn format_resolution(dpi: f64) -> String {
    if dpi.fract() == 0.0 {
        format!("{dpi:.0} dpi")
    } else {
        format!("{dpi} dpi")
    }
}
