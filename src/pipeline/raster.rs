//! Raster image extraction.
//!
//! Per file: read, probe the header, then run label detection, text
//! detection and color analysis concurrently. Composition metrics need both
//! detection results, so they are computed after the join.

use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use futures::FutureExt;

use super::probe::{decode_rgb, probe, ImageInfo};
use super::{join_error, placeholder, read_source, PipelineOptions, TRACING_TARGET};
use crate::color::{analyze_pixels, contrast_ratio, Palette};
use crate::error::AdlensError;
use crate::intake::mime_for_path;
use crate::model::{
    join_texts, Analysis, AnalysisStatus, BatchKind, BatchResult, ColorEntry, ColorProvenance,
    ColorScheme, Content, ContentText, ExtractionResult, FileInfo, ImageSpecs, SizeCategory,
    SourceFile, TextContent, TextElement, TextExtraction,
};
use crate::vision::{
    categorize_labels, categorize_text, composition_metrics, with_timeout, VisionImage,
    VisionService, DETECT_LABELS, DETECT_TEXT,
};

/// Body texts longer than this many characters may become the description.
pub const DESCRIPTION_MIN_CHARS: usize = 30;

/// Extracts raster images through an injected vision service.
#[derive(Clone)]
pub struct RasterPipeline {
    vision: Arc<dyn VisionService>,
    options: PipelineOptions,
}

impl RasterPipeline {
    pub fn new(vision: Arc<dyn VisionService>, options: PipelineOptions) -> Self {
        Self { vision, options }
    }

    /// Extracts every file, isolating failures per file.
    ///
    /// `results` follows the order of `files`.
    pub async fn run(&self, files: &[SourceFile]) -> BatchResult {
        let started = Instant::now();
        let results: Vec<ExtractionResult> = stream::iter(
            files
                .iter()
                .map(|file| self.extract_or_placeholder(file).boxed())
                .collect::<Vec<_>>(),
        )
        .buffered(self.options.concurrency.max(1))
        .collect()
        .await;

        let batch = BatchResult::from_results(BatchKind::Image, results);
        tracing::info!(
            target: TRACING_TARGET,
            processed = batch.processed_count,
            successful = batch.successful_count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "raster batch finished"
        );
        batch
    }

    async fn extract_or_placeholder(&self, file: &SourceFile) -> ExtractionResult {
        match self.extract(file).await {
            Ok(result) => result,
            Err(err) => placeholder(file, "raster", &err, self.options.dev_mode),
        }
    }

    /// Extracts one raster file.
    ///
    /// # Errors
    /// Fails if the file cannot be read or probed, or if either vision call
    /// fails or times out. A file that probes but does not decode still
    /// succeeds, with an empty color scheme.
    pub async fn extract(&self, file: &SourceFile) -> Result<ExtractionResult, AdlensError> {
        let started = Instant::now();
        let bytes = Arc::new(read_source(file).await?);
        let info = probe(&file.path, &bytes)?;
        tracing::debug!(
            target: TRACING_TARGET,
            file = %file.file_name(),
            width = info.dimensions.width,
            height = info.dimensions.height,
            format = %info.format,
            "probed image"
        );

        let timeout = self.options.vision_timeout;
        let image = VisionImage::new(Arc::clone(&bytes));
        let (labels, text, palette) = tokio::join!(
            with_timeout(DETECT_LABELS, timeout, self.vision.detect_labels(&image)),
            with_timeout(DETECT_TEXT, timeout, self.vision.detect_text(&image)),
            color_palette(file, Arc::clone(&bytes)),
        );
        let labels = labels?;
        let text = text?;
        let palette = palette?;

        let content = Content {
            visual_elements: categorize_labels(&labels),
            text_content: categorize_text(&text, info.dimensions),
            color_scheme: color_scheme(palette.as_ref())?,
            composition_metrics: composition_metrics(&text, &labels),
            layers: Vec::new(),
            groups: Vec::new(),
        };
        let text_extraction = text_extraction(&content.text_content);

        tracing::debug!(
            target: TRACING_TARGET,
            file = %file.file_name(),
            labels = labels.len(),
            text_detections = text.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "extracted raster file"
        );

        Ok(ExtractionResult {
            file_info: file_info(file, &info, bytes.len()),
            analysis: Analysis {
                status: AnalysisStatus::Success,
                image_specs: ImageSpecs::new(
                    info.dimensions,
                    info.format.clone(),
                    SizeCategory::for_raster(info.dimensions),
                ),
                content,
            },
            text_extraction,
        })
    }
}

fn file_info(file: &SourceFile, info: &ImageInfo, byte_len: usize) -> FileInfo {
    FileInfo {
        size: byte_len as u64,
        mime_type: file
            .mime_type
            .clone()
            .or_else(|| mime_for_path(&file.path).map(|m| m.to_string())),
        dimensions: Some(info.dimensions),
        ..FileInfo::from_source(file)
    }
}

/// Decodes and quantizes on the blocking pool.
///
/// Decoding failures yield `None`; only a failed task is an error.
async fn color_palette(file: &SourceFile, bytes: Arc<Vec<u8>>) -> Result<Option<Palette>, AdlensError> {
    let path = file.path.clone();
    let name = file.file_name();
    tokio::task::spawn_blocking(move || match decode_rgb(&path, &bytes) {
        Ok(pixels) => Some(analyze_pixels(&pixels)),
        Err(err) => {
            tracing::warn!(
                target: TRACING_TARGET,
                file = %name,
                stage = "color",
                error = %err,
                "could not decode pixels, leaving color scheme empty"
            );
            None
        }
    })
    .await
    .map_err(join_error)
}

/// Builds the color scheme from a ranked palette.
///
/// Contrast is measured between the background and dominant colors, and is
/// 0 when either is missing.
pub fn color_scheme(palette: Option<&Palette>) -> Result<ColorScheme, AdlensError> {
    let Some(palette) = palette else {
        return Ok(ColorScheme::default());
    };

    let dominant = palette.primary.first().cloned();
    let background = palette.background.first().cloned();
    let contrast = match (&background, &dominant) {
        (Some(bg), Some(fg)) => contrast_ratio(bg, fg)?,
        _ => 0.0,
    };

    let mut entries: Vec<ColorEntry> = Vec::new();
    for hex in palette
        .primary
        .iter()
        .chain(&palette.secondary)
        .chain(&palette.background)
    {
        if entries.iter().all(|e| &e.hex != hex) {
            entries.push(ColorEntry {
                hex: hex.clone(),
                provenance: ColorProvenance::PixelSample,
                opacity: None,
                blend_mode: None,
            });
        }
    }

    Ok(ColorScheme {
        dominant,
        accent: palette.secondary.clone(),
        background,
        contrast_ratio: contrast,
        palette: entries,
    })
}

/// Flattens categorized OCR lines.
///
/// Body lines are taken largest font first: the first one longer than
/// [`DESCRIPTION_MIN_CHARS`] becomes the description and the rest, followed
/// by disclaimers, form the primary text.
pub fn text_extraction(content: &TextContent) -> TextExtraction {
    let texts = |elements: &[TextElement]| join_texts(elements.iter().map(|e| e.text.as_str()));

    let mut body: Vec<&TextElement> = content.body_text.iter().collect();
    body.sort_by(|a, b| b.font_size().total_cmp(&a.font_size()));

    let mut description = String::new();
    let mut primary: Vec<&str> = Vec::new();
    for element in body {
        if description.is_empty() && element.text.chars().count() > DESCRIPTION_MIN_CHARS {
            description = element.text.clone();
        } else {
            primary.push(&element.text);
        }
    }
    primary.extend(content.disclaimers.iter().map(|e| e.text.as_str()));

    let mut extraction = TextExtraction {
        primary_text: join_texts(primary),
        headline: texts(&content.headline),
        description,
        call_to_action: texts(&content.cta),
        content_text: ContentText {
            all_text: join_texts(content.iter().map(|e| e.text.as_str())),
            by_group: Default::default(),
        },
    };
    extraction.normalize();
    extraction
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::geometry::{PixelRect, Region};
    use crate::vision::{LabelDetection, TextDetection, VisionImage};

    struct StubVision {
        labels: Vec<LabelDetection>,
        text: Vec<TextDetection>,
        delay: Duration,
    }

    #[async_trait]
    impl VisionService for StubVision {
        async fn detect_labels(&self, _image: &VisionImage) -> Result<Vec<LabelDetection>, AdlensError> {
            tokio::time::sleep(self.delay).await;
            Ok(self.labels.clone())
        }

        async fn detect_text(&self, _image: &VisionImage) -> Result<Vec<TextDetection>, AdlensError> {
            Ok(self.text.clone())
        }
    }

    fn bmp(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb(rgb));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Bmp).unwrap();
        out.into_inner()
    }

    fn element(text: &str, size: f64) -> TextElement {
        let mut e = TextElement::new(text, PixelRect::default());
        e.style.size = size;
        e
    }

    #[test]
    fn test_text_extraction_picks_description_by_size() {
        let content = TextContent {
            headline: vec![element("Summer  Sale", 60.0)],
            body_text: vec![
                element("Fresh produce delivered to your door every morning", 14.0),
                element("Free delivery", 16.0),
                element("Our bakers start at four so your bread is still warm", 18.0),
            ],
            cta: vec![element("Shop now", 16.0)],
            disclaimers: vec![element("T&Cs apply", 8.0)],
            description: Vec::new(),
        };

        let extraction = text_extraction(&content);
        assert_eq!(extraction.headline, "Summer Sale");
        assert_eq!(
            extraction.description,
            "Our bakers start at four so your bread is still warm"
        );
        assert_eq!(
            extraction.primary_text,
            "Free delivery Fresh produce delivered to your door every morning T&Cs apply"
        );
        assert_eq!(extraction.call_to_action, "Shop now");
        assert!(extraction.content_text.all_text.starts_with("Summer Sale"));
    }

    #[test]
    fn test_color_scheme_from_palette() {
        let palette = Palette {
            primary: vec!["#ffffff".into()],
            secondary: vec!["#ff0000".into(), "#00ff00".into()],
            background: vec!["#000000".into()],
        };
        let scheme = color_scheme(Some(&palette)).unwrap();
        assert_eq!(scheme.dominant.as_deref(), Some("#ffffff"));
        assert_eq!(scheme.accent.len(), 2);
        assert_eq!(scheme.contrast_ratio, 21.0);
        assert_eq!(scheme.palette.len(), 4);
        assert_eq!(scheme.palette[0].provenance, ColorProvenance::PixelSample);
    }

    #[test]
    fn test_solid_palette_has_no_contrast() {
        let palette = Palette {
            primary: vec!["#0000ff".into()],
            ..Default::default()
        };
        let scheme = color_scheme(Some(&palette)).unwrap();
        assert_eq!(scheme.background, None);
        assert_eq!(scheme.contrast_ratio, 0.0);
        assert!(color_scheme(None).unwrap().dominant.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_vision_becomes_timeout_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slow.bmp");
        std::fs::write(&path, bmp(4, 4, [0, 0, 0])).unwrap();

        let vision = StubVision {
            labels: Vec::new(),
            text: Vec::new(),
            delay: Duration::from_secs(60),
        };
        let pipeline = RasterPipeline::new(Arc::new(vision), PipelineOptions::default());
        let batch = pipeline.run(&[SourceFile::from_path(&path)]).await;

        assert_eq!(batch.processed_count, 1);
        assert_eq!(batch.successful_count, 0);
        let error = batch.results[0].file_info.error.as_ref().unwrap();
        assert_eq!(error.code, crate::error::ErrorCode::ExtractionFailed);
        assert!(error.message.contains("timed out"));
    }

    #[tokio::test]
    async fn test_extract_assembles_all_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("banner.bmp");
        std::fs::write(&path, bmp(1000, 1000, [200, 30, 30])).unwrap();

        let vision = StubVision {
            labels: vec![LabelDetection::new("Person", 99.0)
                .with_instance(Region::from_ltwh(0.5, 0.2, 0.4, 0.7), 99.0)],
            text: vec![TextDetection::line(
                "Summer Sale",
                95.0,
                Region::from_ltwh(0.1, 0.05, 0.5, 0.08),
            )],
            delay: Duration::ZERO,
        };
        let pipeline = RasterPipeline::new(Arc::new(vision), PipelineOptions::default());
        let result = pipeline.extract(&SourceFile::from_path(&path)).await.unwrap();

        assert!(result.is_success());
        assert_eq!(result.file_info.mime_type.as_deref(), Some("image/bmp"));
        assert_eq!(result.file_info.extension, ".bmp");
        let specs = &result.analysis.image_specs;
        assert_eq!(specs.format, "bmp");
        assert_eq!(specs.size_category, Some(SizeCategory::Large));
        assert_eq!(specs.aspect_ratio, 1.0);

        let content = &result.analysis.content;
        assert_eq!(content.visual_elements.people.len(), 1);
        assert_eq!(content.text_content.headline.len(), 1);
        assert_eq!(content.color_scheme.dominant.as_deref(), Some("#c81818"));
        assert!(content.composition_metrics.text_coverage > 0.0);
        assert_eq!(result.text_extraction.headline, "Summer Sale");
    }
}
