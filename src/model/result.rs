//! The per-file extraction record.

use std::collections::BTreeMap;

use serde::Serialize;

use super::source::SourceFile;
use super::text::TextElement;
use crate::error::ErrorBody;
use crate::geometry::{Dimensions, PercentRect, Pixel, Region};
use crate::psd::LayerKind;

/// Everything extracted from one file.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ExtractionResult {
    pub file_info: FileInfo,
    pub analysis: Analysis,
    pub text_extraction: TextExtraction,
}

impl ExtractionResult {
    /// Builds the placeholder record returned for a file that failed.
    ///
    /// The record keeps the full output shape; only `file_info` is
    /// populated, with `error` set.
    pub fn placeholder(source: &SourceFile, error: ErrorBody) -> Self {
        Self {
            file_info: FileInfo {
                error: Some(error),
                ..FileInfo::from_source(source)
            },
            analysis: Analysis {
                status: AnalysisStatus::Error,
                ..Default::default()
            },
            text_extraction: TextExtraction::default(),
        }
    }

    /// Returns true if the file was extracted without a file-level error.
    pub fn is_success(&self) -> bool {
        self.file_info.error.is_none()
    }
}

/// Identity and basic facts about the source file.
#[derive(Clone, Debug, Default, Serialize)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: Option<String>,
    pub extension: String,
    pub dimensions: Option<Dimensions>,
    pub error: Option<ErrorBody>,
}

impl FileInfo {
    /// File info carrying only what the upload boundary declared.
    pub fn from_source(source: &SourceFile) -> Self {
        Self {
            name: source.file_name(),
            size: source.size,
            mime_type: source.mime_type.clone(),
            extension: source.extension.to_lowercase(),
            dimensions: None,
            error: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    #[default]
    Success,
    Error,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct Analysis {
    pub status: AnalysisStatus,
    pub image_specs: ImageSpecs,
    pub content: Content,
}

/// Canvas facts for the analysed image or document.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ImageSpecs {
    pub dimensions: Dimensions,
    pub format: String,
    pub aspect_ratio: f64,
    pub size_category: Option<SizeCategory>,
    pub color_space: String,
    pub resolution: Option<String>,
}

impl ImageSpecs {
    pub fn new(dimensions: Dimensions, format: impl Into<String>, size_category: SizeCategory) -> Self {
        Self {
            dimensions,
            format: format.into(),
            aspect_ratio: dimensions.aspect_ratio(),
            size_category: Some(size_category),
            color_space: "sRGB".to_string(),
            resolution: None,
        }
    }
}

/// Coarse size bucket of a canvas by pixel area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeCategory {
    Small,
    Medium,
    Large,
}

impl SizeCategory {
    /// Bucket for PSD documents: `<= 300 000` small, `<= 1 000 000` medium.
    pub fn for_psd(dimensions: Dimensions) -> Self {
        match dimensions.area() {
            0..=300_000 => SizeCategory::Small,
            300_001..=1_000_000 => SizeCategory::Medium,
            _ => SizeCategory::Large,
        }
    }

    /// Bucket for raster images: `< 250 000` small, `< 1 000 000` medium.
    pub fn for_raster(dimensions: Dimensions) -> Self {
        match dimensions.area() {
            0..=249_999 => SizeCategory::Small,
            250_000..=999_999 => SizeCategory::Medium,
            _ => SizeCategory::Large,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeCategory::Small => "small",
            SizeCategory::Medium => "medium",
            SizeCategory::Large => "large",
        }
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct Content {
    pub visual_elements: VisualElements,
    pub text_content: TextContent,
    pub color_scheme: ColorScheme,
    pub composition_metrics: CompositionMetrics,
    /// Every non-group layer, flattened in document order.
    pub layers: Vec<LayerSummary>,
    pub groups: Vec<GroupSummary>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct VisualElements {
    pub products: Vec<VisualElement>,
    pub people: Vec<VisualElement>,
    pub background_elements: Vec<VisualElement>,
    pub branding: Vec<VisualElement>,
}

impl VisualElements {
    pub fn len(&self) -> usize {
        self.products.len() + self.people.len() + self.background_elements.len() + self.branding.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A classified label detection.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VisualElement {
    pub name: String,
    pub confidence: f64,
    /// First instance box in percent of the frame.
    pub position: Option<PercentRect>,
    /// Normalized area of the first instance box (0-1).
    pub size: f64,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct TextContent {
    pub headline: Vec<TextElement>,
    pub body_text: Vec<TextElement>,
    pub cta: Vec<TextElement>,
    pub disclaimers: Vec<TextElement>,
    pub description: Vec<TextElement>,
}

impl TextContent {
    /// All elements, in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = &TextElement> {
        self.headline
            .iter()
            .chain(&self.body_text)
            .chain(&self.cta)
            .chain(&self.disclaimers)
            .chain(&self.description)
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ColorScheme {
    pub dominant: Option<String>,
    pub accent: Vec<String>,
    pub background: Option<String>,
    pub contrast_ratio: f64,
    /// Every distinct color with its provenance, in dominance order.
    pub palette: Vec<ColorEntry>,
}

/// A normalized color and where it came from.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColorEntry {
    pub hex: String,
    pub provenance: ColorProvenance,
    pub opacity: Option<u8>,
    pub blend_mode: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ColorProvenance {
    Layer { name: String, path: String },
    PixelSample,
}

/// Distribution of text and visuals across the frame.
///
/// `white_space` is not clamped and goes negative when coverage overlaps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct CompositionMetrics {
    pub text_coverage: f64,
    pub visual_coverage: f64,
    pub white_space: f64,
    pub balance_score: f64,
}

/// PSD-style `top/left/bottom/right` bounds in canvas pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LayerBounds {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
}

impl LayerBounds {
    pub fn new(top: i32, left: i32, bottom: i32, right: i32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn to_region(&self) -> Region<Pixel> {
        Region::from_bounds(self.top, self.left, self.bottom, self.right)
    }
}

/// One layer as reported in output.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LayerSummary {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    pub visible: bool,
    /// Raw opacity, 0-255.
    pub opacity: u8,
    /// Opacity as a rounded percentage.
    pub opacity_percent: u8,
    pub blend_mode: Option<String>,
    pub bounds: LayerBounds,
    pub color: Option<String>,
    pub text: Option<String>,
}

/// A group and its direct child layers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupSummary {
    pub name: String,
    pub path: String,
    pub bounds: LayerBounds,
    pub layers: Vec<LayerSummary>,
}

/// Flattened text fields for consumers that do not care about geometry.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TextExtraction {
    pub primary_text: String,
    pub headline: String,
    pub description: String,
    pub call_to_action: String,
    pub content_text: ContentText,
}

impl TextExtraction {
    /// Trims every flattened field and collapses internal whitespace runs.
    pub fn normalize(&mut self) {
        for field in [
            &mut self.primary_text,
            &mut self.headline,
            &mut self.description,
            &mut self.call_to_action,
            &mut self.content_text.all_text,
        ] {
            let collapsed = collapse_whitespace(field);
            *field = collapsed;
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ContentText {
    pub all_text: String,
    /// Group name to the texts found directly or indirectly inside it.
    pub by_group: BTreeMap<String, Vec<String>>,
}

/// Joins texts with single spaces, skipping blanks.
pub(crate) fn join_texts<'a>(texts: impl IntoIterator<Item = &'a str>) -> String {
    let joined = texts
        .into_iter()
        .filter(|t| !t.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    collapse_whitespace(&joined)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
