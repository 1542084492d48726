//! Normalized text observations.

use serde::{Deserialize, Serialize};

use crate::geometry::PixelRect;

/// One piece of text found in a creative.
///
/// PSD text layers and OCR lines both end up as a `TextElement`. Fields that
/// only one source can provide (layer path, OCR confidence) are `null` for
/// the other.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextElement {
    /// The literal text.
    pub text: String,
    /// Name of the PSD layer the text came from.
    pub layer_name: Option<String>,
    /// Slash-delimited path from the document root to the layer.
    pub path: Option<String>,
    /// Name of the enclosing group, if any.
    pub group: Option<String>,
    /// Bounding position in pixels.
    pub position: PixelRect,
    /// Resolved text style.
    pub style: TextStyle,
    /// OCR confidence (0-100), raster path only.
    pub confidence: Option<f64>,
}

impl TextElement {
    /// Creates an element with a default style at the given position.
    pub fn new(text: impl Into<String>, position: PixelRect) -> Self {
        Self {
            text: text.into(),
            layer_name: None,
            path: None,
            group: None,
            position,
            style: TextStyle::default(),
            confidence: None,
        }
    }

    /// Font size in points, 0 when unknown.
    pub fn font_size(&self) -> f64 {
        self.style.size
    }
}

/// Font and decoration of a text run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font: Option<String>,
    /// Font size; for OCR lines this is an estimate from the line height.
    pub size: f64,
    /// Hex color (`#rrggbb`, or `#rrggbbaa` when translucent).
    pub color: Option<String>,
    pub alignment: Option<String>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}
