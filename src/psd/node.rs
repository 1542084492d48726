//! The layer tree handed from a parser to the walker.
//!
//! Parsers build this tree once per document and own it for the duration of
//! one extraction; the walker only reads it.

use serde::{Deserialize, Serialize};

use crate::geometry::Dimensions;
use crate::model::LayerBounds;

/// Resolution assumed when a document does not declare one.
pub const DEFAULT_RESOLUTION_DPI: f64 = 72.0;

/// What a layer node is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayerKind {
    Group,
    Text,
    Image,
    Shape,
    Adjustment,
    SmartObject,
}

impl LayerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::Group => "group",
            LayerKind::Text => "text",
            LayerKind::Image => "image",
            LayerKind::Shape => "shape",
            LayerKind::Adjustment => "adjustment",
            LayerKind::SmartObject => "smartObject",
        }
    }
}

/// A parsed document: canvas facts plus the top-level nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct PsdDocument {
    pub width: u32,
    pub height: u32,
    /// Pixels per inch, when the source declares it.
    pub resolution: Option<f64>,
    pub children: Vec<LayerNode>,
}

impl PsdDocument {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            resolution: None,
            children: Vec::new(),
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    pub fn with_children(mut self, children: Vec<LayerNode>) -> Self {
        self.children = children;
        self
    }
}

/// One group or layer.
///
/// A group's bounds are whatever the parser reported; they are never
/// recomputed from the children.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerNode {
    pub name: String,
    pub kind: LayerKind,
    pub bounds: LayerBounds,
    pub blend_mode: Option<String>,
    /// 0-255.
    pub opacity: u8,
    pub visible: bool,
    pub text: Option<TextPayload>,
    pub colors: ColorSources,
    pub children: Vec<LayerNode>,
}

impl LayerNode {
    /// A visible, fully opaque node with no payload.
    pub fn new(name: impl Into<String>, kind: LayerKind, bounds: LayerBounds) -> Self {
        Self {
            name: name.into(),
            kind,
            bounds,
            blend_mode: None,
            opacity: 255,
            visible: true,
            text: None,
            colors: ColorSources::default(),
            children: Vec::new(),
        }
    }

    pub fn group(name: impl Into<String>, bounds: LayerBounds, children: Vec<LayerNode>) -> Self {
        Self {
            children,
            ..Self::new(name, LayerKind::Group, bounds)
        }
    }

    /// A text layer carrying `value` with a default font.
    pub fn text(name: impl Into<String>, bounds: LayerBounds, value: impl Into<String>) -> Self {
        Self {
            text: Some(TextPayload::new(value)),
            ..Self::new(name, LayerKind::Text, bounds)
        }
    }

    /// True for groups and for any other node that has children.
    pub fn is_group(&self) -> bool {
        self.kind == LayerKind::Group || !self.children.is_empty()
    }
}

/// Text engine data of a text layer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextPayload {
    pub value: String,
    pub font: FontInfo,
}

impl TextPayload {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            font: FontInfo::default(),
        }
    }
}

/// Per-run font facts; the walker uses the first entry of each list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FontInfo {
    pub names: Vec<String>,
    pub sizes: Vec<f64>,
    /// `[r, g, b, a]` in 0-255.
    pub colors: Vec<Vec<f64>>,
    pub alignment: Vec<String>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

/// Every place a layer color may be recorded.
///
/// Sources are raw; precedence is decided by the walker.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorSources {
    /// Explicit fill color, 0-255 channels.
    pub fill: Option<Vec<f64>>,
    /// Solid-color layer property, 0-255 channels.
    pub solid_color: Option<Vec<f64>>,
    /// Per-channel samples; the first three are read as R, G, B.
    pub channels: Vec<f64>,
    /// `SoCo` additional-layer-property color, 0-1 channels.
    pub additional_solid_color: Option<[f64; 3]>,
}
