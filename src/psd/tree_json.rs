//! Exported layer-tree JSON reader.
//!
//! Design tools and PSD toolkits can export a document's layer tree as JSON.
//! The accepted shape is:
//!
//! ```json
//! {
//!   "document": { "width": 1200, "height": 628, "resolution": 72 },
//!   "children": [
//!     { "type": "group", "name": "Hero", "top": 0, "left": 0, "bottom": 300, "right": 1200,
//!       "children": [
//!         { "type": "layer", "name": "Headline Copy", "top": 40, "left": 60, "bottom": 120, "right": 900,
//!           "text": { "value": "Save 20%", "font": { "names": ["Inter"], "sizes": [48],
//!                     "colors": [[255, 255, 255, 255]], "alignment": ["left"] } } }
//!       ] }
//!   ]
//! }
//! ```
//!
//! A node's `type` is `group`, `layer`, or an explicit kind (`text`, `image`,
//! `shape`, `adjustment`, `smartObject`). A plain `layer` becomes a text layer
//! when it carries a `text` object and an image layer otherwise; unknown types
//! are read as plain layers. Any node with a non-empty `children` list is read
//! as a group whatever its `type`.
//!
//! Nesting depth is bounded by `serde_json`'s recursion limit.

use serde::Deserialize;

use super::node::{ColorSources, FontInfo, LayerKind, LayerNode, PsdDocument, TextPayload};
use crate::model::LayerBounds;

// ============================================================================
// Export schema (internal to this module)
// ============================================================================

#[derive(Debug, Deserialize)]
struct TreeExport {
    document: ExportDocument,
    #[serde(default)]
    children: Vec<ExportNode>,
}

#[derive(Debug, Deserialize)]
struct ExportDocument {
    width: u32,
    height: u32,
    #[serde(default)]
    resolution: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportNode {
    #[serde(rename = "type", default)]
    node_type: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    top: i32,
    #[serde(default)]
    left: i32,
    #[serde(default)]
    bottom: i32,
    #[serde(default)]
    right: i32,
    #[serde(default = "default_visible")]
    visible: bool,
    /// 0-255.
    #[serde(default)]
    opacity: Option<f64>,
    #[serde(default, alias = "blendingMode")]
    blend_mode: Option<String>,
    #[serde(default)]
    text: Option<ExportText>,
    #[serde(default)]
    fill: Option<ExportFill>,
    #[serde(default)]
    solid_color: Option<Vec<f64>>,
    #[serde(default)]
    channels: Vec<f64>,
    #[serde(default)]
    additional_layer_properties: Option<AdditionalProperties>,
    #[serde(default)]
    children: Vec<ExportNode>,
}

fn default_visible() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct ExportText {
    #[serde(default)]
    value: String,
    #[serde(default)]
    font: ExportFont,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExportFont {
    names: Vec<String>,
    sizes: Vec<f64>,
    colors: Vec<Vec<f64>>,
    alignment: Vec<String>,
    bold: bool,
    italic: bool,
    underline: bool,
}

#[derive(Debug, Deserialize)]
struct ExportFill {
    #[serde(default)]
    color: Option<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdditionalProperties {
    #[serde(rename = "SoCo", default)]
    solid_color: Option<SolidColorBlock>,
}

#[derive(Debug, Deserialize)]
struct SolidColorBlock {
    data: SolidColorData,
}

#[derive(Debug, Deserialize)]
struct SolidColorData {
    #[serde(rename = "Clr")]
    color: UnitColor,
}

/// Components in 0-1.
#[derive(Debug, Deserialize)]
struct UnitColor {
    #[serde(rename = "Rd")]
    red: f64,
    #[serde(rename = "Grn")]
    green: f64,
    #[serde(rename = "Bl")]
    blue: f64,
}

// ============================================================================
// Public API
// ============================================================================

/// Parses an exported layer tree from JSON bytes.
pub fn from_tree_json_slice(bytes: &[u8]) -> Result<PsdDocument, serde_json::Error> {
    let export: TreeExport = serde_json::from_slice(bytes)?;
    Ok(export.into_document())
}

/// Parses an exported layer tree from a JSON string.
///
/// Useful for testing without file I/O.
pub fn from_tree_json_str(json: &str) -> Result<PsdDocument, serde_json::Error> {
    from_tree_json_slice(json.as_bytes())
}

// ============================================================================
// Conversion
// ============================================================================

impl TreeExport {
    fn into_document(self) -> PsdDocument {
        PsdDocument {
            width: self.document.width,
            height: self.document.height,
            resolution: self.document.resolution,
            children: self.children.into_iter().map(ExportNode::into_node).collect(),
        }
    }
}

impl ExportNode {
    fn kind(&self) -> LayerKind {
        if !self.children.is_empty() {
            return LayerKind::Group;
        }
        match self.node_type.as_str() {
            "group" => LayerKind::Group,
            "text" => LayerKind::Text,
            "image" => LayerKind::Image,
            "shape" => LayerKind::Shape,
            "adjustment" => LayerKind::Adjustment,
            "smartObject" => LayerKind::SmartObject,
            // "layer" and anything unrecognized
            _ if self.text.is_some() => LayerKind::Text,
            _ => LayerKind::Image,
        }
    }

    fn into_node(self) -> LayerNode {
        let kind = self.kind();
        let opacity = self
            .opacity
            .map(|o| o.round().clamp(0.0, 255.0) as u8)
            .unwrap_or(255);

        LayerNode {
            name: self.name,
            kind,
            bounds: LayerBounds::new(self.top, self.left, self.bottom, self.right),
            blend_mode: self.blend_mode,
            opacity,
            visible: self.visible,
            text: self.text.map(|text| TextPayload {
                value: text.value,
                font: FontInfo {
                    names: text.font.names,
                    sizes: text.font.sizes,
                    colors: text.font.colors,
                    alignment: text.font.alignment,
                    bold: text.font.bold,
                    italic: text.font.italic,
                    underline: text.font.underline,
                },
            }),
            colors: ColorSources {
                fill: self.fill.and_then(|f| f.color),
                solid_color: self.solid_color,
                channels: self.channels,
                additional_solid_color: self
                    .additional_layer_properties
                    .and_then(|p| p.solid_color)
                    .map(|soco| {
                        let c = soco.data.color;
                        [c.red, c.green, c.blue]
                    }),
            },
            children: self.children.into_iter().map(ExportNode::into_node).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANNER: &str = r#"{
        "document": {"width": 1200, "height": 628, "resolution": 144},
        "children": [
            {"type": "group", "name": "Hero", "top": 0, "left": 0, "bottom": 300, "right": 1200,
             "children": [
                {"type": "layer", "name": "Headline Copy", "top": 40, "left": 60, "bottom": 120, "right": 900,
                 "opacity": 204, "blendingMode": "multiply",
                 "text": {"value": "Save 20%", "font": {"names": ["Inter"], "sizes": [48],
                          "colors": [[255, 255, 255, 255]], "alignment": ["left"], "bold": true}}},
                {"type": "layer", "name": "Photo", "top": 0, "left": 0, "bottom": 300, "right": 600,
                 "visible": false, "channels": [12, 34, 56, 255]}
             ]},
            {"type": "shape", "name": "Badge", "top": 500, "left": 1000, "bottom": 600, "right": 1100,
             "fill": {"color": [255, 0, 0]},
             "additionalLayerProperties": {"SoCo": {"data": {"Clr": {"Rd": 0.0, "Grn": 1.0, "Bl": 0.0}}}}}
        ]
    }"#;

    #[test]
    fn test_reads_document_and_nesting() {
        let doc = from_tree_json_str(BANNER).unwrap();
        assert_eq!((doc.width, doc.height), (1200, 628));
        assert_eq!(doc.resolution, Some(144.0));
        assert_eq!(doc.children.len(), 2);

        let hero = &doc.children[0];
        assert!(hero.is_group());
        assert_eq!(hero.bounds, LayerBounds::new(0, 0, 300, 1200));
        assert_eq!(hero.children.len(), 2);
    }

    #[test]
    fn test_plain_layers_split_on_text_payload() {
        let doc = from_tree_json_str(BANNER).unwrap();
        let hero = &doc.children[0];

        let headline = &hero.children[0];
        assert_eq!(headline.kind, LayerKind::Text);
        assert_eq!(headline.opacity, 204);
        assert_eq!(headline.blend_mode.as_deref(), Some("multiply"));
        let text = headline.text.as_ref().unwrap();
        assert_eq!(text.value, "Save 20%");
        assert_eq!(text.font.sizes, vec![48.0]);
        assert!(text.font.bold);

        let photo = &hero.children[1];
        assert_eq!(photo.kind, LayerKind::Image);
        assert!(!photo.visible);
        assert_eq!(photo.opacity, 255);
        assert_eq!(photo.colors.channels, vec![12.0, 34.0, 56.0, 255.0]);
    }

    #[test]
    fn test_color_sources_are_kept_side_by_side() {
        let doc = from_tree_json_str(BANNER).unwrap();
        let badge = &doc.children[1];
        assert_eq!(badge.kind, LayerKind::Shape);
        assert_eq!(badge.colors.fill, Some(vec![255.0, 0.0, 0.0]));
        assert_eq!(badge.colors.additional_solid_color, Some([0.0, 1.0, 0.0]));
    }

    #[test]
    fn test_any_node_with_children_is_a_group() {
        let doc = from_tree_json_str(
            r#"{"document": {"width": 100, "height": 100},
                "children": [
                    {"type": "smartObject", "name": "Promo", "children": [
                        {"type": "layer", "name": "Headline", "text": {"value": "Save"}}
                    ]},
                    {"type": "smartObject", "name": "Logo", "children": []}
                ]}"#,
        )
        .unwrap();

        assert_eq!(doc.children[0].kind, LayerKind::Group);
        assert_eq!(doc.children[0].children[0].kind, LayerKind::Text);
        assert_eq!(doc.children[1].kind, LayerKind::SmartObject);
    }

    #[test]
    fn test_missing_document_is_an_error() {
        assert!(from_tree_json_str(r#"{"children": []}"#).is_err());
        assert!(from_tree_json_str("not json").is_err());
    }
}
