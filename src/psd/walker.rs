//! Depth-first projection of a layer tree into output records.
//!
//! The walk uses an explicit stack, so document depth never grows the call
//! stack. Each frame carries the slash-delimited path of its parent and the
//! groups that enclose it. Children are visited in document order and hidden
//! layers are walked like any other.

use std::collections::BTreeMap;

use super::classify::{classify_layer_name, strip_primary_marker, NameBucket};
use super::node::{ColorSources, LayerNode, PsdDocument, TextPayload};
use crate::color::{rgba_to_hex, unit_to_byte, Rgb};
use crate::model::{
    ColorEntry, ColorProvenance, GroupSummary, LayerSummary, TextElement, TextStyle,
};

/// A text element together with the bucket its layer name implies.
#[derive(Clone, Debug, PartialEq)]
pub struct BucketedText {
    pub bucket: NameBucket,
    pub element: TextElement,
}

/// Everything the walker derives from one document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WalkOutput {
    /// Text-bearing layers in document order.
    pub texts: Vec<BucketedText>,
    /// Every non-group node in document order.
    pub layers: Vec<LayerSummary>,
    /// Every group in document order, with its direct child layers.
    pub groups: Vec<GroupSummary>,
    /// Distinct colors in order of first appearance.
    pub colors: Vec<ColorEntry>,
    /// Group name to the texts found anywhere beneath it.
    pub texts_by_group: BTreeMap<String, Vec<String>>,
}

struct Frame<'a> {
    node: &'a LayerNode,
    parent_path: String,
    /// Indices into `WalkOutput::groups`, outermost first.
    enclosing_groups: Vec<usize>,
}

/// Walks every node of `document`.
pub fn walk(document: &PsdDocument) -> WalkOutput {
    let mut output = WalkOutput::default();
    let mut stack: Vec<Frame<'_>> = document
        .children
        .iter()
        .rev()
        .map(|node| Frame {
            node,
            parent_path: String::new(),
            enclosing_groups: Vec::new(),
        })
        .collect();

    while let Some(frame) = stack.pop() {
        let node = frame.node;
        let path = if frame.parent_path.is_empty() {
            node.name.clone()
        } else {
            format!("{}/{}", frame.parent_path, node.name)
        };

        let color = resolve_color(&node.colors);
        if let Some(hex) = &color {
            record_color(&mut output.colors, hex, node, &path);
        }

        if node.is_group() {
            output.groups.push(GroupSummary {
                name: node.name.clone(),
                path: path.clone(),
                bounds: node.bounds,
                layers: Vec::new(),
            });
            let mut enclosing = frame.enclosing_groups;
            enclosing.push(output.groups.len() - 1);

            for child in node.children.iter().rev() {
                stack.push(Frame {
                    node: child,
                    parent_path: path.clone(),
                    enclosing_groups: enclosing.clone(),
                });
            }
            continue;
        }

        let bucket = classify_layer_name(&node.name);
        let text = layer_text(node, bucket);
        let summary = layer_summary(node, &path, color, text.clone());

        if let Some(&parent) = frame.enclosing_groups.last() {
            output.groups[parent].layers.push(summary.clone());
        }
        output.layers.push(summary);

        if let Some(text) = text {
            for &idx in &frame.enclosing_groups {
                output
                    .texts_by_group
                    .entry(output.groups[idx].name.clone())
                    .or_default()
                    .push(text.clone());
            }

            let group = frame
                .enclosing_groups
                .last()
                .map(|&idx| output.groups[idx].name.clone());
            output.texts.push(BucketedText {
                bucket,
                element: text_element(node, &path, group, text),
            });
        }
    }

    output
}

/// Literal copy of a text-bearing layer, or `None` for other layers.
///
/// Text layers use their text payload. Layers without a payload count as
/// copy when their name is marked, and then the name is the copy.
fn layer_text(node: &LayerNode, bucket: NameBucket) -> Option<String> {
    let raw = match &node.text {
        Some(payload) => payload.value.clone(),
        None if bucket.is_marked() => node.name.clone(),
        None => return None,
    };

    let text = match bucket {
        NameBucket::Primary => strip_primary_marker(&raw),
        _ => raw.trim().to_string(),
    };
    (!text.is_empty()).then_some(text)
}

fn layer_summary(
    node: &LayerNode,
    path: &str,
    color: Option<String>,
    text: Option<String>,
) -> LayerSummary {
    LayerSummary {
        name: node.name.clone(),
        path: path.to_string(),
        kind: node.kind,
        visible: node.visible,
        opacity: node.opacity,
        opacity_percent: opacity_percent(node.opacity),
        blend_mode: node.blend_mode.clone(),
        bounds: node.bounds,
        color,
        text,
    }
}

fn text_element(node: &LayerNode, path: &str, group: Option<String>, text: String) -> TextElement {
    let mut element = TextElement::new(text, node.bounds.to_region().to_rect());
    element.layer_name = Some(node.name.clone());
    element.path = Some(path.to_string());
    element.group = group;
    if let Some(payload) = &node.text {
        element.style = text_style(payload);
    }
    element
}

fn text_style(payload: &TextPayload) -> TextStyle {
    let font = &payload.font;
    TextStyle {
        font: font.names.first().cloned(),
        size: font.sizes.first().copied().unwrap_or(0.0),
        color: font.colors.first().and_then(|c| rgba_to_hex(c)),
        alignment: font.alignment.first().cloned(),
        bold: font.bold,
        italic: font.italic,
        underline: font.underline,
    }
}

fn opacity_percent(opacity: u8) -> u8 {
    (f64::from(opacity) / 255.0 * 100.0).round() as u8
}

// ============================================================================
// Color resolution
// ============================================================================

type ColorSource = fn(&ColorSources) -> Option<String>;

/// Color sources in precedence order; the first that yields a color wins.
const COLOR_PRECEDENCE: &[ColorSource] = &[
    fill_color,
    solid_color,
    channel_sample,
    additional_solid_color,
];

/// Resolves a layer's color from the first source that has one.
pub fn resolve_color(sources: &ColorSources) -> Option<String> {
    COLOR_PRECEDENCE.iter().find_map(|source| source(sources))
}

fn fill_color(sources: &ColorSources) -> Option<String> {
    sources.fill.as_deref().and_then(rgb_hex)
}

fn solid_color(sources: &ColorSources) -> Option<String> {
    sources.solid_color.as_deref().and_then(rgb_hex)
}

fn channel_sample(sources: &ColorSources) -> Option<String> {
    rgb_hex(&sources.channels)
}

fn additional_solid_color(sources: &ColorSources) -> Option<String> {
    sources
        .additional_solid_color
        .map(|[r, g, b]| Rgb::new(unit_to_byte(r), unit_to_byte(g), unit_to_byte(b)).to_hex())
}

/// Hex of the first three components, ignoring any alpha.
fn rgb_hex(components: &[f64]) -> Option<String> {
    components.get(..3).and_then(rgba_to_hex)
}

fn record_color(colors: &mut Vec<ColorEntry>, hex: &str, node: &LayerNode, path: &str) {
    if colors.iter().any(|c| c.hex == hex) {
        return;
    }
    colors.push(ColorEntry {
        hex: hex.to_string(),
        provenance: ColorProvenance::Layer {
            name: node.name.clone(),
            path: path.to_string(),
        },
        opacity: Some(node.opacity),
        blend_mode: node.blend_mode.clone(),
    });
}
