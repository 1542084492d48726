//! Binary `.psd` reader backed by the `psd` crate.
//!
//! The crate exposes a flat layer list (top of the layers panel first) and a
//! map of groups linked by parent ids; this module rebuilds them into a
//! [`PsdDocument`] tree in panel order. Binary documents carry no text engine
//! data here, so every pixel layer becomes an image layer and text is
//! recovered from layer names by the walker.

use std::collections::{HashMap, HashSet};

use psd::{Psd, PsdGroup, PsdLayer};

use super::node::{ColorSources, LayerKind, LayerNode, PsdDocument};
use crate::model::LayerBounds;

/// The four-byte signature every PSD file starts with.
pub const PSD_SIGNATURE: &[u8; 4] = b"8BPS";

/// Returns true if `bytes` start with the PSD signature.
pub fn is_psd_signature(bytes: &[u8]) -> bool {
    bytes.starts_with(PSD_SIGNATURE)
}

/// A child slot in a container: a layer index or a group id.
#[derive(Clone, Copy, Debug)]
enum Slot {
    Layer(usize),
    Group(u32),
}

/// Sorts siblings into panel order: by first layer index, a group before
/// the layer it opens on, then by group id.
type SlotKey = (usize, u8, u32);

/// Parses a binary PSD into a layer tree.
///
/// Siblings come out in layers-panel order, top first, with groups and loose
/// layers interleaved where they sit in the file. The same bytes always
/// produce the same tree.
///
/// # Errors
/// Returns the decoder's message when the bytes are not a readable PSD.
pub fn from_psd_slice(bytes: &[u8]) -> Result<PsdDocument, String> {
    if !is_psd_signature(bytes) {
        return Err("missing 8BPS signature".to_string());
    }
    let psd = Psd::from_bytes(bytes).map_err(|e| e.to_string())?;
    let (width, height) = (psd.width(), psd.height());
    let layers = psd.layers();

    let mut groups: Vec<&PsdGroup> = psd.groups().values().collect();
    groups.sort_by_key(|g| g.id());
    let known: HashSet<u32> = groups.iter().map(|g| g.id()).collect();

    // Ids grow in file order, so a real parent always has the smaller id.
    let mut slots: HashMap<Option<u32>, Vec<(SlotKey, Slot)>> = HashMap::new();
    for group in &groups {
        let id = group.id();
        let parent = group.parent_id().filter(|p| *p < id && known.contains(p));
        let start = group_start(&psd, layers, id);
        slots
            .entry(parent)
            .or_default()
            .push(((start, 0, id), Slot::Group(id)));
    }
    for (index, layer) in layers.iter().enumerate() {
        let parent = layer.parent_id().filter(|p| known.contains(p));
        slots
            .entry(parent)
            .or_default()
            .push(((index, 1, 0), Slot::Layer(index)));
    }
    for siblings in slots.values_mut() {
        siblings.sort_by_key(|(key, _)| *key);
    }

    let mut leaves: Vec<Option<LayerNode>> =
        layers.iter().map(|l| Some(layer_node(l, width))).collect();
    let mut built: HashMap<u32, LayerNode> = HashMap::new();

    // Children have larger ids, so building in descending id order finishes
    // every nested group before its parent needs it.
    for group in groups.iter().rev() {
        let mut node = group_node(group);
        node.children = take_children(slots.remove(&Some(group.id())), &mut leaves, &mut built);
        built.insert(group.id(), node);
    }
    let roots = take_children(slots.remove(&None), &mut leaves, &mut built);

    Ok(PsdDocument::new(width, height).with_children(roots))
}

fn take_children(
    siblings: Option<Vec<(SlotKey, Slot)>>,
    leaves: &mut [Option<LayerNode>],
    built: &mut HashMap<u32, LayerNode>,
) -> Vec<LayerNode> {
    siblings
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(_, slot)| match slot {
            Slot::Layer(index) => leaves.get_mut(index).and_then(Option::take),
            Slot::Group(id) => built.remove(&id),
        })
        .collect()
}

/// Index of the first layer inside group `id`.
///
/// The crate keeps a group's layer range private but hands out the matching
/// sub-slice, so the start is found by address. Empty groups yield the index
/// of the layer that follows them.
fn group_start(psd: &Psd, layers: &[PsdLayer], id: u32) -> usize {
    let Some(contained) = psd.get_group_sub_layers(&id) else {
        return layers.len();
    };
    (0..=layers.len())
        .find(|&i| std::ptr::eq(layers[i..].as_ptr(), contained.as_ptr()))
        .unwrap_or(layers.len())
}

fn group_node(group: &PsdGroup) -> LayerNode {
    let bounds = exclusive_bounds(
        group.layer_top(),
        group.layer_left(),
        group.layer_bottom(),
        group.layer_right(),
    );
    let mut node = LayerNode::new(group.name(), LayerKind::Group, bounds);
    node.opacity = group.opacity();
    node.visible = group.visible();
    node.blend_mode = Some(blend_mode_name(&format!("{:?}", group.blend_mode())));
    node
}

/// The crate reports bottom and right as the last covered pixel; layer
/// bounds are exclusive.
fn exclusive_bounds(top: i32, left: i32, bottom: i32, right: i32) -> LayerBounds {
    LayerBounds::new(
        top,
        left,
        bottom.max(top).saturating_add(1),
        right.max(left).saturating_add(1),
    )
}

fn layer_node(layer: &PsdLayer, canvas_width: u32) -> LayerNode {
    let bounds = exclusive_bounds(
        layer.layer_top(),
        layer.layer_left(),
        layer.layer_bottom(),
        layer.layer_right(),
    );
    let mut node = LayerNode::new(layer.name(), LayerKind::Image, bounds);
    node.opacity = layer.opacity();
    node.visible = layer.visible();
    node.blend_mode = Some(blend_mode_name(&format!("{:?}", layer.blend_mode())));
    node.colors = ColorSources {
        channels: mean_opaque_pixel(&layer.rgba(), canvas_width, bounds),
        ..ColorSources::default()
    };
    node
}

/// Mean RGB of the opaque pixels of a canvas-sized RGBA buffer inside
/// `bounds`. Empty when the layer has no opaque pixel there.
pub(crate) fn mean_opaque_pixel(rgba: &[u8], canvas_width: u32, bounds: LayerBounds) -> Vec<f64> {
    let stride = canvas_width as usize * 4;
    if stride == 0 {
        return Vec::new();
    }
    let rows = rgba.len() / stride;

    let left = bounds.left.max(0) as usize;
    let right = (bounds.right.max(0) as usize).min(canvas_width as usize);
    let top = bounds.top.max(0) as usize;
    let bottom = (bounds.bottom.max(0) as usize).min(rows);

    let mut sum = [0u64; 3];
    let mut count = 0u64;
    for y in top..bottom {
        let row = &rgba[y * stride..(y + 1) * stride];
        for x in left..right {
            let px = &row[x * 4..x * 4 + 4];
            if px[3] == 0 {
                continue;
            }
            sum[0] += u64::from(px[0]);
            sum[1] += u64::from(px[1]);
            sum[2] += u64::from(px[2]);
            count += 1;
        }
    }

    if count == 0 {
        return Vec::new();
    }
    sum.iter().map(|s| *s as f64 / count as f64).collect()
}

/// `LinearBurn` -> `linearBurn`, matching the exported-tree spelling.
fn blend_mode_name(debug_name: &str) -> String {
    let mut chars = debug_name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
