#![allow(dead_code)]

use adlens::model::LayerBounds;
use adlens::psd::{LayerKind, LayerNode, PsdDocument};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

pub fn arb_hex() -> BoxedStrategy<String> {
    any::<(u8, u8, u8)>()
        .prop_map(|(r, g, b)| format!("#{r:02x}{g:02x}{b:02x}"))
        .boxed()
}

pub fn arb_bounds() -> BoxedStrategy<LayerBounds> {
    (0i32..2000, 0i32..2000, 1i32..500, 1i32..500)
        .prop_map(|(top, left, h, w)| LayerBounds::new(top, left, top + h, left + w))
        .boxed()
}

/// Layer names drawn so that every name bucket shows up.
pub fn arb_layer_name() -> BoxedStrategy<String> {
    prop_oneof![
        "[A-Za-z ]{1,12}",
        "Headline [0-9]{1,2}",
        "CTA [a-z]{1,5}",
        "Description",
        "<FR> [a-z]{1,8}",
    ]
    .boxed()
}

/// A non-group layer; roughly half carry text.
pub fn arb_leaf() -> BoxedStrategy<LayerNode> {
    (
        arb_layer_name(),
        arb_bounds(),
        proptest::option::of("[A-Za-z0-9 %]{1,20}"),
        any::<bool>(),
        proptest::option::of(proptest::collection::vec(0.0f64..=255.0, 3)),
    )
        .prop_map(|(name, bounds, text, visible, fill)| {
            let mut node = match text {
                Some(value) => LayerNode::text(name, bounds, value),
                None => LayerNode::new(name, LayerKind::Image, bounds),
            };
            node.visible = visible;
            node.colors.fill = fill;
            node
        })
        .boxed()
}

/// Trees up to four levels deep with up to five children per group.
pub fn arb_tree() -> BoxedStrategy<LayerNode> {
    arb_leaf()
        .prop_recursive(4, 64, 5, |inner| {
            ("[A-Za-z]{1,8}", arb_bounds(), proptest::collection::vec(inner, 0..5))
                .prop_map(|(name, bounds, children)| LayerNode::group(name, bounds, children))
        })
        .boxed()
}

pub fn arb_document() -> BoxedStrategy<PsdDocument> {
    (1u32..4000, 1u32..4000, proptest::collection::vec(arb_tree(), 0..6))
        .prop_map(|(w, h, children)| PsdDocument::new(w, h).with_children(children))
        .boxed()
}

/// Counts groups and non-group layers by plain recursion.
pub fn count_nodes(nodes: &[LayerNode]) -> (usize, usize) {
    nodes.iter().fold((0, 0), |(groups, layers), node| {
        if node.is_group() {
            let (g, l) = count_nodes(&node.children);
            (groups + 1 + g, layers + l)
        } else {
            (groups, layers + 1)
        }
    })
}
