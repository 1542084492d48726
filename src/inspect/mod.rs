//! Layered document inspection.
//!
//! Produces a terminal report of a document's layer tree and the copy found
//! in it, for checking how a file will be read before analysing it.

mod report;

pub use report::{InspectReport, SummarySection, TextEntry, TreeLine};

use crate::psd::{walk, LayerKind, LayerNode, PsdDocument};

/// Options for document inspection.
#[derive(Clone, Debug)]
pub struct InspectOptions {
    /// Tree lines shown before the listing is cut off.
    pub max_tree_lines: usize,
    /// Characters of each text shown.
    pub max_text_chars: usize,
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self {
            max_tree_lines: 200,
            max_text_chars: 60,
        }
    }
}

/// Inspect a document and produce a report.
pub fn inspect_document(document: &PsdDocument, opts: &InspectOptions) -> InspectReport {
    let walked = walk(document);

    let summary = SummarySection {
        width: document.width,
        height: document.height,
        resolution: document.resolution,
        layers: walked.layers.len(),
        groups: walked.groups.len(),
        hidden_layers: walked.layers.iter().filter(|l| !l.visible).count(),
        text_layers: walked.texts.len(),
        colors: walked.colors.len(),
    };

    let texts = walked
        .texts
        .iter()
        .map(|t| TextEntry {
            bucket: t.bucket,
            path: t.element.path.clone().unwrap_or_default(),
            text: t.element.text.clone(),
        })
        .collect();

    let (tree, hidden_lines) = tree_lines(&document.children, opts.max_tree_lines);

    InspectReport {
        summary,
        tree,
        truncated_tree_lines: hidden_lines,
        texts,
        max_text_chars: opts.max_text_chars,
    }
}

/// Lists nodes depth first, returning the lines kept and the count cut off.
fn tree_lines(roots: &[LayerNode], limit: usize) -> (Vec<TreeLine>, usize) {
    let mut lines = Vec::new();
    let mut cut = 0usize;
    let mut stack: Vec<(&LayerNode, usize)> = roots.iter().rev().map(|n| (n, 0)).collect();

    while let Some((node, depth)) = stack.pop() {
        if lines.len() < limit {
            lines.push(TreeLine {
                depth,
                name: node.name.clone(),
                kind: if node.is_group() {
                    LayerKind::Group
                } else {
                    node.kind
                },
                visible: node.visible,
                opacity: node.opacity,
            });
        } else {
            cut += 1;
        }
        stack.extend(node.children.iter().rev().map(|c| (c, depth + 1)));
    }

    (lines, cut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LayerBounds;
    use crate::psd::NameBucket;

    fn document() -> PsdDocument {
        let bounds = LayerBounds::new(0, 0, 50, 50);
        let mut hidden = LayerNode::new("Old background", LayerKind::Image, bounds);
        hidden.visible = false;
        PsdDocument::new(600, 400).with_children(vec![
            LayerNode::group(
                "Hero",
                bounds,
                vec![LayerNode::text("Headline Copy", bounds, "Save 20%")],
            ),
            hidden,
        ])
    }

    #[test]
    fn test_inspect_counts() {
        let report = inspect_document(&document(), &InspectOptions::default());
        assert_eq!(report.summary.layers, 2);
        assert_eq!(report.summary.groups, 1);
        assert_eq!(report.summary.hidden_layers, 1);
        assert_eq!(report.summary.text_layers, 1);
        assert_eq!(report.texts[0].bucket, NameBucket::Headline);
        assert_eq!(report.texts[0].path, "Hero/Headline Copy");
    }

    #[test]
    fn test_tree_is_depth_first_with_depths() {
        let report = inspect_document(&document(), &InspectOptions::default());
        let tree: Vec<(usize, &str)> = report
            .tree
            .iter()
            .map(|l| (l.depth, l.name.as_str()))
            .collect();
        assert_eq!(
            tree,
            [(0, "Hero"), (1, "Headline Copy"), (0, "Old background")]
        );
    }

    #[test]
    fn test_tree_limit_counts_cut_lines() {
        let opts = InspectOptions {
            max_tree_lines: 1,
            ..Default::default()
        };
        let report = inspect_document(&document(), &opts);
        assert_eq!(report.tree.len(), 1);
        assert_eq!(report.truncated_tree_lines, 2);
    }
}
