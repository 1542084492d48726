//! Inspect report types and terminal formatting.

use std::fmt;

use crate::psd::{LayerKind, NameBucket};

/// The result of inspecting a layered document.
#[derive(Clone, Debug)]
pub struct InspectReport {
    pub summary: SummarySection,
    /// Layer tree in document order.
    pub tree: Vec<TreeLine>,
    /// Nodes left out of `tree` by the line limit.
    pub truncated_tree_lines: usize,
    /// Copy found in text-bearing layers.
    pub texts: Vec<TextEntry>,
    pub(crate) max_text_chars: usize,
}

/// Canvas and layer counts.
#[derive(Clone, Debug, Default)]
pub struct SummarySection {
    pub width: u32,
    pub height: u32,
    pub resolution: Option<f64>,
    /// Non-group layers.
    pub layers: usize,
    pub groups: usize,
    pub hidden_layers: usize,
    pub text_layers: usize,
    /// Distinct resolved layer colors.
    pub colors: usize,
}

/// One node of the layer tree.
#[derive(Clone, Debug)]
pub struct TreeLine {
    pub depth: usize,
    pub name: String,
    pub kind: LayerKind,
    pub visible: bool,
    pub opacity: u8,
}

/// A piece of copy and how its layer name classifies it.
#[derive(Clone, Debug)]
pub struct TextEntry {
    pub bucket: NameBucket,
    pub path: String,
    pub text: String,
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "╭─────────────────────────────────────────────────────────────╮")?;
        writeln!(f, "│              🗂  Document Inspection Report                  │")?;
        writeln!(f, "╰─────────────────────────────────────────────────────────────╯")?;
        writeln!(f)?;

        self.fmt_summary(f)?;
        writeln!(f)?;
        self.fmt_tree(f)?;
        writeln!(f)?;
        self.fmt_texts(f)?;

        Ok(())
    }
}

impl InspectReport {
    fn fmt_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;

        writeln!(f, "┌─ Summary ─────────────────────────────────────────────────")?;
        writeln!(f, "│   Canvas:        {} x {} px", s.width, s.height)?;
        match s.resolution {
            Some(dpi) => writeln!(f, "│   Resolution:    {dpi} dpi")?,
            None => writeln!(f, "│   Resolution:    not recorded")?,
        }
        writeln!(f, "│   Layers:        {:>8}", s.layers)?;
        writeln!(f, "│   Groups:        {:>8}", s.groups)?;
        writeln!(f, "│   Text layers:   {:>8}", s.text_layers)?;
        if s.hidden_layers > 0 {
            writeln!(f, "│   Hidden:        {:>8}", s.hidden_layers)?;
        }
        writeln!(f, "│   Colors:        {:>8}", s.colors)?;
        writeln!(f, "└───────────────────────────────────────────────────────────")?;

        Ok(())
    }

    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "┌─ Layer Tree ──────────────────────────────────────────────")?;

        if self.tree.is_empty() {
            writeln!(f, "│   No layers found.")?;
        }
        for line in &self.tree {
            let marker = if line.kind == LayerKind::Group { "▸" } else { "·" };
            let hidden = if line.visible { "" } else { " (hidden)" };
            let opacity = if line.opacity < u8::MAX {
                format!(" {}%", (f64::from(line.opacity) / 255.0 * 100.0).round())
            } else {
                String::new()
            };
            writeln!(
                f,
                "│   {}{} {} [{}]{}{}",
                "  ".repeat(line.depth),
                marker,
                line.name,
                line.kind.as_str(),
                opacity,
                hidden
            )?;
        }
        if self.truncated_tree_lines > 0 {
            writeln!(f, "│   … {} more", self.truncated_tree_lines)?;
        }
        writeln!(f, "└───────────────────────────────────────────────────────────")?;

        Ok(())
    }

    fn fmt_texts(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "┌─ Text ({}) ───────────────────────────────────────────────", self.texts.len())?;

        if self.texts.is_empty() {
            writeln!(f, "│   No text layers found.")?;
        }
        for entry in &self.texts {
            writeln!(
                f,
                "│   {:<12} {:<24} {}",
                bucket_label(entry.bucket),
                truncate(&entry.path, 24),
                truncate(&entry.text, self.max_text_chars)
            )?;
        }
        writeln!(f, "└───────────────────────────────────────────────────────────")?;

        Ok(())
    }
}

fn bucket_label(bucket: NameBucket) -> &'static str {
    match bucket {
        NameBucket::Primary => "primary",
        NameBucket::Headline => "headline",
        NameBucket::CallToAction => "cta",
        NameBucket::Description => "description",
        NameBucket::Body => "body",
    }
}

/// Truncates on a character boundary, marking the cut with an ellipsis.
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}
