//! Layer-name conventions for text in layered documents.
//!
//! Designers mark copy layers by name: `Headline Copy`, `CTA Button`,
//! `<FR> Texte principal`. Keyword matching is case-insensitive; the `<FR>`
//! marker is matched literally.

/// Marks the primary localized text run.
pub const PRIMARY_MARKER: &str = "<FR>";

pub const HEADLINE_KEYWORD: &str = "headline";
pub const CTA_KEYWORD: &str = "cta";
pub const DESCRIPTION_KEYWORD: &str = "description";

/// Text bucket implied by a layer name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NameBucket {
    Primary,
    Headline,
    CallToAction,
    Description,
    Body,
}

impl NameBucket {
    /// Returns true if the name alone marks the layer as copy.
    pub fn is_marked(&self) -> bool {
        *self != NameBucket::Body
    }
}

/// Buckets a layer by name.
///
/// When several conventions apply, the marker wins, then headline, CTA and
/// description in that order.
pub fn classify_layer_name(name: &str) -> NameBucket {
    if name.contains(PRIMARY_MARKER) {
        return NameBucket::Primary;
    }

    let lower = name.to_lowercase();
    if lower.contains(HEADLINE_KEYWORD) {
        NameBucket::Headline
    } else if lower.contains(CTA_KEYWORD) {
        NameBucket::CallToAction
    } else if lower.contains(DESCRIPTION_KEYWORD) {
        NameBucket::Description
    } else {
        NameBucket::Body
    }
}

/// Removes every `<FR>` marker and trims the result.
pub fn strip_primary_marker(text: &str) -> String {
    text.replace(PRIMARY_MARKER, "").trim().to_string()
}
