//! Rule table for bucketing vision detections.
//!
//! Every keyword set and threshold the categorizer uses lives here so the
//! rules can be audited and tested on their own.

use std::sync::OnceLock;

use regex::Regex;

/// Label name fragments that mark people.
pub const PEOPLE_KEYWORDS: &[&str] = &["Person", "Human"];

/// Label name fragments that mark products.
pub const PRODUCT_KEYWORDS: &[&str] = &["Product", "Item", "Goods", "Package", "Container"];

/// Label name fragments that mark branding.
pub const BRANDING_KEYWORDS: &[&str] = &["Logo", "Brand", "Symbol", "Trademark"];

/// Words that make a short line a call to action.
pub const CTA_PATTERN: &str = r"(?i)\b(buy|shop|get|order|call|click|visit|learn|discover|find|see|watch|sign up|join|start)\b";

/// CTA lines must be shorter than this many characters.
pub const CTA_MAX_CHARS: usize = 35;

/// OCR lines at or below this confidence are ignored.
pub const TEXT_MIN_CONFIDENCE: f64 = 90.0;

/// Points per pixel of line height.
pub const FONT_SIZE_PER_PIXEL: f64 = 0.75;

pub const HEADLINE_MIN_FONT_SIZE: f64 = 24.0;
pub const HEADLINE_MAX_Y: f64 = 0.3;
pub const DISCLAIMER_MAX_FONT_SIZE: f64 = 12.0;
pub const DISCLAIMER_MIN_Y: f64 = 0.8;

/// Semantic bucket for a label detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisualCategory {
    People,
    Products,
    Branding,
    Background,
}

/// Semantic bucket for an OCR line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextCategory {
    Headline,
    Disclaimer,
    Cta,
    Body,
}

/// Buckets a label by case-sensitive substring match on its name.
///
/// People win over products, products over branding.
pub fn classify_label(name: &str) -> VisualCategory {
    let contains_any = |keywords: &[&str]| keywords.iter().any(|k| name.contains(k));

    if contains_any(PEOPLE_KEYWORDS) {
        VisualCategory::People
    } else if contains_any(PRODUCT_KEYWORDS) {
        VisualCategory::Products
    } else if contains_any(BRANDING_KEYWORDS) {
        VisualCategory::Branding
    } else {
        VisualCategory::Background
    }
}

/// Buckets an OCR line; the first matching rule wins.
///
/// `y_position` is the top of the line as a fraction of image height.
pub fn classify_line(font_size: f64, y_position: f64, text: &str) -> TextCategory {
    if font_size > HEADLINE_MIN_FONT_SIZE && y_position < HEADLINE_MAX_Y {
        TextCategory::Headline
    } else if font_size < DISCLAIMER_MAX_FONT_SIZE && y_position > DISCLAIMER_MIN_Y {
        TextCategory::Disclaimer
    } else if is_call_to_action(text) {
        TextCategory::Cta
    } else {
        TextCategory::Body
    }
}

/// Returns true for short lines containing a call-to-action verb.
pub fn is_call_to_action(text: &str) -> bool {
    text.chars().count() < CTA_MAX_CHARS && cta_regex().is_match(text)
}

/// Estimated font size in points for a line of the given pixel height.
pub fn estimate_font_size(height_px: f64) -> f64 {
    (height_px * FONT_SIZE_PER_PIXEL).round()
}

fn cta_regex() -> &'static Regex {
    static CTA: OnceLock<Regex> = OnceLock::new();
    CTA.get_or_init(|| Regex::new(CTA_PATTERN).expect("CTA_PATTERN is a valid regex"))
}
