//! Bucketing of label and OCR detections.

use super::rules::{self, TextCategory, VisualCategory};
use super::{LabelDetection, TextDetection, TextKind};
use crate::geometry::Dimensions;
use crate::model::{TextContent, TextElement, VisualElement, VisualElements};

/// Sorts label detections into people, products, branding and background.
///
/// Every label is kept; the detector has already applied its own
/// confidence floor.
pub fn categorize_labels(labels: &[LabelDetection]) -> VisualElements {
    let mut elements = VisualElements::default();

    for label in labels {
        let primary = label.primary_box();
        let element = VisualElement {
            name: label.name.clone(),
            confidence: label.confidence,
            position: primary.map(|b| b.to_percent()),
            size: primary.map(|b| b.area()).unwrap_or(0.0),
        };

        match rules::classify_label(&label.name) {
            VisualCategory::People => elements.people.push(element),
            VisualCategory::Products => elements.products.push(element),
            VisualCategory::Branding => elements.branding.push(element),
            VisualCategory::Background => elements.background_elements.push(element),
        }
    }

    elements
}

/// Sorts confident OCR lines into headline, disclaimer, CTA and body text.
///
/// Word-level detections and lines at or below the confidence floor are
/// dropped. Positions are converted to pixels using `dimensions`.
pub fn categorize_text(detections: &[TextDetection], dimensions: Dimensions) -> TextContent {
    let mut content = TextContent::default();
    let width = f64::from(dimensions.width);
    let height = f64::from(dimensions.height);

    let lines = detections
        .iter()
        .filter(|d| d.kind == TextKind::Line && d.confidence > rules::TEXT_MIN_CONFIDENCE);

    for line in lines {
        let pixel_box = line.bounding_box.to_pixel(width, height);
        let position = pixel_box.to_rect();
        let font_size = rules::estimate_font_size(pixel_box.height());
        let y_position = if height > 0.0 {
            position.y as f64 / height
        } else {
            0.0
        };

        let mut element = TextElement::new(line.text.clone(), position);
        element.style.size = font_size;
        element.confidence = Some(line.confidence);

        match rules::classify_line(font_size, y_position, &line.text) {
            TextCategory::Headline => content.headline.push(element),
            TextCategory::Disclaimer => content.disclaimers.push(element),
            TextCategory::Cta => content.cta.push(element),
            TextCategory::Body => content.body_text.push(element),
        }
    }

    content
}
