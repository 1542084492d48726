//! Coverage and balance of detections across the frame.
//!
//! All inputs are in normalized coordinates; nothing here needs the image
//! dimensions.

use super::{LabelDetection, TextDetection};
use crate::geometry::{Normalized, Region};
use crate::model::CompositionMetrics;

/// Cells per side of the balance occupancy grid.
const GRID_SIZE: usize = 10;

/// Balance reported when there is nothing to weigh.
const NEUTRAL_BALANCE: f64 = 0.5;

/// Summed area of every text detection box (lines and words), capped at 1.
pub fn text_coverage(detections: &[TextDetection]) -> f64 {
    capped_area(detections.iter().map(|d| &d.bounding_box))
}

/// Summed area of each label's first instance box, capped at 1.
///
/// Labels without instances contribute nothing.
pub fn visual_coverage(labels: &[LabelDetection]) -> f64 {
    capped_area(labels.iter().filter_map(LabelDetection::primary_box))
}

/// How evenly detections are spread between the left/right and top/bottom
/// halves of the frame, from 0 (all on one side) to 1 (even).
///
/// Every text box and every label instance box marks the 10x10 grid cells it
/// overlaps. Returns 0.5 when there are no detections of either kind.
pub fn balance_score(text: &[TextDetection], labels: &[LabelDetection]) -> f64 {
    if text.is_empty() && labels.is_empty() {
        return NEUTRAL_BALANCE;
    }

    let mut grid = [[0u32; GRID_SIZE]; GRID_SIZE];
    let boxes = text
        .iter()
        .map(|d| &d.bounding_box)
        .chain(labels.iter().flat_map(|l| l.instances.iter().map(|i| &i.bounding_box)));
    for bbox in boxes {
        mark_cells(&mut grid, bbox);
    }

    let half = GRID_SIZE / 2;
    let (mut left, mut right, mut top, mut bottom) = (0u64, 0u64, 0u64, 0u64);
    for (y, row) in grid.iter().enumerate() {
        for (x, &hits) in row.iter().enumerate() {
            let hits = u64::from(hits);
            if x < half {
                left += hits;
            } else {
                right += hits;
            }
            if y < half {
                top += hits;
            } else {
                bottom += hits;
            }
        }
    }

    (axis_balance(left, right) + axis_balance(top, bottom)) / 2.0
}

/// All four composition metrics for one image.
pub fn composition_metrics(text: &[TextDetection], labels: &[LabelDetection]) -> CompositionMetrics {
    let text_coverage = text_coverage(text);
    let visual_coverage = visual_coverage(labels);
    CompositionMetrics {
        text_coverage,
        visual_coverage,
        white_space: 1.0 - (text_coverage + visual_coverage),
        balance_score: balance_score(text, labels),
    }
}

fn capped_area<'a>(boxes: impl Iterator<Item = &'a Region<Normalized>>) -> f64 {
    boxes.map(Region::area).sum::<f64>().min(1.0)
}

fn mark_cells(grid: &mut [[u32; GRID_SIZE]; GRID_SIZE], bbox: &Region<Normalized>) {
    let cells = GRID_SIZE as f64;
    let last = GRID_SIZE as i64 - 1;
    let start_x = (bbox.left * cells).floor() as i64;
    let start_y = (bbox.top * cells).floor() as i64;
    let end_x = ((bbox.right * cells).floor() as i64).min(last);
    let end_y = ((bbox.bottom * cells).floor() as i64).min(last);

    for y in start_y.max(0)..=end_y {
        for x in start_x.max(0)..=end_x {
            grid[y as usize][x as usize] += 1;
        }
    }
}

fn axis_balance(a: u64, b: u64) -> f64 {
    1.0 - a.abs_diff(b) as f64 / (a + b).max(1) as f64
}
