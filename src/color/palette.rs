//! Frequency-ranked palettes from raw RGB buffers.

use std::collections::HashMap;

use super::hex::Rgb;

/// Levels per channel in the dominant-color histogram (4096 bins).
const DOMINANT_LEVELS: usize = 16;
const DOMINANT_STEP: usize = 256 / DOMINANT_LEVELS;

/// A ranked palette.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Palette {
    /// The dominant sample, as a single hex.
    pub primary: Vec<String>,
    /// Third and fourth most frequent exact colors.
    pub secondary: Vec<String>,
    /// The least frequent exact color.
    pub background: Vec<String>,
}

/// Computes the dominant sample and ranks the buffer in one call.
pub fn analyze_pixels(pixels: &[u8]) -> Palette {
    match dominant_sample(pixels) {
        Some(dominant) => quantize(pixels, dominant),
        None => Palette::default(),
    }
}

/// Ranks exact colors in an interleaved RGB buffer.
///
/// Pixels are read in strides of three bytes; a trailing partial pixel is
/// ignored. Colors are ranked by descending count, ties going to the color
/// seen first. The two most frequent colors are skipped when picking
/// `secondary` since the dominant sample usually coincides with one of them.
///
/// When the buffer holds a single color, `secondary` and `background` would
/// only repeat the dominant color and both come back empty.
pub fn quantize(pixels: &[u8], dominant: Rgb) -> Palette {
    let ranked = rank_colors(pixels);

    let secondary = ranked
        .iter()
        .skip(2)
        .take(2)
        .map(|rgb| rgb.to_hex())
        .collect();

    let background = if ranked.len() > 1 {
        ranked.last().map(|rgb| rgb.to_hex()).into_iter().collect()
    } else {
        Vec::new()
    };

    Palette {
        primary: vec![dominant.to_hex()],
        secondary,
        background,
    }
}

/// Finds the most populated bin of a 16-level-per-channel histogram.
///
/// Returns the bin center, or `None` for a buffer without a full pixel.
/// Ties go to the lower bin index.
pub fn dominant_sample(pixels: &[u8]) -> Option<Rgb> {
    let mut bins = vec![0u32; DOMINANT_LEVELS * DOMINANT_LEVELS * DOMINANT_LEVELS];
    let mut seen = false;

    for px in pixels.chunks_exact(3) {
        let bin = bin_index(px[0], px[1], px[2]);
        bins[bin] += 1;
        seen = true;
    }

    if !seen {
        return None;
    }

    let mut best = 0usize;
    for (idx, count) in bins.iter().enumerate() {
        if *count > bins[best] {
            best = idx;
        }
    }

    let center = |level: usize| (level * DOMINANT_STEP + DOMINANT_STEP / 2) as u8;
    let r = best / (DOMINANT_LEVELS * DOMINANT_LEVELS);
    let g = (best / DOMINANT_LEVELS) % DOMINANT_LEVELS;
    let b = best % DOMINANT_LEVELS;
    Some(Rgb::new(center(r), center(g), center(b)))
}

fn bin_index(r: u8, g: u8, b: u8) -> usize {
    let q = |v: u8| v as usize / DOMINANT_STEP;
    (q(r) * DOMINANT_LEVELS + q(g)) * DOMINANT_LEVELS + q(b)
}

fn rank_colors(pixels: &[u8]) -> Vec<Rgb> {
    // color -> (count, first seen)
    let mut counts: HashMap<Rgb, (u64, usize)> = HashMap::new();
    for (idx, px) in pixels.chunks_exact(3).enumerate() {
        let entry = counts
            .entry(Rgb::new(px[0], px[1], px[2]))
            .or_insert((0, idx));
        entry.0 += 1;
    }

    let mut sorted: Vec<(Rgb, (u64, usize))> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then_with(|| a.1 .1.cmp(&b.1 .1)));
    sorted.into_iter().map(|(rgb, _)| rgb).collect()
}
