//! WCAG-style contrast between two colors.

use super::hex::{hex_to_rgb, Rgb};
use crate::error::AdlensError;

/// Relative luminance of an sRGB color (0 for black, 1 for white).
pub fn relative_luminance(rgb: Rgb) -> f64 {
    let linear = |channel: u8| {
        let v = f64::from(channel) / 255.0;
        if v <= 0.03928 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * linear(rgb.r) + 0.7152 * linear(rgb.g) + 0.0722 * linear(rgb.b)
}

/// Contrast ratio between two hex colors, rounded to one decimal.
///
/// The ratio is symmetric and ranges from 1.0 (identical luminance) to 21.0
/// (black on white).
///
/// # Errors
/// Returns [`AdlensError::InvalidColorFormat`] if either color is not a
/// 6-digit hex string.
pub fn contrast_ratio(background: &str, foreground: &str) -> Result<f64, AdlensError> {
    let l1 = relative_luminance(hex_to_rgb(background)?);
    let l2 = relative_luminance(hex_to_rgb(foreground)?);
    let ratio = (l1.max(l2) + 0.05) / (l1.min(l2) + 0.05);
    Ok((ratio * 10.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_black_on_white_is_21() {
        assert_eq!(contrast_ratio("#ffffff", "#000000").unwrap(), 21.0);
        assert_eq!(contrast_ratio("#000000", "#ffffff").unwrap(), 21.0);
    }

    #[test]
    fn test_same_color_is_1() {
        assert_eq!(contrast_ratio("#3366cc", "#3366CC").unwrap(), 1.0);
    }

    #[test]
    fn test_known_pair() {
        // mid grey on white
        assert_eq!(contrast_ratio("#ffffff", "#777777").unwrap(), 4.5);
    }

    #[test]
    fn test_invalid_hex_fails() {
        assert!(matches!(
            contrast_ratio("#ffffff", "blue"),
            Err(AdlensError::InvalidColorFormat(c)) if c == "blue"
        ));
    }
}
