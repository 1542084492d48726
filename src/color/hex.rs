//! Hex color encoding.

use std::fmt;

use crate::error::AdlensError;

/// An sRGB color with 8-bit channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lower-case `#rrggbb`.
    pub fn to_hex(&self) -> String {
        rgb_to_hex(self.r, self.g, self.b)
    }

    /// Builds a color from float channels, rounding and clamping to 0-255.
    pub fn from_f64(r: f64, g: f64, b: f64) -> Self {
        Self::new(clamp_channel(r), clamp_channel(g), clamp_channel(b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Formats channels as a lower-case `#rrggbb` string.
pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Parses `#rrggbb` (the `#` is optional, digits are case-insensitive).
///
/// # Errors
/// Returns [`AdlensError::InvalidColorFormat`] unless the input is exactly
/// six hex digits after the optional `#`.
pub fn hex_to_rgb(hex: &str) -> Result<Rgb, AdlensError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(AdlensError::InvalidColorFormat(hex.to_string()));
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .map_err(|_| AdlensError::InvalidColorFormat(hex.to_string()))
    };

    Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Converts `[r, g, b]` or `[r, g, b, a]` channel values to hex.
///
/// Channels are rounded and clamped to 0-255. The alpha byte is appended
/// only when the color is translucent. Returns `None` for fewer than three
/// components.
pub fn rgba_to_hex(components: &[f64]) -> Option<String> {
    let [r, g, b, rest @ ..] = components else {
        return None;
    };
    let alpha = rest.first().copied().map(clamp_channel).unwrap_or(255);
    let rgb = Rgb::from_f64(*r, *g, *b);

    if alpha < 255 {
        Some(format!("{rgb}{alpha:02x}"))
    } else {
        Some(rgb.to_hex())
    }
}

/// Scales a 0-1 float component to a byte.
pub fn unit_to_byte(value: f64) -> u8 {
    clamp_channel(value * 255.0)
}

fn clamp_channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}
