//! Color quantization and contrast.
//!
//! The raster pipeline reduces a decoded RGB buffer to a ranked palette
//! ([`quantize`]) and scores how well the dominant color reads against the
//! background ([`contrast_ratio`]). The hex helpers are shared with the PSD
//! walker, which resolves layer colors from several numeric encodings.

mod contrast;
mod hex;
mod palette;

pub use contrast::{contrast_ratio, relative_luminance};
pub use hex::{hex_to_rgb, rgb_to_hex, rgba_to_hex, unit_to_byte, Rgb};
pub use palette::{analyze_pixels, dominant_sample, quantize, Palette};
