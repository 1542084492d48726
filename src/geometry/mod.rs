//! Typed geometry shared by both extraction paths.
//!
//! Vision services report boxes as fractions of the image (`Normalized`),
//! while PSD layers carry absolute pixel bounds (`Pixel`). A region only moves
//! from the first space to the second through an explicit scaling by the
//! image dimensions.
//!
//! # Example
//!
//! ```
//! use adlens::geometry::{Normalized, Pixel, Region};
//!
//! let ocr_line = Region::<Normalized>::from_ltwh(0.1, 0.05, 0.5, 0.08);
//! let on_canvas: Region<Pixel> = ocr_line.to_pixel(1000.0, 1000.0);
//! assert_eq!(on_canvas.height().round(), 80.0);
//! ```

mod region;

pub use region::{Dimensions, Normalized, PercentRect, Pixel, PixelRect, Region};
