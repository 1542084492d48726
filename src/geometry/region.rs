//! Regions of an image or canvas, tagged with the space their edges live
//! in, plus the rounded rectangles that appear in extraction output.

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

/// Edges given as fractions of the analysed image (0-1), the way vision
/// services report them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Normalized;

/// Edges in absolute pixels, with (0, 0) at the top-left of the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pixel;

/// An axis-aligned region given by its four edges.
///
/// Edges are not required to be ordered or inside the frame; vision
/// services occasionally return regions that spill past the image and the
/// composition metrics clamp them.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Region<S> {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    space: PhantomData<S>,
}

impl<S> Region<S> {
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
            space: PhantomData,
        }
    }

    /// The `{Left, Top, Width, Height}` layout vision services use.
    pub fn from_ltwh(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self::from_edges(left, top, left + width, top + height)
    }

    /// Negative when the edges are swapped.
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Negative when the edges are swapped.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
}

impl Region<Pixel> {
    /// From PSD-style `top/left/bottom/right` layer bounds.
    pub fn from_bounds(top: i32, left: i32, bottom: i32, right: i32) -> Self {
        Self::from_edges(
            f64::from(left),
            f64::from(top),
            f64::from(right),
            f64::from(bottom),
        )
    }

    /// Rounds the region into an `{x, y, width, height}` pixel rectangle.
    pub fn to_rect(&self) -> PixelRect {
        PixelRect {
            x: self.left.round() as i64,
            y: self.top.round() as i64,
            width: self.width().round() as i64,
            height: self.height().round() as i64,
        }
    }
}

impl Region<Normalized> {
    /// Scales the region onto an image of the given pixel size.
    pub fn to_pixel(&self, image_width: f64, image_height: f64) -> Region<Pixel> {
        Region::from_edges(
            self.left * image_width,
            self.top * image_height,
            self.right * image_width,
            self.bottom * image_height,
        )
    }

    /// Percent-of-frame rectangle (0-100), each component rounded.
    pub fn to_percent(&self) -> PercentRect {
        PercentRect {
            x: (self.left * 100.0).round() as i64,
            y: (self.top * 100.0).round() as i64,
            width: (self.width() * 100.0).round() as i64,
            height: (self.height() * 100.0).round() as i64,
        }
    }
}

/// A rounded rectangle in pixel units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

/// A rounded rectangle in percent-of-frame units (0-100).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

/// Width and height of an image or document in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Pixel area, widened so large canvases cannot overflow.
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// `width / height` rounded to two decimals; 0 for a zero height.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            return 0.0;
        }
        let ratio = f64::from(self.width) / f64::from(self.height);
        (ratio * 100.0).round() / 100.0
    }
}
