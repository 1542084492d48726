//! Image header probing and pixel decoding.

use std::path::Path;

use imagesize::ImageType;

use crate::error::AdlensError;
use crate::geometry::Dimensions;

/// What the header says about an encoded image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    pub dimensions: Dimensions,
    /// Lower-case format name (`png`, `jpeg`, ...).
    pub format: String,
}

/// Reads dimensions and format from the image header without decoding.
///
/// # Errors
/// Returns [`AdlensError::ImageProbe`] if the bytes are not a recognized
/// image or the dimensions do not fit in `u32`.
pub fn probe(path: &Path, bytes: &[u8]) -> Result<ImageInfo, AdlensError> {
    let probe_error = |message: String| AdlensError::ImageProbe {
        path: path.to_path_buf(),
        message,
    };

    let image_type = imagesize::image_type(bytes).map_err(|e| probe_error(e.to_string()))?;
    let size = imagesize::blob_size(bytes).map_err(|e| probe_error(e.to_string()))?;

    let width: u32 = size
        .width
        .try_into()
        .map_err(|_| probe_error(format!("image width {} does not fit in u32", size.width)))?;
    let height: u32 = size
        .height
        .try_into()
        .map_err(|_| probe_error(format!("image height {} does not fit in u32", size.height)))?;

    Ok(ImageInfo {
        dimensions: Dimensions::new(width, height),
        format: format_name(&image_type),
    })
}

/// Decodes the image into an interleaved RGB8 buffer.
///
/// # Errors
/// Returns [`AdlensError::ImageProbe`] if the image cannot be decoded.
pub fn decode_rgb(path: &Path, bytes: &[u8]) -> Result<Vec<u8>, AdlensError> {
    let image = image::load_from_memory(bytes).map_err(|e| AdlensError::ImageProbe {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(image.to_rgb8().into_raw())
}

fn format_name(image_type: &ImageType) -> String {
    match image_type {
        ImageType::Jpeg => "jpeg".to_string(),
        ImageType::Png => "png".to_string(),
        ImageType::Gif => "gif".to_string(),
        ImageType::Webp => "webp".to_string(),
        ImageType::Bmp => "bmp".to_string(),
        ImageType::Tiff => "tiff".to_string(),
        ImageType::Psd => "psd".to_string(),
        other => format!("{other:?}").to_lowercase(),
    }
}
