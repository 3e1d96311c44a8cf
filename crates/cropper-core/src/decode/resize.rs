//! Resizing of decoded images for the display canvas.
//!
//! The editor draws a downscaled copy of the source; the crop itself always
//! runs against the full-resolution pixels.

use image::imageops::FilterType;

use super::{DecodeError, DecodedImage};
use crate::config::DisplayLimits;
use crate::geometry::fit_display;

/// Resize an image to exact dimensions with bilinear filtering.
///
/// # Arguments
///
/// * `image` - The source image to resize
/// * `width` - Target width in pixels
/// * `height` - Target height in pixels
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` if either target extent is zero.
/// Returns `DecodeError::CorruptedFile` if the pixel buffer does not match the image size.
pub fn resize(image: &DecodedImage, width: u32, height: u32) -> Result<DecodedImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgba_image = image.to_rgba_image().ok_or_else(|| {
        DecodeError::CorruptedFile("Pixel buffer does not match image size".to_string())
    })?;

    let resized = image::imageops::resize(&rgba_image, width, height, FilterType::Triangle);

    Ok(DecodedImage::from_rgba_image(resized))
}

/// Produce the copy of `image` drawn on the editor canvas.
///
/// The result has exactly the dimensions [`fit_display`] computes for the
/// source, so display-space selections line up with the canvas.
pub fn prepare_display_image(
    image: &DecodedImage,
    limits: &DisplayLimits,
) -> Result<DecodedImage, DecodeError> {
    let display = fit_display(image.dimensions(), limits).map_err(|_| {
        DecodeError::InvalidDimensions {
            width: image.width,
            height: image.height,
        }
    })?;

    resize(image, display.width, display.height)
}
