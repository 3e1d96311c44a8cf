//! Crop execution against full-resolution image bytes.
//!
//! A [`CropRequest`] is intersected with the image bounds before any pixels
//! are copied. Requests that are fully outside the image, or that have a
//! non-positive size, fail with [`CropError::InvalidCropRegion`] instead of
//! producing an empty or wrapped result.
//!
//! Execution is stateless: each call owns its decoded pixels and request, so
//! crops of different images can run concurrently without locking.
//!
//! # Feather and invert
//!
//! Both options are accepted and carried on the request but do not change
//! the output. The extracted rectangle is returned as-is.

use log::{debug, info};
use thiserror::Error;

use crate::decode::{decode_image, DecodeError, DecodedImage, CHANNELS};
use crate::encode::{encode_png, EncodeError};
use crate::request::CropRequest;

/// Errors that can occur while executing a crop.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CropError {
    /// The requested rectangle does not overlap the image.
    #[error(
        "Invalid crop region: {width}x{height} at ({x}, {y}) does not overlap \
         the {image_width}x{image_height} image"
    )]
    InvalidCropRegion {
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        image_width: u32,
        image_height: u32,
    },

    /// The source bytes could not be decoded.
    #[error("Decode failure: {0}")]
    Decode(#[from] DecodeError),

    /// The cropped pixels could not be encoded.
    #[error("Encode failure: {0}")]
    Encode(#[from] EncodeError),
}

/// A rectangle of pixels guaranteed to lie inside an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Intersect `request` with `[0, image_width) x [0, image_height)`.
///
/// # Errors
///
/// Returns [`CropError::InvalidCropRegion`] if the request has a non-positive
/// size or the intersection is empty.
pub fn clamp_region(
    request: &CropRequest,
    image_width: u32,
    image_height: u32,
) -> Result<PixelRegion, CropError> {
    let invalid = || CropError::InvalidCropRegion {
        x: request.x,
        y: request.y,
        width: request.width,
        height: request.height,
        image_width,
        image_height,
    };

    if request.width <= 0 || request.height <= 0 {
        return Err(invalid());
    }

    let left = request.x.max(0);
    let top = request.y.max(0);
    let right = request.x.saturating_add(request.width).min(image_width as i64);
    let bottom = request.y.saturating_add(request.height).min(image_height as i64);

    if right <= left || bottom <= top {
        return Err(invalid());
    }

    // All four values now lie in [0, image extent], so they fit in u32.
    Ok(PixelRegion {
        x: left as u32,
        y: top as u32,
        width: (right - left) as u32,
        height: (bottom - top) as u32,
    })
}

/// Copy the pixels of `region` out of `image`.
///
/// `region` must lie inside the image, as produced by [`clamp_region`].
pub fn extract_region(image: &DecodedImage, region: PixelRegion) -> DecodedImage {
    let src_stride = image.stride();
    let row_len = region.width as usize * CHANNELS;
    let mut output = Vec::with_capacity(row_len * region.height as usize);

    // Copy pixel data row by row for efficiency
    for y in region.y..region.y + region.height {
        let start = y as usize * src_stride + region.x as usize * CHANNELS;
        output.extend_from_slice(&image.pixels[start..start + row_len]);
    }

    DecodedImage::new(region.width, region.height, output)
}

/// Crop an already decoded image.
///
/// The input image is not modified.
pub fn crop_image(image: &DecodedImage, request: &CropRequest) -> Result<DecodedImage, CropError> {
    let region = clamp_region(request, image.width, image.height)?;

    if region.width as i64 != request.width || region.height as i64 != request.height {
        debug!(
            "Clamped crop {}x{} at ({}, {}) to {}x{} at ({}, {})",
            request.width,
            request.height,
            request.x,
            request.y,
            region.width,
            region.height,
            region.x,
            region.y
        );
    }

    if request.feather > 0 || request.invert {
        debug!(
            "Ignoring feather={} invert={}: options have no effect on extraction",
            request.feather, request.invert
        );
    }

    Ok(extract_region(image, region))
}

/// Decode `bytes`, crop them to `request`, and encode the result as PNG.
///
/// # Errors
///
/// - [`CropError::Decode`] if the bytes are not a supported, intact image
/// - [`CropError::InvalidCropRegion`] if the request does not overlap the image
/// - [`CropError::Encode`] if the result cannot be encoded
pub fn execute_crop(bytes: &[u8], request: &CropRequest) -> Result<Vec<u8>, CropError> {
    let image = decode_image(bytes)?;
    let cropped = crop_image(&image, request)?;
    let png = encode_png(&cropped.pixels, cropped.width, cropped.height)?;

    info!(
        "Cropped {}x{} image to {}x{} ({} bytes)",
        image.width,
        image.height,
        cropped.width,
        cropped.height,
        png.len()
    );
    Ok(png)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
