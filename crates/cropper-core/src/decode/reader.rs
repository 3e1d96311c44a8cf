//! Decoding of uploaded JPEG, PNG and WebP images with EXIF orientation handling.
//!
//! Browsers apply EXIF orientation when drawing an image, so the decoder does
//! the same. That keeps source space identical to what the user selected on.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};
use log::debug;

use super::{DecodeError, DecodedImage, ImageKind, Orientation};

/// Sniff the encoding of `bytes` from its magic number.
///
/// Returns `None` for anything outside the accepted encodings.
pub fn detect_format(bytes: &[u8]) -> Option<ImageKind> {
    image::guess_format(bytes)
        .ok()
        .and_then(ImageKind::from_image_format)
}

/// Decode an image from bytes, applying EXIF orientation correction.
///
/// # Arguments
///
/// * `bytes` - Raw JPEG, PNG or WebP file bytes
///
/// # Returns
///
/// A `DecodedImage` with RGBA pixel data and correct orientation applied.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the bytes are not one of the accepted encodings.
/// Returns `DecodeError::CorruptedFile` if the image data is corrupted.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let kind = detect_format(bytes).ok_or(DecodeError::InvalidFormat)?;
    let orientation = extract_orientation(bytes);
    debug!(
        "Decoding {} bytes as {} (orientation {:?})",
        bytes.len(),
        kind.mime_type(),
        orientation
    );

    let img = ImageReader::with_format(Cursor::new(bytes), kind.to_image_format())
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let oriented_img = apply_orientation(img, orientation);
    Ok(DecodedImage::from_rgba_image(oriented_img.into_rgba8()))
}

/// Extract EXIF orientation from image bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

/// Apply EXIF orientation transformation to an image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
