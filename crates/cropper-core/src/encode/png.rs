//! PNG encoding for crop results.
//!
//! Every crop is returned as PNG regardless of the upload's encoding. PNG is
//! lossless, so re-cropping a result at 1:1 reproduces the same pixels, and it
//! keeps any alpha channel the source had.

use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use thiserror::Error;

use crate::decode::CHANNELS;

/// MIME type of the encoded output.
pub const PNG_MIME_TYPE: &str = "image/png";

/// Errors that can occur during PNG encoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// PNG encoding failed
    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Encode RGBA pixel data to PNG bytes.
///
/// # Arguments
///
/// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
///
/// # Returns
///
/// PNG-encoded bytes on success, or an error if encoding fails.
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected_len = (width as usize) * (height as usize) * CHANNELS;
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(pixels, width, height, ExtendedColorType::Rgba8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_encode_png_basic() {
        let pixels = vec![128u8; 100 * 100 * 4];

        let png_bytes = encode_png(&pixels, 100, 100).unwrap();
        assert_eq!(&png_bytes[0..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_encode_png_invalid_pixel_data_short() {
        let pixels = vec![128u8; 99 * 100 * 4]; // One row short

        let result = encode_png(&pixels, 100, 100);
        assert_eq!(
            result,
            Err(EncodeError::InvalidPixelData {
                expected: 40_000,
                actual: 39_600,
            })
        );
    }

    #[test]
    fn test_encode_png_rgb_buffer_rejected() {
        // RGB data is one byte short per pixel
        let pixels = vec![0u8; 10 * 10 * 3];
        assert!(matches!(
            encode_png(&pixels, 10, 10),
            Err(EncodeError::InvalidPixelData { .. })
        ));
    }

    #[test]
    fn test_encode_png_zero_width() {
        let result = encode_png(&[], 0, 100);
        assert!(matches!(result, Err(EncodeError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_encode_png_zero_height() {
        let result = encode_png(&[], 100, 0);
        assert!(matches!(result, Err(EncodeError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_encode_png_single_pixel() {
        let png_bytes = encode_png(&[255, 0, 0, 255], 1, 1).unwrap();
        assert_eq!(&png_bytes[0..8], &PNG_SIGNATURE);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
