//! Core types for image decoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Dimensions;

/// Error types for image decoding operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// The bytes are not in one of the accepted encodings.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// A target size has a zero extent.
    #[error("Invalid target dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),
}

/// Encodings accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Jpeg,
    Png,
    WebP,
}

impl ImageKind {
    pub const ALL: [ImageKind; 3] = [ImageKind::Jpeg, ImageKind::Png, ImageKind::WebP];

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
            ImageKind::WebP => "image/webp",
        }
    }

    /// Look up a kind by MIME type. `image/jpg` is accepted as an alias.
    pub fn from_mime_type(mime_type: &str) -> Option<Self> {
        match mime_type.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(ImageKind::Jpeg),
            "image/png" => Some(ImageKind::Png),
            "image/webp" => Some(ImageKind::WebP),
            _ => None,
        }
    }

    /// Convert from the image crate's format, if it is one we accept.
    pub fn from_image_format(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::Jpeg => Some(ImageKind::Jpeg),
            image::ImageFormat::Png => Some(ImageKind::Png),
            image::ImageFormat::WebP => Some(ImageKind::WebP),
            _ => None,
        }
    }

    /// Convert to the image crate's format.
    pub fn to_image_format(self) -> image::ImageFormat {
        match self {
            ImageKind::Jpeg => image::ImageFormat::Jpeg,
            ImageKind::Png => image::ImageFormat::Png,
            ImageKind::WebP => image::ImageFormat::WebP,
        }
    }
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (flip horizontal + rotate 270 CW).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Transverse (flip horizontal + rotate 90 CW).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// Number of bytes per pixel in [`DecodedImage::pixels`].
pub const CHANNELS: usize = 4;

/// A decoded image with RGBA pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    /// Length should be width * height * 4.
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Create a new DecodedImage with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * CHANNELS,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a DecodedImage from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.into_raw();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert to an image::RgbaImage for further processing.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// Bytes per row of pixels.
    pub fn stride(&self) -> usize {
        self.width as usize * CHANNELS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_kind_mime_types() {
        for kind in ImageKind::ALL {
            assert_eq!(ImageKind::from_mime_type(kind.mime_type()), Some(kind));
        }
        assert_eq!(ImageKind::from_mime_type("image/jpg"), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_mime_type("IMAGE/PNG"), Some(ImageKind::Png));
        assert_eq!(ImageKind::from_mime_type("image/gif"), None);
        assert_eq!(ImageKind::from_mime_type("text/plain"), None);
    }

    #[test]
    fn test_image_kind_format_conversion() {
        for kind in ImageKind::ALL {
            assert_eq!(ImageKind::from_image_format(kind.to_image_format()), Some(kind));
        }
        assert_eq!(ImageKind::from_image_format(image::ImageFormat::Gif), None);
    }

    #[test]
    fn test_orientation_from_u32() {
        assert_eq!(Orientation::from(1), Orientation::Normal);
        assert_eq!(Orientation::from(6), Orientation::Rotate90CW);
        assert_eq!(Orientation::from(99), Orientation::Normal);
    }

    #[test]
    fn test_decoded_image_creation() {
        let img = DecodedImage::new(100, 50, vec![0u8; 100 * 50 * 4]);

        assert_eq!(img.dimensions(), Dimensions::new(100, 50));
        assert_eq!(img.stride(), 400);
    }

    #[test]
    fn test_rgba_image_round_trip() {
        let pixels: Vec<u8> = (0..2 * 3 * 4).map(|i| i as u8).collect();
        let img = DecodedImage::new(2, 3, pixels.clone());
        let back = DecodedImage::from_rgba_image(img.to_rgba_image().unwrap());
        assert_eq!(back.pixels, pixels);
    }

    #[test]
    fn test_decode_error_display() {
        assert_eq!(
            DecodeError::InvalidFormat.to_string(),
            "Invalid or unsupported image format"
        );
        assert_eq!(
            DecodeError::CorruptedFile("truncated".to_string()).to_string(),
            "Corrupted or incomplete image file: truncated"
        );
    }
}
