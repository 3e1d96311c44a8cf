//! Image decoding for uploaded files.
//!
//! This module provides functionality for:
//! - Detecting and decoding JPEG, PNG and WebP uploads
//! - Applying EXIF orientation so pixels match what the browser shows
//! - Resizing the decoded image for the display canvas
//!
//! All pixel data is normalized to RGBA8.

mod reader;
mod resize;
mod types;

pub use reader::{decode_image, detect_format};
pub use resize::{prepare_display_image, resize};
pub use types::{DecodeError, DecodedImage, ImageKind, Orientation, CHANNELS};
