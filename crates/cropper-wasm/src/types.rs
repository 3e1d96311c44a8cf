//! WASM-compatible wrapper types.
//!
//! Images cross the boundary as a [`JsDecodedImage`] handle. Selections and
//! crop requests cross as plain JS objects built with `serde-wasm-bindgen`.

use cropper_core::decode::DecodedImage;
use cropper_core::geometry::{Point, Selection};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// A decoded image wrapper for JavaScript.
///
/// Pixels are RGBA, 4 bytes per pixel, so they can be handed straight to
/// `new ImageData(...)`.
#[wasm_bindgen]
pub struct JsDecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsDecodedImage {
    /// Create a new JsDecodedImage from dimensions and RGBA pixel data.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsDecodedImage {
        JsDecodedImage {
            width,
            height,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array.
    ///
    /// This copies the pixel data out of WASM memory.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {}
}

impl JsDecodedImage {
    pub(crate) fn from_decoded(img: DecodedImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels,
        }
    }

    /// Note: This clones the pixel data.
    pub(crate) fn to_decoded(&self) -> DecodedImage {
        DecodedImage {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }
}

/// `{ x, y }` as seen by JavaScript.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub(crate) struct JsPoint {
    pub x: f64,
    pub y: f64,
}

impl<S> From<&Point<S>> for JsPoint {
    fn from(p: &Point<S>) -> Self {
        Self { x: p.x, y: p.y }
    }
}

/// A selection as a tagged JS object, e.g. `{ tool: "circle", center, radius }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "tool", rename_all = "lowercase")]
pub(crate) enum JsSelection {
    Rectangle { start: JsPoint, end: JsPoint },
    Circle { center: JsPoint, radius: f64 },
    Freehand { points: Vec<JsPoint> },
}

impl From<&Selection> for JsSelection {
    fn from(selection: &Selection) -> Self {
        match selection {
            Selection::Rectangle { start, end } => JsSelection::Rectangle {
                start: start.into(),
                end: end.into(),
            },
            Selection::Circle { center, radius } => JsSelection::Circle {
                center: center.into(),
                radius: *radius,
            },
            Selection::Freehand { points } => JsSelection::Freehand {
                points: points.iter().map(JsPoint::from).collect(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cropper_core::DisplayPoint;

    #[test]
    fn test_js_decoded_image_creation() {
        let img = JsDecodedImage::new(100, 50, vec![0u8; 100 * 50 * 4]);
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.byte_length(), 20_000);
    }

    #[test]
    fn test_decoded_round_trip() {
        let decoded = DecodedImage::new(2, 1, vec![255, 0, 0, 255, 0, 255, 0, 128]);
        let js_img = JsDecodedImage::from_decoded(decoded.clone());
        assert_eq!(js_img.pixels(), decoded.pixels);
        assert_eq!(js_img.to_decoded(), decoded);
    }

    #[test]
    fn test_selection_conversion() {
        let circle = Selection::Circle {
            center: DisplayPoint::new(5.0, 6.0),
            radius: 2.5,
        };
        assert_eq!(
            JsSelection::from(&circle),
            JsSelection::Circle {
                center: JsPoint { x: 5.0, y: 6.0 },
                radius: 2.5,
            }
        );

        let stroke = Selection::Freehand {
            points: vec![DisplayPoint::new(1.0, 2.0), DisplayPoint::new(3.0, 4.0)],
        };
        match JsSelection::from(&stroke) {
            JsSelection::Freehand { points } => assert_eq!(points.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
    }
}
