//! Decode and crop bindings.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! const display = prepare_display_image(image, 800, 600);
//! ctx.putImageData(new ImageData(new Uint8ClampedArray(display.pixels()), display.width), 0, 0);
//!
//! const r = session.crop_request();
//! const png = execute_crop(bytes, r.x, r.y, r.width, r.height, r.feather, r.invert);
//! download(new Blob([png], { type: 'image/png' }), suggested_download_name());
//! ```

use cropper_core::decode;
use cropper_core::{CropOptions, CropRequest, DisplayLimits};
use wasm_bindgen::prelude::*;

use crate::types::JsDecodedImage;

/// Decode a JPEG, PNG or WebP file to RGBA, applying EXIF orientation.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Downscale `image` to fit within `max_width` x `max_height` for the editor canvas.
///
/// Images already within the limits are returned unchanged.
#[wasm_bindgen]
pub fn prepare_display_image(
    image: &JsDecodedImage,
    max_width: u32,
    max_height: u32,
) -> Result<JsDecodedImage, JsValue> {
    let limits = DisplayLimits {
        max_width,
        max_height,
    };
    decode::prepare_display_image(&image.to_decoded(), &limits)
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Crop the encoded image in `bytes` to a source-pixel rectangle and return PNG bytes.
///
/// The rectangle is clamped to the image; a rectangle entirely outside it is
/// an error. `feather` and `invert` are accepted but do not alter the result.
#[wasm_bindgen]
pub fn execute_crop(
    bytes: &[u8],
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    feather: u32,
    invert: bool,
) -> Result<Vec<u8>, JsValue> {
    let request = CropRequest::new(x.into(), y.into(), width.into(), height.into())
        .with_options(CropOptions { feather, invert });

    cropper_core::execute_crop(bytes, &request).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Filename for saving a crop: `cropped-<epoch ms>.png`.
#[wasm_bindgen]
pub fn suggested_download_name() -> String {
    download_name(js_sys::Date::now())
}

fn download_name(epoch_ms: f64) -> String {
    format!("cropped-{}.png", epoch_ms as u64)
}
