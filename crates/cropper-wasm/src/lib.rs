//! Cropper WASM - WebAssembly bindings for the Cropper editor
//!
//! This crate exposes cropper-core to the browser: decoding uploads, fitting
//! them to the canvas, tracking selections from pointer events and running
//! the crop locally.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for images and selections
//! - `events` - Mouse and touch event translation to canvas coordinates
//! - `session` - Selection editor bindings
//! - `crop` - Decode, display fitting and crop execution
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, JsEditorSession } from '@cropper/wasm';
//!
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! const session = JsEditorSession.for_image(image.width, image.height);
//! ```

use wasm_bindgen::prelude::*;

mod crop;
mod events;
mod session;
mod types;

pub use crop::{decode_image, execute_crop, prepare_display_image, suggested_download_name};
pub use session::JsEditorSession;
pub use types::JsDecodedImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    // A logger may already be installed by the host page
    if console_log::init_with_level(log::Level::Info).is_ok() {
        log::info!("Cropper WASM {} ready", version());
    }
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}
