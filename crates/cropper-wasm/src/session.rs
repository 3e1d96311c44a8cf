//! Editor session bindings.
//!
//! A `JsEditorSession` is created per loaded image. Pointer handlers take
//! either raw display coordinates or the DOM event plus the canvas element.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const session = JsEditorSession.for_image(image.width, image.height);
//! canvas.width = session.display_width;
//! canvas.height = session.display_height;
//!
//! canvas.addEventListener('mousedown', (e) => session.mouse_down(e, canvas));
//! canvas.addEventListener('mousemove', (e) => drawOverlay(session.mouse_move(e, canvas)));
//! canvas.addEventListener('mouseup', (e) => session.mouse_up(e, canvas));
//! canvas.addEventListener('mouseleave', (e) => session.mouse_up(e, canvas));
//!
//! const request = session.crop_request();
//! ```

use std::str::FromStr;

use cropper_core::{
    CropOptions, Dimensions, DisplayLimits, DisplayPoint, EditorSession, GeometryError, Tool,
};
use wasm_bindgen::prelude::*;
use web_sys::{Element, MouseEvent, TouchEvent};

use crate::events::{mouse_point, touch_point};
use crate::types::JsSelection;

fn js_error(e: GeometryError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Selection editor for one image.
#[wasm_bindgen]
pub struct JsEditorSession {
    inner: EditorSession,
}

#[wasm_bindgen]
impl JsEditorSession {
    /// Create a session for a canvas of `display_*` pixels showing an image of `source_*` pixels.
    #[wasm_bindgen(constructor)]
    pub fn new(
        display_width: u32,
        display_height: u32,
        source_width: u32,
        source_height: u32,
    ) -> Result<JsEditorSession, JsValue> {
        EditorSession::new(
            Dimensions::new(display_width, display_height),
            Dimensions::new(source_width, source_height),
        )
        .map(|inner| JsEditorSession { inner })
        .map_err(js_error)
    }

    /// Create a session with the canvas fitted to the default 800x600 limits.
    pub fn for_image(source_width: u32, source_height: u32) -> Result<JsEditorSession, JsValue> {
        EditorSession::for_image(
            Dimensions::new(source_width, source_height),
            &DisplayLimits::default(),
        )
        .map(|inner| JsEditorSession { inner })
        .map_err(js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn display_width(&self) -> u32 {
        self.inner.display().width
    }

    #[wasm_bindgen(getter)]
    pub fn display_height(&self) -> u32 {
        self.inner.display().height
    }

    /// Active tool: `"rectangle"`, `"circle"` or `"freehand"`.
    #[wasm_bindgen(getter)]
    pub fn tool(&self) -> String {
        self.inner.tool().as_str().to_string()
    }

    pub fn set_tool(&mut self, tool: &str) -> Result<(), JsValue> {
        let tool = Tool::from_str(tool).map_err(js_error)?;
        self.inner.set_tool(tool);
        Ok(())
    }

    pub fn set_options(&mut self, feather: u32, invert: bool) {
        self.inner.set_options(CropOptions { feather, invert });
    }

    #[wasm_bindgen(getter)]
    pub fn is_drawing(&self) -> bool {
        self.inner.is_drawing()
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.inner.pointer_down(DisplayPoint::new(x, y));
    }

    /// Preview shape for the overlay, or `undefined` while idle.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        let preview = self.inner.pointer_move(DisplayPoint::new(x, y));
        to_js(&preview.as_ref().map(JsSelection::from))
    }

    /// Returns true if a selection was committed.
    pub fn pointer_up(&mut self, x: f64, y: f64) -> bool {
        self.inner.pointer_up(DisplayPoint::new(x, y)).is_some()
    }

    pub fn pointer_leave(&mut self, x: f64, y: f64) -> bool {
        self.inner.pointer_leave(DisplayPoint::new(x, y)).is_some()
    }

    pub fn mouse_down(&mut self, event: &MouseEvent, canvas: &Element) -> Result<(), JsValue> {
        let point = mouse_point(event, canvas, self.inner.display())?;
        self.inner.pointer_down(point);
        Ok(())
    }

    pub fn mouse_move(&mut self, event: &MouseEvent, canvas: &Element) -> Result<JsValue, JsValue> {
        let point = mouse_point(event, canvas, self.inner.display())?;
        self.pointer_move(point.x, point.y)
    }

    pub fn mouse_up(&mut self, event: &MouseEvent, canvas: &Element) -> Result<bool, JsValue> {
        let point = mouse_point(event, canvas, self.inner.display())?;
        Ok(self.pointer_up(point.x, point.y))
    }

    pub fn touch_start(&mut self, event: &TouchEvent, canvas: &Element) -> Result<(), JsValue> {
        if let Some(point) = touch_point(event, canvas, self.inner.display())? {
            self.inner.pointer_down(point);
        }
        Ok(())
    }

    pub fn touch_move(&mut self, event: &TouchEvent, canvas: &Element) -> Result<JsValue, JsValue> {
        match touch_point(event, canvas, self.inner.display())? {
            Some(point) => self.pointer_move(point.x, point.y),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    pub fn touch_end(&mut self, event: &TouchEvent, canvas: &Element) -> Result<bool, JsValue> {
        Ok(touch_point(event, canvas, self.inner.display())?
            .is_some_and(|point| self.pointer_up(point.x, point.y)))
    }

    /// Remove the newest selection. Returns false if there was none.
    pub fn undo_last(&mut self) -> Result<bool, JsValue> {
        self.inner
            .undo_last()
            .map(|removed| removed.is_some())
            .map_err(js_error)
    }

    pub fn clear(&mut self) -> Result<(), JsValue> {
        self.inner.clear().map_err(js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn selection_count(&self) -> usize {
        self.inner.selections().len()
    }

    /// All committed selections as an array of JS objects.
    pub fn selections(&self) -> Result<JsValue, JsValue> {
        let selections: Vec<JsSelection> =
            self.inner.selections().iter().map(JsSelection::from).collect();
        to_js(&selections)
    }

    pub fn status_line(&self) -> String {
        self.inner.status_line()
    }

    /// `{ x, y, width, height, feather, invert }` in source pixels for the first selection.
    pub fn crop_request(&self) -> Result<JsValue, JsValue> {
        let request = self.inner.crop_request().map_err(js_error)?;
        to_js(&request)
    }
}
