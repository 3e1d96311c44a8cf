//! Pointer event translation.
//!
//! Mouse and touch events both end up as display-space points. Touch input
//! uses the first active touch; on `touchend` there is none left, so the
//! first changed touch is used instead.

use cropper_core::geometry::{client_to_display, ElementRect};
use cropper_core::{Dimensions, DisplayPoint};
use wasm_bindgen::prelude::*;
use web_sys::{Element, MouseEvent, Touch, TouchEvent};

/// Rendered position and size of `canvas` on the page.
pub(crate) fn element_rect(canvas: &Element) -> ElementRect {
    let rect = canvas.get_bounding_client_rect();
    ElementRect {
        left: rect.left(),
        top: rect.top(),
        width: rect.width(),
        height: rect.height(),
    }
}

pub(crate) fn to_display(
    client_x: f64,
    client_y: f64,
    element: &ElementRect,
    display: Dimensions,
) -> Result<DisplayPoint, JsValue> {
    client_to_display(client_x, client_y, element, display)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

pub(crate) fn mouse_point(
    event: &MouseEvent,
    canvas: &Element,
    display: Dimensions,
) -> Result<DisplayPoint, JsValue> {
    to_display(
        event.client_x() as f64,
        event.client_y() as f64,
        &element_rect(canvas),
        display,
    )
}

/// Display point of the touch driving `event`, or `None` if it has no touches.
pub(crate) fn touch_point(
    event: &TouchEvent,
    canvas: &Element,
    display: Dimensions,
) -> Result<Option<DisplayPoint>, JsValue> {
    let touch: Option<Touch> = event
        .touches()
        .get(0)
        .or_else(|| event.changed_touches().get(0));

    touch
        .map(|t| {
            to_display(
                t.client_x() as f64,
                t.client_y() as f64,
                &element_rect(canvas),
                display,
            )
        })
        .transpose()
}
