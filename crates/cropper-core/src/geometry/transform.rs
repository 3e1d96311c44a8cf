//! Scaling between display-canvas space and source-image space.
//!
//! The scale factors are independent per axis, so a canvas whose aspect ratio
//! differs slightly from the source (integer truncation when fitting) still
//! maps corners exactly onto the source grid.

use super::{
    Dimensions, DisplayPoint, DisplayRect, GeometryError, Point, Rect, SourcePoint, SourceRect,
};
use crate::config::DisplayLimits;

/// Pure mapping between display and source coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    display: Dimensions,
    source: Dimensions,
    scale_x: f64,
    scale_y: f64,
}

impl CoordinateTransform {
    /// Build a transform for the given display and source extents.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidDimensions`] if either space has a zero extent.
    pub fn new(display: Dimensions, source: Dimensions) -> Result<Self, GeometryError> {
        let display = display.validate()?;
        let source = source.validate()?;

        Ok(Self {
            display,
            source,
            scale_x: source.width as f64 / display.width as f64,
            scale_y: source.height as f64 / display.height as f64,
        })
    }

    pub fn display(&self) -> Dimensions {
        self.display
    }

    pub fn source(&self) -> Dimensions {
        self.source
    }

    /// Source pixels per display pixel, as `(scale_x, scale_y)`.
    pub fn scale(&self) -> (f64, f64) {
        (self.scale_x, self.scale_y)
    }

    pub fn point_to_source(&self, point: DisplayPoint) -> SourcePoint {
        Point::new(point.x * self.scale_x, point.y * self.scale_y)
    }

    pub fn point_to_display(&self, point: SourcePoint) -> DisplayPoint {
        Point::new(point.x / self.scale_x, point.y / self.scale_y)
    }

    /// Map a display rectangle into source space.
    ///
    /// Origin and size are scaled separately, so the mapped size does not
    /// depend on where the rectangle sits.
    pub fn rect_to_source(&self, rect: &DisplayRect) -> SourceRect {
        Rect::new(
            rect.x * self.scale_x,
            rect.y * self.scale_y,
            rect.width * self.scale_x,
            rect.height * self.scale_y,
        )
    }

    pub fn rect_to_display(&self, rect: &SourceRect) -> DisplayRect {
        Rect::new(
            rect.x / self.scale_x,
            rect.y / self.scale_y,
            rect.width / self.scale_x,
            rect.height / self.scale_y,
        )
    }
}

/// Compute the display canvas size for a source image.
///
/// The source is shrunk to fit inside `limits`, width first and then height,
/// preserving aspect ratio. Images that already fit are shown at 1:1. Canvas
/// extents are whole pixels, so fractional sizes are truncated (minimum 1).
///
/// # Errors
///
/// Returns [`GeometryError::InvalidDimensions`] if the source or the limits
/// have a zero extent.
pub fn fit_display(
    source: Dimensions,
    limits: &DisplayLimits,
) -> Result<Dimensions, GeometryError> {
    let source = source.validate()?;
    Dimensions::new(limits.max_width, limits.max_height).validate()?;

    let mut width = source.width as f64;
    let mut height = source.height as f64;
    let max_width = limits.max_width as f64;
    let max_height = limits.max_height as f64;

    if width > max_width {
        height = height * max_width / width;
        width = max_width;
    }

    if height > max_height {
        width = width * max_height / height;
        height = max_height;
    }

    Ok(Dimensions::new((width as u32).max(1), (height as u32).max(1)))
}

/// Position and rendered size of the canvas element on the page.
///
/// The element may be CSS-scaled, so its rendered size is not necessarily the
/// canvas's pixel size.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ElementRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Translate pointer coordinates relative to the page into a display-space point.
///
/// Mouse and touch input both pass through here, so the selection model
/// only ever sees canvas pixels.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidDimensions`] if the element has not been
/// laid out (zero or negative rendered size) or the display has a zero extent.
pub fn client_to_display(
    client_x: f64,
    client_y: f64,
    element: &ElementRect,
    display: Dimensions,
) -> Result<DisplayPoint, GeometryError> {
    let display = display.validate()?;
    if element.width <= 0.0 || element.height <= 0.0 {
        return Err(GeometryError::InvalidDimensions {
            width: element.width,
            height: element.height,
        });
    }

    let scale_x = display.width as f64 / element.width;
    let scale_y = display.height as f64 / element.height;

    Ok(Point::new(
        (client_x - element.left) * scale_x,
        (client_y - element.top) * scale_y,
    ))
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn dimensions_strategy() -> impl Strategy<Value = Dimensions> {
        (1u32..=8000, 1u32..=8000).prop_map(|(w, h)| Dimensions::new(w, h))
    }

    proptest! {
        /// Property: mapping a display point to source and back returns the same point.
        #[test]
        fn prop_point_round_trip(
            display in dimensions_strategy(),
            source in dimensions_strategy(),
            fx in 0.0f64..=1.0,
            fy in 0.0f64..=1.0,
        ) {
            let t = CoordinateTransform::new(display, source).unwrap();
            let p = DisplayPoint::new(fx * display.width as f64, fy * display.height as f64);
            let back = t.point_to_display(t.point_to_source(p));

            prop_assert!((back.x - p.x).abs() < 1e-6);
            prop_assert!((back.y - p.y).abs() < 1e-6);
        }

        /// Property: the display corners map exactly onto the source corners.
        #[test]
        fn prop_corners_map_to_corners(
            display in dimensions_strategy(),
            source in dimensions_strategy(),
        ) {
            let t = CoordinateTransform::new(display, source).unwrap();
            let corner = t.point_to_source(DisplayPoint::new(
                display.width as f64,
                display.height as f64,
            ));

            prop_assert!((corner.x - source.width as f64).abs() < 1e-6);
            prop_assert!((corner.y - source.height as f64).abs() < 1e-6);
        }

        /// Property: fitted display dimensions never exceed the limits or the source.
        #[test]
        fn prop_fit_display_bounded(source in dimensions_strategy()) {
            let limits = DisplayLimits::default();
            let fitted = fit_display(source, &limits).unwrap();

            prop_assert!(fitted.width >= 1 && fitted.height >= 1);
            prop_assert!(fitted.width <= limits.max_width);
            prop_assert!(fitted.height <= limits.max_height);
            prop_assert!(fitted.width <= source.width);
            prop_assert!(fitted.height <= source.height);
        }
    }
}
