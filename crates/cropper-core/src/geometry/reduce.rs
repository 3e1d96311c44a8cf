//! Reduction of any selection to its axis-aligned bounding rectangle.
//!
//! This reduction is lossy on purpose: circles and freehand strokes are
//! cropped as their bounding box, and nothing outside that box is masked.
//! The exact outline is only used for drawing the overlay.

use super::{GeometryError, Rect, Selection};

/// Smallest axis-aligned rectangle enclosing `selection`, in the same space.
///
/// Rectangles are normalized here, so swapped corners are fine.
///
/// # Errors
///
/// Returns [`GeometryError::EmptySelection`] for a freehand stroke with no points.
pub fn bounding_rect<S>(selection: &Selection<S>) -> Result<Rect<S>, GeometryError> {
    match selection {
        Selection::Rectangle { start, end } => Ok(Rect::new(
            start.x.min(end.x),
            start.y.min(end.y),
            (end.x - start.x).abs(),
            (end.y - start.y).abs(),
        )),
        Selection::Circle { center, radius } => {
            let radius = radius.max(0.0);
            Ok(Rect::new(
                center.x - radius,
                center.y - radius,
                2.0 * radius,
                2.0 * radius,
            ))
        }
        Selection::Freehand { points } => {
            let first = points.first().ok_or(GeometryError::EmptySelection)?;
            let (min_x, min_y, max_x, max_y) = points.iter().fold(
                (first.x, first.y, first.x, first.y),
                |(min_x, min_y, max_x, max_y), p| {
                    (min_x.min(p.x), min_y.min(p.y), max_x.max(p.x), max_y.max(p.y))
                },
            );
            Ok(Rect::new(min_x, min_y, max_x - min_x, max_y - min_y))
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
