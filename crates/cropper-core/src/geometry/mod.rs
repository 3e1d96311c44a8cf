//! Selection geometry: points, rectangles and the spaces they live in.
//!
//! The editor deals with two pixel grids that are never assumed equal:
//!
//! - **Display space**: the on-screen canvas, usually a downscaled copy of
//!   the image sized to fit the editor.
//! - **Source space**: the native pixel grid of the uploaded image.
//!
//! Points and rectangles carry their space as a type parameter, so a display
//! rectangle cannot be handed to code expecting source coordinates. The only
//! way to move between the two is [`CoordinateTransform`].
//!
//! # Module Structure
//!
//! - `transform` - Display/source scaling and canvas fitting
//! - `selection` - Selection variants, the finalized list, and the drawing state machine
//! - `reduce` - Bounding rectangle reduction of any selection

mod reduce;
mod selection;
mod transform;

use std::fmt;
use std::marker::PhantomData;

use thiserror::Error;

pub use reduce::bounding_rect;
pub use selection::{Selection, SelectionList, SelectionModel, Tool};
pub use transform::{client_to_display, fit_display, CoordinateTransform, ElementRect};

/// Errors raised by geometry operations.
///
/// These are all detected before any image bytes are touched, so the caller
/// can let the user redraw and try again.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// A coordinate space has a zero or negative extent.
    #[error("Invalid dimensions: {width}x{height} (both extents must be positive)")]
    InvalidDimensions { width: f64, height: f64 },

    /// A selection has no points to reduce.
    #[error("Selection is empty")]
    EmptySelection,

    /// A crop was requested before anything was drawn.
    #[error("No selection has been made")]
    EmptySelectionList,

    /// The operation is only valid while no selection is being drawn.
    #[error("A selection is still being drawn")]
    DrawingInProgress,

    /// The tool name is not one of `rectangle`, `circle` or `freehand`.
    #[error("Unknown selection tool: {0}")]
    UnknownTool(String),
}

/// Marker for the display-canvas coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplaySpace {}

/// Marker for the source-image coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceSpace {}

/// A real-valued point in coordinate space `S`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point<S> {
    pub x: f64,
    pub y: f64,
    space: PhantomData<S>,
}

pub type DisplayPoint = Point<DisplaySpace>;
pub type SourcePoint = Point<SourceSpace>;

impl<S> Point<S> {
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            space: PhantomData,
        }
    }

    /// Euclidean distance to another point in the same space.
    pub fn distance(&self, other: &Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

impl<S> fmt::Display for Point<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// An axis-aligned rectangle in coordinate space `S`.
///
/// Always normalized: `width` and `height` are non-negative and `(x, y)` is
/// the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect<S> {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    space: PhantomData<S>,
}

pub type DisplayRect = Rect<DisplaySpace>;
pub type SourceRect = Rect<SourceSpace>;

impl<S> Rect<S> {
    /// Create a rectangle from its top-left corner and size.
    ///
    /// Negative sizes are folded back so the result is normalized.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: if width < 0.0 { x + width } else { x },
            y: if height < 0.0 { y + height } else { y },
            width: width.abs(),
            height: height.abs(),
            space: PhantomData,
        }
    }

    /// True if the rectangle covers no area.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Pixel extents of a coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Fail with [`GeometryError::InvalidDimensions`] unless both extents are positive.
    pub fn validate(self) -> Result<Self, GeometryError> {
        if self.width == 0 || self.height == 0 {
            return Err(GeometryError::InvalidDimensions {
                width: self.width as f64,
                height: self.height as f64,
            });
        }
        Ok(self)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
