//! Crop requests in source-image pixel coordinates.
//!
//! The builder maps a normalized display rectangle into source space and
//! rounds each of the four fields independently to the nearest pixel. It does
//! not clamp to the image bounds; that happens in [`crate::crop`].

use serde::{Deserialize, Serialize};

use crate::geometry::{
    bounding_rect, CoordinateTransform, Dimensions, DisplayRect, GeometryError, SelectionList,
};

/// User-chosen processing options sent along with a crop.
///
/// Both are carried through to the executor but currently have no effect on
/// the extracted pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CropOptions {
    /// Edge feather radius in pixels.
    pub feather: u32,
    /// Crop everything outside the selection instead of inside it.
    pub invert: bool,
}

/// A rectangle of source pixels to extract, plus processing options.
///
/// Coordinates are signed: a selection dragged past the canvas edge produces
/// negative origins, which the executor clamps away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRequest {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
    #[serde(default)]
    pub feather: u32,
    #[serde(default)]
    pub invert: bool,
}

impl CropRequest {
    /// Request with default options.
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            feather: 0,
            invert: false,
        }
    }

    pub fn with_options(mut self, options: CropOptions) -> Self {
        self.feather = options.feather;
        self.invert = options.invert;
        self
    }

    pub fn options(&self) -> CropOptions {
        CropOptions {
            feather: self.feather,
            invert: self.invert,
        }
    }
}

/// Turns display-space selections into [`CropRequest`]s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRequestBuilder {
    transform: CoordinateTransform,
    options: CropOptions,
}

impl CropRequestBuilder {
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidDimensions`] if either space has a zero extent.
    pub fn new(display: Dimensions, source: Dimensions) -> Result<Self, GeometryError> {
        Ok(Self::from_transform(CoordinateTransform::new(display, source)?))
    }

    pub fn from_transform(transform: CoordinateTransform) -> Self {
        Self {
            transform,
            options: CropOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CropOptions) -> Self {
        self.options = options;
        self
    }

    pub fn transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    pub fn options(&self) -> CropOptions {
        self.options
    }

    /// Map a normalized display rectangle to a rounded source-space request.
    pub fn build(&self, rect: &DisplayRect) -> CropRequest {
        let source = self.transform.rect_to_source(rect);

        CropRequest::new(
            source.x.round() as i64,
            source.y.round() as i64,
            source.width.round() as i64,
            source.height.round() as i64,
        )
        .with_options(self.options)
    }

    /// Build a request from the first selection in `selections`.
    ///
    /// Later selections are ignored; only a single region is cropped.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::EmptySelectionList`] if nothing has been drawn,
    /// or [`GeometryError::EmptySelection`] if the first selection has no points.
    pub fn build_from_selections(
        &self,
        selections: &SelectionList,
    ) -> Result<CropRequest, GeometryError> {
        let first = selections.first().ok_or(GeometryError::EmptySelectionList)?;
        let rect = bounding_rect(first)?;
        Ok(self.build(&rect))
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
