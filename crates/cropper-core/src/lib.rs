//! Cropper Core - Image cropping library
//!
//! This crate provides the core functionality for the cropper editor and its
//! crop endpoint: selection geometry in display and source coordinates,
//! crop request building, decoding of uploaded images, and PNG crop output.
//!
//! # Pipeline
//!
//! 1. An uploaded image is decoded ([`decode::decode_image`]) and a display
//!    copy is fitted to the editor canvas ([`decode::prepare_display_image`]).
//! 2. Pointer input drives an [`EditorSession`], which records selections in
//!    display space.
//! 3. The first selection is reduced to its bounding rectangle and mapped to
//!    a source-space [`CropRequest`].
//! 4. [`crop::execute_crop`] clamps the request to the image and returns PNG
//!    bytes. [`service::handle_crop`] wraps this for an HTTP transport.

pub mod config;
pub mod crop;
pub mod decode;
pub mod encode;
pub mod geometry;
pub mod request;
pub mod service;
pub mod session;

pub use config::{DisplayLimits, ServiceConfig};
pub use crop::{execute_crop, CropError};
pub use geometry::{
    bounding_rect, CoordinateTransform, Dimensions, DisplayPoint, DisplayRect, GeometryError,
    Selection, SelectionList, SelectionModel, SourcePoint, SourceRect, Tool,
};
pub use request::{CropOptions, CropRequest, CropRequestBuilder};
pub use service::{handle_crop, CropResponse, CropUpload, ServiceError, UploadedFile};
pub use session::EditorSession;
