//! Image encoding for crop results.
//!
//! Output is always PNG, independent of the uploaded encoding.

mod png;

pub use png::{encode_png, EncodeError, PNG_MIME_TYPE};
