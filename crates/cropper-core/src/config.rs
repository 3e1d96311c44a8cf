//! Service configuration.
//!
//! All fields have defaults, so a partial JSON document (or none at all) is
//! enough to run the crop endpoint.

use serde::{Deserialize, Serialize};

use crate::decode::ImageKind;

/// Default upload cap: 10 MiB.
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Default filename suggested for the cropped result.
pub const DEFAULT_OUTPUT_FILENAME: &str = "cropped-image.png";

/// Largest canvas the editor will draw an image at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayLimits {
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for DisplayLimits {
    fn default() -> Self {
        Self {
            max_width: 800,
            max_height: 600,
        }
    }
}

/// Settings for the crop endpoint and editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Uploads larger than this are rejected before decoding.
    pub max_payload_bytes: usize,
    /// MIME types accepted for upload.
    pub allowed_mime_types: Vec<String>,
    /// Filename suggested in the response's content disposition.
    pub output_filename: String,
    /// Canvas size limits for the editor.
    pub display: DisplayLimits,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            allowed_mime_types: ImageKind::ALL
                .iter()
                .map(|kind| kind.mime_type().to_string())
                .collect(),
            output_filename: DEFAULT_OUTPUT_FILENAME.to_string(),
            display: DisplayLimits::default(),
        }
    }
}

impl ServiceConfig {
    /// Parse a configuration from JSON, filling missing keys with defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// True if `mime_type` is on the upload allow-list (case-insensitive).
    pub fn allows_mime_type(&self, mime_type: &str) -> bool {
        let mime_type = mime_type.trim();
        self.allowed_mime_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(mime_type))
    }
}
