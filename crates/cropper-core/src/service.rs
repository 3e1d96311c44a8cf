//! Transport-independent crop endpoint.
//!
//! [`handle_crop`] takes an already-parsed multipart upload and returns either
//! the PNG response or a [`ServiceError`] carrying its HTTP status. Uploads are
//! validated before any pixel work: a missing file, a disallowed MIME type, an
//! oversized payload, or content whose actual encoding is not allowed never
//! reaches the decoder.
//!
//! Crop fields arrive as text. Each integer field is read the way a browser
//! form handler would: leading whitespace and an optional sign, then as many
//! digits as are present, so `"12.7"` reads as `12`. Missing fields fall back
//! to `x=0, y=0, width=100, height=100`.

use std::collections::HashMap;

use chrono::{SecondsFormat, Utc};
use log::{info, warn};
use serde::Serialize;
use thiserror::Error;

use crate::config::ServiceConfig;
use crate::crop::{execute_crop, CropError};
use crate::decode::detect_format;
use crate::encode::PNG_MIME_TYPE;
use crate::request::CropRequest;

const DEFAULT_X: i64 = 0;
const DEFAULT_Y: i64 = 0;
const DEFAULT_WIDTH: i64 = 100;
const DEFAULT_HEIGHT: i64 = 100;

/// A file part of the multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// The parsed multipart form: one optional `image` part plus text fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CropUpload {
    pub image: Option<UploadedFile>,
    pub fields: HashMap<String, String>,
}

impl CropUpload {
    pub fn new(image: UploadedFile) -> Self {
        Self {
            image: Some(image),
            fields: HashMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}

/// Errors returned by the crop endpoint.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    #[error("No image file provided")]
    MissingImage,

    #[error("Invalid file type {0}. Only JPEG, PNG, and WebP are allowed.")]
    UnsupportedImageType(String),

    #[error("File too large: {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("Invalid value for field '{field}': {value:?}")]
    InvalidField { field: String, value: String },

    #[error(transparent)]
    Crop(#[from] CropError),
}

impl ServiceError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::MissingImage
            | ServiceError::UnsupportedImageType(_)
            | ServiceError::InvalidField { .. } => 400,
            ServiceError::PayloadTooLarge { .. } => 413,
            ServiceError::Crop(CropError::InvalidCropRegion { .. }) => 422,
            ServiceError::Crop(CropError::Decode(_) | CropError::Encode(_)) => 500,
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.to_string(),
        }
    }
}

/// JSON error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A successful crop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropResponse {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: String,
}

impl CropResponse {
    /// `Content-Disposition` header value.
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

/// Body of the health check response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub message: String,
    pub timestamp: String,
}

impl HealthStatus {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Health check. The timestamp is UTC, RFC 3339 with millisecond precision.
pub fn health() -> HealthStatus {
    HealthStatus {
        message: "Crop service is working!".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

/// Validate an upload, crop it and return the PNG result.
pub fn handle_crop(
    config: &ServiceConfig,
    upload: CropUpload,
) -> Result<CropResponse, ServiceError> {
    let image = upload.image.ok_or(ServiceError::MissingImage)?;

    if !config.allows_mime_type(&image.mime_type) {
        warn!(
            "Rejected upload '{}' with type {}",
            image.file_name, image.mime_type
        );
        return Err(ServiceError::UnsupportedImageType(image.mime_type));
    }
    if image.bytes.len() > config.max_payload_bytes {
        return Err(ServiceError::PayloadTooLarge {
            size: image.bytes.len(),
            limit: config.max_payload_bytes,
        });
    }

    // The declared type comes from the client; check the bytes as well
    let detected = detect_format(&image.bytes);
    if !detected.is_some_and(|kind| config.allows_mime_type(kind.mime_type())) {
        warn!(
            "Rejected upload '{}': content is not an allowed encoding (declared {})",
            image.file_name, image.mime_type
        );
        return Err(ServiceError::UnsupportedImageType(image.mime_type));
    }

    let request = parse_request(&upload.fields)?;
    info!(
        "Cropping '{}' ({} bytes) to {}x{} at ({}, {})",
        image.file_name,
        image.bytes.len(),
        request.width,
        request.height,
        request.x,
        request.y
    );

    let bytes = execute_crop(&image.bytes, &request)?;

    Ok(CropResponse {
        bytes,
        content_type: PNG_MIME_TYPE,
        filename: config.output_filename.clone(),
    })
}

/// Read the crop request out of the form fields.
pub fn parse_request(fields: &HashMap<String, String>) -> Result<CropRequest, ServiceError> {
    let mut request = CropRequest::new(
        int_field(fields, "x", DEFAULT_X)?,
        int_field(fields, "y", DEFAULT_Y)?,
        int_field(fields, "width", DEFAULT_WIDTH)?,
        int_field(fields, "height", DEFAULT_HEIGHT)?,
    );

    request.feather = match present(fields, "feather") {
        Some(value) => parse_leading_int(value)
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| invalid("feather", value))?,
        None => 0,
    };
    request.invert = match present(fields, "invert").map(str::trim) {
        None => false,
        Some(v) if v.eq_ignore_ascii_case("true") => true,
        Some(v) if v.eq_ignore_ascii_case("false") => false,
        Some(v) => return Err(invalid("invert", v)),
    };

    Ok(request)
}

/// Non-blank value of a form field.
fn present<'a>(fields: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    fields
        .get(name)
        .map(String::as_str)
        .filter(|value| !value.trim().is_empty())
}

fn int_field(
    fields: &HashMap<String, String>,
    name: &str,
    default: i64,
) -> Result<i64, ServiceError> {
    match present(fields, name) {
        Some(value) => parse_leading_int(value).ok_or_else(|| invalid(name, value)),
        None => {
            warn!("Field '{name}' missing, using {default}");
            Ok(default)
        }
    }
}

/// Parse the integer prefix of `text`, ignoring anything after the digits.
fn parse_leading_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digits].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

fn invalid(field: &str, value: &str) -> ServiceError {
    ServiceError::InvalidField {
        field: field.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{decode_image, DecodeError};
    use crate::encode::encode_png;

    fn png_upload(width: u32, height: u32) -> UploadedFile {
        let pixels: Vec<u8> = (0..width * height)
            .flat_map(|i| [(i % 256) as u8, 0, 0, 255])
            .collect();
        UploadedFile {
            file_name: "photo.png".to_string(),
            mime_type: "image/png".to_string(),
            bytes: encode_png(&pixels, width, height).unwrap(),
        }
    }

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_handle_crop_success() {
        let upload = CropUpload::new(png_upload(200, 150))
            .with_field("x", "10")
            .with_field("y", "20")
            .with_field("width", "50")
            .with_field("height", "40");

        let response = handle_crop(&ServiceConfig::default(), upload).unwrap();
        assert_eq!(response.content_type, "image/png");
        assert_eq!(
            response.content_disposition(),
            "attachment; filename=\"cropped-image.png\""
        );

        let decoded = decode_image(&response.bytes).unwrap();
        assert_eq!((decoded.width, decoded.height), (50, 40));
    }

    #[test]
    fn test_handle_crop_defaults() {
        let response =
            handle_crop(&ServiceConfig::default(), CropUpload::new(png_upload(300, 300))).unwrap();
        let decoded = decode_image(&response.bytes).unwrap();
        assert_eq!((decoded.width, decoded.height), (100, 100));
    }

    #[test]
    fn test_missing_image() {
        let err = handle_crop(&ServiceConfig::default(), CropUpload::default()).unwrap_err();
        assert_eq!(err, ServiceError::MissingImage);
        assert_eq!(err.status_code(), 400);
        assert_eq!(
            err.to_body().to_json().unwrap(),
            r#"{"error":"No image file provided"}"#
        );
    }

    #[test]
    fn test_disallowed_type_rejected_before_decoding() {
        let upload = CropUpload::new(UploadedFile {
            file_name: "anim.gif".to_string(),
            mime_type: "image/gif".to_string(),
            bytes: b"GIF89a".to_vec(),
        });

        let err = handle_crop(&ServiceConfig::default(), upload).unwrap_err();
        assert_eq!(err, ServiceError::UnsupportedImageType("image/gif".to_string()));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_payload_too_large() {
        let config = ServiceConfig {
            max_payload_bytes: 16,
            ..ServiceConfig::default()
        };
        let err = handle_crop(&config, CropUpload::new(png_upload(10, 10))).unwrap_err();

        assert!(matches!(err, ServiceError::PayloadTooLarge { limit: 16, .. }));
        assert_eq!(err.status_code(), 413);
    }

    #[test]
    fn test_region_outside_image() {
        let upload = CropUpload::new(png_upload(50, 50))
            .with_field("x", "50")
            .with_field("y", "0");

        let err = handle_crop(&ServiceConfig::default(), upload).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Crop(CropError::InvalidCropRegion { .. })
        ));
        assert_eq!(err.status_code(), 422);
    }

    #[test]
    fn test_gif_content_declared_as_png_rejected() {
        // 1x1 transparent GIF
        let gif: &[u8] = &[
            0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00,
            0x00, 0x00, 0xFF, 0xFF, 0xFF, 0x21, 0xF9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2C,
            0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x44, 0x01, 0x00,
            0x3B,
        ];
        let upload = CropUpload::new(UploadedFile {
            file_name: "renamed.png".to_string(),
            mime_type: "image/png".to_string(),
            bytes: gif.to_vec(),
        });

        let err = handle_crop(&ServiceConfig::default(), upload).unwrap_err();
        assert_eq!(err, ServiceError::UnsupportedImageType("image/png".to_string()));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_unrecognized_content_rejected() {
        let upload = CropUpload::new(UploadedFile {
            file_name: "notes.png".to_string(),
            mime_type: "image/png".to_string(),
            bytes: b"this is plain text, not pixels".to_vec(),
        });

        let err = handle_crop(&ServiceConfig::default(), upload).unwrap_err();
        assert!(matches!(err, ServiceError::UnsupportedImageType(_)));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_content_outside_configured_allow_list_rejected() {
        let config = ServiceConfig {
            allowed_mime_types: vec!["image/png".to_string(), "image/jpeg".to_string()],
            ..ServiceConfig::default()
        };
        let upload = CropUpload::new(UploadedFile {
            file_name: "photo.png".to_string(),
            mime_type: "image/png".to_string(),
            bytes: b"RIFF\x24\x00\x00\x00WEBPVP8 ".to_vec(),
        });

        let err = handle_crop(&config, upload).unwrap_err();
        assert!(matches!(err, ServiceError::UnsupportedImageType(_)));
    }

    #[test]
    fn test_truncated_png_is_server_error() {
        let mut file = png_upload(20, 20);
        file.bytes.truncate(40);

        let err = handle_crop(&ServiceConfig::default(), CropUpload::new(file)).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Crop(CropError::Decode(DecodeError::CorruptedFile(_)))
        ));
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_parse_request_reads_integer_prefix() {
        let request = parse_request(&fields(&[
            ("x", "12.7"),
            ("y", " -3"),
            ("width", "+40px"),
            ("height", "8"),
        ]))
        .unwrap();

        assert_eq!(request, CropRequest::new(12, -3, 40, 8));
    }

    #[test]
    fn test_parse_request_options() {
        let request = parse_request(&fields(&[("feather", "5"), ("invert", "true")])).unwrap();
        assert_eq!(request.feather, 5);
        assert!(request.invert);

        let request = parse_request(&fields(&[("invert", "false")])).unwrap();
        assert!(!request.invert);
    }

    #[test]
    fn test_parse_request_invalid_values() {
        let err = parse_request(&fields(&[("width", "wide")])).unwrap_err();
        assert_eq!(
            err,
            ServiceError::InvalidField {
                field: "width".to_string(),
                value: "wide".to_string(),
            }
        );
        assert_eq!(err.status_code(), 400);

        assert!(parse_request(&fields(&[("invert", "maybe")])).is_err());
        assert!(parse_request(&fields(&[("feather", "-1")])).is_err());
    }

    #[test]
    fn test_parse_request_empty_field_uses_default() {
        let request = parse_request(&fields(&[("width", "  ")])).unwrap();
        assert_eq!(request.width, 100);
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("42"), Some(42));
        assert_eq!(parse_leading_int("42abc"), Some(42));
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int("99999999999999999999"), None);
    }

    #[test]
    fn test_health() {
        let status = health();
        assert_eq!(status.message, "Crop service is working!");
        assert!(status.timestamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&status.timestamp).is_ok());

        let json: serde_json::Value = serde_json::from_str(&status.to_json().unwrap()).unwrap();
        assert_eq!(json["message"], "Crop service is working!");
        assert_eq!(json["timestamp"], status.timestamp.as_str());
    }
}
