//! End-to-end: pointer input on a downscaled canvas through to PNG output.

use cropper_core::decode::{decode_image, prepare_display_image, DecodedImage};
use cropper_core::encode::encode_png;
use cropper_core::geometry::{client_to_display, ElementRect};
use cropper_core::{
    execute_crop, handle_crop, CropUpload, Dimensions, DisplayLimits, DisplayPoint,
    EditorSession, ServiceConfig, Tool, UploadedFile,
};

fn gradient(width: u32, height: u32) -> DecodedImage {
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            pixels.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, 0, 255]);
        }
    }
    DecodedImage::new(width, height, pixels)
}

fn pixel(image: &DecodedImage, x: u32, y: u32) -> &[u8] {
    let i = ((y * image.width + x) * 4) as usize;
    &image.pixels[i..i + 4]
}

#[test]
fn rectangle_selection_crops_source_pixels() {
    let source = gradient(1600, 1200);
    let bytes = encode_png(&source.pixels, source.width, source.height).unwrap();

    let decoded = decode_image(&bytes).unwrap();
    let limits = DisplayLimits::default();
    let display = prepare_display_image(&decoded, &limits).unwrap();
    assert_eq!((display.width, display.height), (800, 600));

    let mut session = EditorSession::for_image(decoded.dimensions(), &limits).unwrap();
    session.pointer_down(DisplayPoint::new(100.0, 50.0));
    session.pointer_move(DisplayPoint::new(150.0, 80.0));
    session.pointer_up(DisplayPoint::new(200.0, 150.0));

    let request = session.crop_request().unwrap();
    assert_eq!((request.x, request.y, request.width, request.height), (200, 100, 200, 200));

    let cropped = decode_image(&execute_crop(&bytes, &request).unwrap()).unwrap();
    assert_eq!((cropped.width, cropped.height), (200, 200));
    assert_eq!(pixel(&cropped, 0, 0), pixel(&source, 200, 100));
    assert_eq!(pixel(&cropped, 199, 199), pixel(&source, 399, 299));
}

#[test]
fn css_scaled_canvas_and_freehand_stroke() {
    let source = gradient(400, 300);
    let bytes = encode_png(&source.pixels, source.width, source.height).unwrap();

    // Canvas is 400x300 pixels but laid out at half size
    let mut session =
        EditorSession::new(Dimensions::new(400, 300), Dimensions::new(400, 300)).unwrap();
    let element = ElementRect {
        left: 20.0,
        top: 10.0,
        width: 200.0,
        height: 150.0,
    };
    let display = session.display();
    let to_canvas = |cx: f64, cy: f64| client_to_display(cx, cy, &element, display).unwrap();

    let start = to_canvas(30.0, 20.0);
    let mid = to_canvas(60.0, 70.0);
    let end = to_canvas(45.0, 35.0);

    session.set_tool(Tool::Freehand);
    session.pointer_down(start);
    session.pointer_move(mid);
    session.pointer_leave(end);

    let request = session.crop_request().unwrap();
    assert_eq!((request.x, request.y, request.width, request.height), (20, 20, 60, 100));

    let cropped = decode_image(&execute_crop(&bytes, &request).unwrap()).unwrap();
    assert_eq!((cropped.width, cropped.height), (60, 100));
}

#[test]
fn service_round_trip_through_form_fields() {
    let source = gradient(120, 80);
    let bytes = encode_png(&source.pixels, source.width, source.height).unwrap();

    let upload = CropUpload::new(UploadedFile {
        file_name: "gradient.png".to_string(),
        mime_type: "image/png".to_string(),
        bytes,
    })
    .with_field("x", "100")
    .with_field("y", "60")
    .with_field("width", "50")
    .with_field("height", "50")
    .with_field("feather", "3")
    .with_field("invert", "false");

    let response = handle_crop(&ServiceConfig::default(), upload).unwrap();
    let cropped = decode_image(&response.bytes).unwrap();

    // Clamped at the right and bottom edges
    assert_eq!((cropped.width, cropped.height), (20, 20));
    assert_eq!(pixel(&cropped, 0, 0), pixel(&source, 100, 60));
}
