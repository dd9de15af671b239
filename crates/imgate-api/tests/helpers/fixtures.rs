//! Upload fixtures

#![allow(dead_code)]

use axum_test::multipart::{MultipartForm, Part};

/// Minimal 1x1 PNG
pub fn create_minimal_png() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // PNG signature
        0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR chunk
        0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, // 1x1 dimensions
        0x08, 0x02, 0x00, 0x00, 0x00, 0x90, 0x77, 0x53, 0xDE, //
        0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, // IDAT chunk
        0x08, 0xD7, 0x63, 0xF8, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, //
        0x00, 0x18, 0xDD, 0x8D, 0x89, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, //
        0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82, // IEND chunk
    ]
}

/// Bytes that start like a JPEG; the fake tools never decode them
pub fn create_fake_jpeg() -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0];
    data.extend_from_slice(b"not really a jpeg");
    data.extend_from_slice(&[0xFF, 0xD9]);
    data
}

pub fn image_part(data: Vec<u8>, file_name: &str, mime_type: &str) -> Part {
    Part::bytes(bytes::Bytes::from(data))
        .file_name(file_name.to_string())
        .mime_type(mime_type.to_string())
}

/// Multipart form with the usual `image` field
pub fn image_form(data: Vec<u8>, file_name: &str, mime_type: &str) -> MultipartForm {
    MultipartForm::new().add_part("image", image_part(data, file_name, mime_type))
}

pub fn png_form() -> MultipartForm {
    image_form(create_minimal_png(), "image.png", "image/png")
}
