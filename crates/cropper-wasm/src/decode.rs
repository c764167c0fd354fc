//! Image decoding WASM bindings.
//!
//! # Functions
//!
//! - [`decode_image`] - Decode a JPEG, PNG or WebP payload (EXIF orientation applied)
//! - [`preview_for_display`] - Downscale a decoded image to its on-screen size
//! - [`resize_to_fit`] - Resize an image to fit within a max edge
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, preview_for_display } from '@cropper/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! const preview = preview_for_display(image, 400, 300);
//! ```

use crate::types::{filter_from_u8, JsDecodedImage};
use cropper_core::decode;
use cropper_core::transform;
use cropper_core::DisplayGeometry;
use wasm_bindgen::prelude::*;

/// Decode an uploaded image payload.
///
/// # Errors
///
/// Returns an error if the bytes are not a supported image format or are
/// corrupted.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Downscale an image to the size it is displayed at. Never upscales.
#[wasm_bindgen]
pub fn preview_for_display(
    image: &JsDecodedImage,
    display_width: f64,
    display_height: f64,
) -> Result<JsDecodedImage, JsValue> {
    let display = DisplayGeometry::new(display_width, display_height);
    transform::preview_for_display(&image.to_decoded(), &display)
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Resize an image so its longest edge is at most `max_edge`.
///
/// `filter`: 0 = Nearest, 1 = Bilinear, 2 = Lanczos3.
#[wasm_bindgen]
pub fn resize_to_fit(
    image: &JsDecodedImage,
    max_edge: u32,
    filter: u8,
) -> Result<JsDecodedImage, JsValue> {
    transform::resize_to_fit(&image.to_decoded(), max_edge, filter_from_u8(filter))
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
