//! Image encoding WASM bindings.
//!
//! # Functions
//!
//! - [`encode_jpeg`] - Encode RGB pixel data to JPEG bytes
//! - [`encode_jpeg_from_image`] - Encode a JsDecodedImage to JPEG bytes
//!
//! # Example
//!
//! ```typescript
//! import { encode_jpeg_from_image } from '@cropper/wasm';
//!
//! const jpegBytes = encode_jpeg_from_image(image, 92);
//! ```

use crate::types::JsDecodedImage;
use cropper_core::encode;
use wasm_bindgen::prelude::*;

/// Encode RGB pixel data to JPEG bytes.
///
/// `quality` is clamped to 1-100; 92 matches the browser canvas default.
///
/// # Errors
///
/// Returns an error if:
/// - The pixel data length doesn't match width * height * 3
/// - Width or height is zero
/// - Encoding fails internally
#[wasm_bindgen]
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, JsValue> {
    encode::encode_jpeg(pixels, width, height, quality)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Encode a JsDecodedImage to JPEG bytes.
#[wasm_bindgen]
pub fn encode_jpeg_from_image(image: &JsDecodedImage, quality: u8) -> Result<Vec<u8>, JsValue> {
    encode::encode_image(&image.to_decoded(), quality)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_encode_jpeg_invalid_pixels() {
        let result = encode_jpeg(&[0u8; 10], 10, 10, 92);
        assert!(result.is_err());
        let message = result.unwrap_err().as_string().unwrap();
        assert!(message.contains("Invalid pixel data"));
    }
}
