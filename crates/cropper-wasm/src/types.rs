//! WASM-compatible wrapper types.
//!
//! This module provides JavaScript-friendly types that wrap the core cropper
//! types, handling the conversion between Rust and JavaScript representations.

use cropper_core::decode::{DecodedImage, FilterType};
use cropper_core::{CropRegion, OutputArtifact, UploaderConfig};
use wasm_bindgen::prelude::*;

/// A decoded image wrapper for JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is made
/// to JavaScript memory as a `Uint8Array`.
#[wasm_bindgen]
pub struct JsDecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsDecodedImage {
    /// Create a new JsDecodedImage from dimensions and RGB pixel data
    /// (3 bytes per pixel, row-major order).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsDecodedImage {
        JsDecodedImage {
            width,
            height,
            pixels,
        }
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of bytes in the pixel buffer
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGB pixel data as Uint8Array (copied).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {}
}

impl JsDecodedImage {
    pub(crate) fn from_decoded(img: DecodedImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels,
        }
    }

    /// Convert back to a core DecodedImage. Clones the pixel data.
    pub(crate) fn to_decoded(&self) -> DecodedImage {
        DecodedImage {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }
}

/// Native-pixel crop rectangle.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsCropRegion {
    inner: CropRegion,
}

#[wasm_bindgen]
impl JsCropRegion {
    #[wasm_bindgen(constructor)]
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> JsCropRegion {
        Self {
            inner: CropRegion::new(x, y, width, height),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn x(&self) -> u32 {
        self.inner.x
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> u32 {
        self.inner.y
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Serialize to a plain `{ x, y, width, height }` object
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl From<CropRegion> for JsCropRegion {
    fn from(inner: CropRegion) -> Self {
        Self { inner }
    }
}

impl JsCropRegion {
    pub(crate) fn inner(&self) -> &CropRegion {
        &self.inner
    }
}

/// An encoded crop result.
#[wasm_bindgen]
pub struct JsOutputArtifact {
    inner: OutputArtifact,
}

#[wasm_bindgen]
impl JsOutputArtifact {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Always `image/jpeg`
    #[wasm_bindgen(getter, js_name = mimeType)]
    pub fn mime_type(&self) -> String {
        self.inner.mime_type().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.len()
    }

    /// Encoded bytes as Uint8Array (copied).
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes().to_vec()
    }

    /// Wrap the encoded bytes in a `Blob` carrying the artifact's MIME type.
    pub fn to_blob(&self) -> Result<web_sys::Blob, JsValue> {
        artifact_blob(&self.inner)
    }
}

impl From<OutputArtifact> for JsOutputArtifact {
    fn from(inner: OutputArtifact) -> Self {
        Self { inner }
    }
}

/// Build a `Blob` of type `image/jpeg` from an artifact.
pub(crate) fn artifact_blob(artifact: &OutputArtifact) -> Result<web_sys::Blob, JsValue> {
    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(artifact.bytes()));

    let options = web_sys::BlobPropertyBag::new();
    options.set_type(artifact.mime_type());

    web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
}

/// Read an `UploaderConfig` from a JS object; `undefined` and `null` give the defaults.
pub(crate) fn config_from_js(value: JsValue) -> Result<UploaderConfig, JsValue> {
    let config: UploaderConfig = if value.is_undefined() || value.is_null() {
        UploaderConfig::default()
    } else {
        serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))?
    };
    config
        .validate()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(config)
}

/// Convert a u8 filter type value to the core FilterType enum.
///
/// Values:
/// - 0 = Nearest (fastest, lowest quality)
/// - 1 = Bilinear (good balance of speed and quality)
/// - 2 = Lanczos3 (best quality, slowest)
///
/// Any other value defaults to Bilinear.
pub(crate) fn filter_from_u8(value: u8) -> FilterType {
    match value {
        0 => FilterType::Nearest,
        2 => FilterType::Lanczos3,
        _ => FilterType::Bilinear,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_decoded_image_creation() {
        let img = JsDecodedImage::new(100, 50, vec![0u8; 100 * 50 * 3]);
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.byte_length(), 15000);
    }

    #[test]
    fn test_js_decoded_image_conversion() {
        let original = DecodedImage::new(2, 1, vec![255, 128, 64, 32, 16, 8]);
        let js = JsDecodedImage::from_decoded(original.clone());
        let back = js.to_decoded();

        assert_eq!(back.width, original.width);
        assert_eq!(back.height, original.height);
        assert_eq!(back.pixels, original.pixels);
    }

    #[test]
    fn test_js_crop_region_accessors() {
        let region = JsCropRegion::from(CropRegion::new(500, 0, 3000, 3000));
        assert_eq!(
            (region.x(), region.y(), region.width(), region.height()),
            (500, 0, 3000, 3000)
        );
        assert_eq!(region.inner(), &CropRegion::new(500, 0, 3000, 3000));
    }

    #[test]
    fn test_filter_from_u8() {
        assert_eq!(filter_from_u8(0), FilterType::Nearest);
        assert_eq!(filter_from_u8(1), FilterType::Bilinear);
        assert_eq!(filter_from_u8(2), FilterType::Lanczos3);
        assert_eq!(filter_from_u8(255), FilterType::Bilinear);
    }
}
