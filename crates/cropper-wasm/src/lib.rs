//! Cropper WASM - WebAssembly bindings for the image uploader
//!
//! This crate provides WASM bindings to expose the cropper-core functionality
//! to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `uploader` - The `ImageUploader` session class
//! - `types` - WASM-compatible wrapper types for images, regions and artifacts
//! - `validate` - Upload validation
//! - `decode` - Image decoding and preview scaling
//! - `transform` - Crop geometry and region extraction
//! - `encode` - JPEG encoding
//!
//! # Usage
//!
//! ```typescript
//! import init, { ImageUploader } from '@cropper/wasm';
//!
//! await init();
//!
//! const uploader = new ImageUploader({ aspectRatio: 1 });
//! uploader.onImageCropped((blob) => console.log(`Cropped ${blob.size} bytes`));
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod encode;
mod transform;
mod types;
mod uploader;
mod validate;

// Re-export public types
pub use decode::{decode_image, preview_for_display, resize_to_fit};
pub use encode::{encode_jpeg, encode_jpeg_from_image};
pub use transform::{compute_crop_region, extract_crop, fit_display};
pub use types::{JsCropRegion, JsDecodedImage, JsOutputArtifact};
pub use uploader::ImageUploader;
pub use validate::validate_file;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // A second init (e.g. hot reload) finds the logger already set.
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
