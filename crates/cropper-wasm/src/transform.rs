//! WASM bindings for crop geometry and region extraction.
//!
//! Hosts that keep their own crop UI state can call these directly instead of
//! going through [`crate::ImageUploader`].

use crate::types::{JsCropRegion, JsDecodedImage};
use cropper_core::geometry::{self, CropSelection, DisplayGeometry, Size};
use cropper_core::transform::extract_region;
use wasm_bindgen::prelude::*;

/// Map a display-space pan/zoom selection to a native-pixel crop region.
///
/// # Example (TypeScript)
///
/// ```typescript
/// // 4000x3000 photo shown at 400x300, square crop, no pan
/// const r = compute_crop_region(0, 0, 1, 400, 300, 4000, 3000, 1);
/// // r.x === 500, r.width === 3000
/// ```
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn compute_crop_region(
    offset_x: f64,
    offset_y: f64,
    zoom: f64,
    display_width: f64,
    display_height: f64,
    native_width: u32,
    native_height: u32,
    aspect_ratio: f64,
) -> JsCropRegion {
    let selection = CropSelection::new(offset_x, offset_y, zoom);
    let display = DisplayGeometry::new(display_width, display_height);
    let native = Size::new(native_width, native_height);

    geometry::compute_crop_region(&selection, &display, native, aspect_ratio).into()
}

/// Size an image is rendered at inside a container (`object-fit: contain`).
///
/// Returns `{ width, height }`.
#[wasm_bindgen]
pub fn fit_display(
    native_width: u32,
    native_height: u32,
    container_width: f64,
    container_height: f64,
) -> Result<JsValue, JsValue> {
    let display = DisplayGeometry::fit_within(
        Size::new(native_width, native_height),
        container_width,
        container_height,
    );
    serde_wasm_bindgen::to_value(&display).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Copy a native-pixel region out of a decoded image.
///
/// The region is clamped to the image bounds.
#[wasm_bindgen]
pub fn extract_crop(
    image: &JsDecodedImage,
    region: &JsCropRegion,
) -> Result<JsDecodedImage, JsValue> {
    extract_region(&image.to_decoded(), region.inner())
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
