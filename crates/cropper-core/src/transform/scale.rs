//! Explicit scaling steps.
//!
//! Cropping never resizes. Callers that want a smaller artifact or a
//! screen-sized preview scale in a separate step with these functions.
//! All functions return new `DecodedImage` instances without modifying the input.

use crate::decode::{DecodedImage, FilterType};
use crate::geometry::{DisplayGeometry, Size};

use super::TransformError;

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `TransformError::InvalidDimensions` for a zero target size and
/// `TransformError::InconsistentBuffer` if the source buffer is malformed.
pub fn resize(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, TransformError> {
    if width == 0 || height == 0 {
        return Err(TransformError::InvalidDimensions { width, height });
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgb_image = image
        .to_rgb_image()
        .ok_or(TransformError::InconsistentBuffer {
            expected: image.width as usize * image.height as usize * 3,
            actual: image.pixels.len(),
        })?;

    let resized = image::imageops::resize(&rgb_image, width, height, filter.to_image_filter());

    Ok(DecodedImage::from_rgb_image(resized))
}

/// Resize an image so its longest edge is at most `max_edge`, preserving
/// aspect ratio. Images that already fit are returned unchanged.
pub fn resize_to_fit(
    image: &DecodedImage,
    max_edge: u32,
    filter: FilterType,
) -> Result<DecodedImage, TransformError> {
    if max_edge == 0 {
        return Err(TransformError::InvalidDimensions {
            width: max_edge,
            height: max_edge,
        });
    }

    if image.width <= max_edge && image.height <= max_edge {
        return Ok(image.clone());
    }

    let target = calculate_fit_dimensions(image.width, image.height, max_edge);
    resize(image, target.width, target.height, filter)
}

/// Downscale an image to the size it is displayed at, for a cheap on-screen
/// preview. Never upscales.
pub fn preview_for_display(
    image: &DecodedImage,
    display: &DisplayGeometry,
) -> Result<DecodedImage, TransformError> {
    if !display.is_valid() {
        return Err(TransformError::InvalidDimensions {
            width: display.width.max(0.0) as u32,
            height: display.height.max(0.0) as u32,
        });
    }

    let max_edge = display.width.max(display.height).ceil() as u32;
    resize_to_fit(image, max_edge.max(1), FilterType::Bilinear)
}

/// Dimensions fitting within `max_edge` while preserving aspect ratio.
fn calculate_fit_dimensions(width: u32, height: u32, max_edge: u32) -> Size {
    if width == 0 || height == 0 {
        return Size::default();
    }

    let ratio = width as f64 / height as f64;

    if width >= height {
        let new_height = (max_edge as f64 / ratio).round() as u32;
        Size::new(max_edge, new_height.max(1))
    } else {
        let new_width = (max_edge as f64 * ratio).round() as u32;
        Size::new(new_width.max(1), max_edge)
    }
}
