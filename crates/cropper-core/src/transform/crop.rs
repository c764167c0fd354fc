//! Pixel-exact region extraction.
//!
//! The region is given in native pixels (see [`crate::geometry`]). It is
//! clamped to the image bounds as a last line of defense, after which the
//! output has exactly the region's dimensions.

use crate::decode::DecodedImage;
use crate::geometry::CropRegion;

use super::TransformError;

/// Copy the pixels inside `region` into a new image.
///
/// # Behavior
///
/// - A region reaching past the image is clamped into it (moved first,
///   shrunk only when larger than the image itself)
/// - Minimum output dimension is 1x1 pixels
/// - A region covering the whole image returns a copy of the original
///
/// # Errors
///
/// Returns `TransformError::InconsistentBuffer` if the source pixel buffer
/// does not hold `width * height * 3` bytes, and
/// `TransformError::InvalidDimensions` if the source is empty.
pub fn extract_region(
    image: &DecodedImage,
    region: &CropRegion,
) -> Result<DecodedImage, TransformError> {
    if image.width == 0 || image.height == 0 {
        return Err(TransformError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }
    if !image.is_consistent() {
        return Err(TransformError::InconsistentBuffer {
            expected: image.width as usize * image.height as usize * 3,
            actual: image.pixels.len(),
        });
    }

    let region = region.clamp_to(image.size());

    // Fast path: full region returns a clone
    if region == CropRegion::full(image.size()) {
        return Ok(image.clone());
    }

    let src_stride = image.width as usize * 3;
    let row_len = region.width as usize * 3;
    let left = region.x as usize * 3;

    let mut output = Vec::with_capacity(row_len * region.height as usize);
    for src_y in region.y..region.y + region.height {
        let start = src_y as usize * src_stride + left;
        output.extend_from_slice(&image.pixels[start..start + row_len]);
    }

    Ok(DecodedImage::new(region.width, region.height, output))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a test image where each pixel has a unique value based on position.
    fn test_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.push(v); // R
                pixels.push(v); // G
                pixels.push(v); // B
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    #[test]
    fn test_full_region_is_identity() {
        let img = test_image(50, 40);
        let result = extract_region(&img, &CropRegion::new(0, 0, 50, 40)).unwrap();

        assert_eq!(result.width, 50);
        assert_eq!(result.height, 40);
        assert_eq!(result.pixels, img.pixels);
    }

    #[test]
    fn test_interior_region() {
        let img = test_image(10, 10);
        let result = extract_region(&img, &CropRegion::new(2, 3, 4, 5)).unwrap();

        assert_eq!(result.width, 4);
        assert_eq!(result.height, 5);
        // First pixel comes from (2, 3): 3 * 10 + 2 = 32
        assert_eq!(result.pixels[0], 32);
        // Last pixel comes from (5, 7): 7 * 10 + 5 = 75
        assert_eq!(result.pixels[result.pixels.len() - 1], 75);
    }

    #[test]
    fn test_rows_are_contiguous() {
        let img = test_image(10, 10);
        let result = extract_region(&img, &CropRegion::new(1, 1, 3, 2)).unwrap();

        let values: Vec<u8> = result.pixels.chunks(3).map(|p| p[0]).collect();
        assert_eq!(values, vec![11, 12, 13, 21, 22, 23]);
    }

    #[test]
    fn test_region_past_edge_is_moved_inside() {
        let img = test_image(10, 10);
        let result = extract_region(&img, &CropRegion::new(8, 8, 4, 4)).unwrap();

        // Size is preserved, origin shifts to (6, 6)
        assert_eq!((result.width, result.height), (4, 4));
        assert_eq!(result.pixels[0], 66);
    }

    #[test]
    fn test_oversized_region_returns_whole_image() {
        let img = test_image(10, 8);
        let result = extract_region(&img, &CropRegion::new(0, 0, 100, 100)).unwrap();

        assert_eq!((result.width, result.height), (10, 8));
        assert_eq!(result.pixels, img.pixels);
    }

    #[test]
    fn test_zero_sized_region_yields_one_pixel() {
        let img = test_image(10, 10);
        let result = extract_region(&img, &CropRegion::new(5, 5, 0, 0)).unwrap();

        assert_eq!((result.width, result.height), (1, 1));
        assert_eq!(result.pixels, vec![55, 55, 55]);
    }

    #[test]
    fn test_inconsistent_buffer_is_rejected() {
        let img = DecodedImage {
            width: 10,
            height: 10,
            pixels: vec![0u8; 12],
        };
        let result = extract_region(&img, &CropRegion::new(0, 0, 2, 2));
        assert_eq!(
            result.unwrap_err(),
            TransformError::InconsistentBuffer {
                expected: 300,
                actual: 12
            }
        );
    }

    #[test]
    fn test_empty_image_is_rejected() {
        let img = DecodedImage {
            width: 0,
            height: 5,
            pixels: vec![],
        };
        assert!(matches!(
            extract_region(&img, &CropRegion::new(0, 0, 1, 1)),
            Err(TransformError::InvalidDimensions { .. })
        ));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
