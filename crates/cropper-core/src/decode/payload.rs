//! Decoding of uploaded payloads (JPEG, PNG, WebP) with EXIF orientation handling.
//!
//! Browsers render `<img>` elements with their EXIF orientation applied, so the
//! native size the crop geometry is computed against is the *oriented* size.
//! Decoding applies the same correction to keep both spaces in agreement.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::DynamicImage;
use image::ImageReader;

use super::{DecodeError, DecodedImage, Orientation};

/// Decode an image payload, applying EXIF orientation correction.
///
/// The format is sniffed from the bytes, not taken from the declared MIME
/// type, so a mislabeled file still decodes if its content is supported.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the bytes are not a known image format.
/// Returns `DecodeError::CorruptedFile` if the image data is corrupted or truncated.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let orientation = extract_orientation(bytes);
    let img = read_dynamic(bytes)?;
    let oriented_img = apply_orientation(img, orientation);
    Ok(DecodedImage::from_rgb_image(oriented_img.into_rgb8()))
}

fn read_dynamic(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}

/// `Orientation::Normal` when there is no EXIF block.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    Reader::new()
        .read_from_container(&mut cursor)
        .ok()
        .and_then(|exif| {
            exif.get_field(Tag::Orientation, In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .map(Orientation::from)
        .unwrap_or_default()
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};

    /// Encode a small two-tone image in the given container format.
    fn encoded(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                image::Rgb([255, 0, 0])
            } else {
                image::Rgb([0, 0, 255])
            }
        });
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut out, format)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let bytes = encoded(8, 4, ImageFormat::Png);
        let img = decode_image(&bytes).unwrap();

        assert_eq!(img.width, 8);
        assert_eq!(img.height, 4);
        assert_eq!(img.pixels.len(), 8 * 4 * 3);
        // PNG is lossless, left half stays red
        assert_eq!(&img.pixels[0..3], &[255, 0, 0]);
    }

    #[test]
    fn test_decode_jpeg() {
        let bytes = encoded(16, 8, ImageFormat::Jpeg);
        let img = decode_image(&bytes).unwrap();

        assert_eq!(img.width, 16);
        assert_eq!(img.height, 8);
    }

    #[test]
    fn test_decode_webp() {
        let bytes = encoded(6, 6, ImageFormat::WebP);
        let img = decode_image(&bytes).unwrap();

        assert_eq!(img.width, 6);
        assert_eq!(img.height, 6);
    }

    #[test]
    fn test_decode_unknown_format() {
        let result = decode_image(&[0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(result, Err(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert!(decode_image(&[]).is_err());
    }

    #[test]
    fn test_decode_truncated_png() {
        let bytes = encoded(32, 32, ImageFormat::Png);
        let truncated = &bytes[..bytes.len() / 2];

        match decode_image(truncated) {
            Err(DecodeError::CorruptedFile(_)) => {}
            other => panic!("Expected CorruptedFile error, got: {:?}", other),
        }
    }

    #[test]
    fn test_orientation_extraction_no_exif() {
        let bytes = encoded(4, 4, ImageFormat::Jpeg);
        assert_eq!(extract_orientation(&bytes), Orientation::Normal);
    }

    #[test]
    fn test_orientation_extraction_invalid_data() {
        assert_eq!(extract_orientation(&[0x00, 0x01, 0x02]), Orientation::Normal);
    }

    #[test]
    fn test_apply_orientation_rotate90_swaps_dimensions() {
        let pixels = vec![
            255, 0, 0, // Red (left)
            0, 255, 0, // Green (right)
        ];
        let img = DynamicImage::ImageRgb8(RgbImage::from_raw(2, 1, pixels).unwrap());

        let result = apply_orientation(img, Orientation::Rotate90CW).into_rgb8();
        assert_eq!(result.dimensions(), (1, 2));
    }

    #[test]
    fn test_apply_orientation_rotate180() {
        let pixels = vec![255, 0, 0, 0, 255, 0];
        let img = DynamicImage::ImageRgb8(RgbImage::from_raw(2, 1, pixels).unwrap());

        let result = apply_orientation(img, Orientation::Rotate180).into_rgb8();
        assert_eq!(result.get_pixel(0, 0).0, [0, 255, 0]);
        assert_eq!(result.get_pixel(1, 0).0, [255, 0, 0]);
    }

    #[test]
    fn test_apply_orientation_flip_horizontal() {
        let pixels = vec![255, 0, 0, 0, 255, 0];
        let img = DynamicImage::ImageRgb8(RgbImage::from_raw(2, 1, pixels).unwrap());

        let result = apply_orientation(img, Orientation::FlipHorizontal).into_rgb8();
        assert_eq!(result.get_pixel(0, 0).0, [0, 255, 0]);
        assert_eq!(result.get_pixel(1, 0).0, [255, 0, 0]);
    }
}
