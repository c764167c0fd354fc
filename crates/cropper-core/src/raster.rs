//! Rasterization of a crop region into an encoded output artifact.
//!
//! This is the last step of the pipeline: the native-space rectangle chosen
//! by [`crate::geometry::compute_crop_region`] is copied out of the source
//! and encoded as JPEG. The output has exactly the region's dimensions.

use thiserror::Error;

use crate::decode::{decode_image, DecodeError, DecodedImage, FilterType, SourceImage};
use crate::encode::{encode_image, EncodeError, JPEG_MIME_TYPE};
use crate::geometry::{CropRegion, Size};
use crate::transform::{extract_region, resize_to_fit, TransformError};

/// Errors from a single crop attempt. Neither is fatal to the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RasterError {
    /// The source could not be read as pixel data.
    #[error("Failed to read image data: {0}")]
    DecodeFailed(String),

    /// The cropped pixels could not be encoded.
    #[error("Failed to encode cropped image: {0}")]
    EncodeFailed(String),
}

impl From<DecodeError> for RasterError {
    fn from(e: DecodeError) -> Self {
        RasterError::DecodeFailed(e.to_string())
    }
}

impl From<TransformError> for RasterError {
    fn from(e: TransformError) -> Self {
        RasterError::DecodeFailed(e.to_string())
    }
}

impl From<EncodeError> for RasterError {
    fn from(e: EncodeError) -> Self {
        RasterError::EncodeFailed(e.to_string())
    }
}

/// An encoded cropped image handed to the consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

impl OutputArtifact {
    /// Encoded image bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Always `image/jpeg`.
    pub fn mime_type(&self) -> &'static str {
        JPEG_MIME_TYPE
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel dimensions of the encoded image.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Length of the encoded payload in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Crop `region` out of `source` and encode it as JPEG.
///
/// The region is clamped to the source bounds before extraction.
///
/// # Errors
///
/// - `RasterError::DecodeFailed` if the source pixel buffer is malformed
/// - `RasterError::EncodeFailed` if JPEG encoding fails
pub fn crop(
    source: &SourceImage,
    region: &CropRegion,
    quality: u8,
) -> Result<OutputArtifact, RasterError> {
    let cropped = extract_region(source.image(), region)?;
    encode_artifact(&cropped, quality)
}

/// Decode an encoded payload and crop it in one step.
///
/// Any decode failure, including a payload that was mislabeled or corrupted
/// after validation, surfaces as `RasterError::DecodeFailed`.
pub fn crop_encoded(
    bytes: &[u8],
    region: &CropRegion,
    quality: u8,
) -> Result<OutputArtifact, RasterError> {
    let decoded = decode_image(bytes)?;
    let cropped = extract_region(&decoded, region)?;
    encode_artifact(&cropped, quality)
}

/// Scale an existing artifact down so its longest edge is at most `max_edge`.
///
/// This is the explicit resizing step for consumers that need a smaller
/// output than the native crop. Artifacts that already fit are re-encoded
/// unchanged in size.
pub fn scale_artifact(
    artifact: &OutputArtifact,
    max_edge: u32,
    quality: u8,
) -> Result<OutputArtifact, RasterError> {
    let decoded = decode_image(artifact.bytes())?;
    let scaled = resize_to_fit(&decoded, max_edge, FilterType::Lanczos3)?;
    encode_artifact(&scaled, quality)
}

fn encode_artifact(image: &DecodedImage, quality: u8) -> Result<OutputArtifact, RasterError> {
    let bytes = encode_image(image, quality)?;
    log::debug!(
        "encoded {}x{} crop into {} bytes",
        image.width,
        image.height,
        bytes.len()
    );
    Ok(OutputArtifact {
        bytes,
        width: image.width,
        height: image.height,
    })
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn source_and_region() -> impl Strategy<Value = (SourceImage, CropRegion)> {
        (1u32..=48, 1u32..=48).prop_flat_map(|(w, h)| {
            (1..=w, 1..=h).prop_flat_map(move |(rw, rh)| {
                (0..=w - rw, 0..=h - rh).prop_map(move |(x, y)| {
                    let pixels = vec![90u8; (w * h * 3) as usize];
                    let source = SourceImage::new(DecodedImage::new(w, h, pixels)).unwrap();
                    (source, CropRegion::new(x, y, rw, rh))
                })
            })
        })
    }

    proptest! {
        /// Property: Encoded output dimensions equal the region dimensions.
        #[test]
        fn prop_output_dimensions_equal_region(
            (source, region) in source_and_region(),
            quality in 1u8..=100,
        ) {
            let artifact = crop(&source, &region, quality).unwrap();
            prop_assert_eq!(artifact.size(), region.size());

            let decoded = image::load_from_memory(artifact.bytes()).unwrap();
            prop_assert_eq!((decoded.width(), decoded.height()), (region.width, region.height));
        }
    }
}
