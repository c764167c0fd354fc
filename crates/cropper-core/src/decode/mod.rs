//! Decoding of uploaded image payloads.
//!
//! This module provides functionality for:
//! - Decoding JPEG, PNG and WebP payloads into RGB pixel data
//! - Applying EXIF orientation so native dimensions match what a browser renders
//! - Wrapping the result in a shareable [`SourceImage`]
//!
//! # Examples
//!
//! ```ignore
//! use cropper_core::decode::{decode_image, SourceImage};
//!
//! let bytes = std::fs::read("photo.png").unwrap();
//! let source = SourceImage::new(decode_image(&bytes).unwrap()).unwrap();
//! println!("Decoded {}x{} image", source.width(), source.height());
//! ```

mod payload;
mod types;

pub use payload::decode_image;
pub use types::{DecodeError, DecodedImage, FilterType, Orientation, SourceImage};

/// Decode a payload straight into a [`SourceImage`].
pub fn decode_source(bytes: &[u8]) -> Result<SourceImage, DecodeError> {
    SourceImage::new(decode_image(bytes)?)
}
