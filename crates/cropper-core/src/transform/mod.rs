//! Pixel operations on decoded images: region extraction and scaling.
//!
//! # Coordinate System
//!
//! - Regions are in native pixels of the decoded image
//! - Origin is the top-left corner
//!
//! Extraction and scaling are separate steps. A crop never changes the pixel
//! density of what it copies; scaling is always requested explicitly.

mod crop;
mod scale;

use thiserror::Error;

pub use crop::extract_region;
pub use scale::{preview_for_display, resize, resize_to_fit};

/// Errors from pixel operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Pixel buffer length doesn't match the image dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InconsistentBuffer { expected: usize, actual: usize },
}
