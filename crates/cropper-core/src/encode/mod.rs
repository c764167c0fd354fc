//! Image encoding for crop output.
//!
//! This module provides functionality for:
//! - Encoding RGB pixel data to JPEG with configurable quality
//!
//! All operations are synchronous and single-threaded within WASM.

mod jpeg;

pub use jpeg::{encode_image, encode_jpeg, EncodeError, JPEG_MIME_TYPE};
