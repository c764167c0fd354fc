//! Cropper Core - Image upload and crop library
//!
//! This crate provides the core functionality behind the image uploader:
//! upload validation, display-to-native crop geometry, decoding, JPEG
//! output, and the editing session that ties them together.

pub mod config;
pub mod decode;
pub mod encode;
pub mod geometry;
pub mod raster;
pub mod session;
pub mod transform;
pub mod validate;

pub use config::{ConfigError, UploaderConfig};
pub use geometry::{compute_crop_region, CropRegion, CropSelection, DisplayGeometry, Point, Size};
pub use raster::{OutputArtifact, RasterError};
pub use session::{CropTicket, LoadTicket, Session, SessionError, SessionState};
pub use validate::{validate, Constraints, FileInfo, ValidationError};

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn jpeg_upload(width: u32, height: u32) -> (FileInfo, Vec<u8>) {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([30, 160, 90]));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut out, image::ImageFormat::Jpeg)
            .unwrap();
        let bytes = out.into_inner();
        (FileInfo::new("image/jpeg", bytes.len() as u64), bytes)
    }

    #[test]
    fn test_upload_crop_commit_pipeline() {
        let (file, bytes) = jpeg_upload(800, 600);
        let mut session = Session::new(UploaderConfig::default()).unwrap();

        session.load(&file, &bytes).unwrap();
        session.set_display(DisplayGeometry::fit_within(
            Size::new(800, 600),
            400.0,
            400.0,
        ));
        session.set_offset(-20.0, 0.0).unwrap();
        session.apply().unwrap();

        let artifact = session.artifact().unwrap();
        assert_eq!(artifact.mime_type(), "image/jpeg");
        assert_eq!(artifact.width(), artifact.height());

        let decoded = image::load_from_memory(artifact.bytes()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (600, 600));
    }

    #[test]
    fn test_default_config_accepts_common_types() {
        let constraints = UploaderConfig::default().constraints();
        for mime in ["image/jpeg", "image/png", "image/webp"] {
            assert!(validate(&FileInfo::new(mime, 1024), &constraints).is_ok());
        }
    }
}
