//! Upload validation bindings.

use crate::types::config_from_js;
use cropper_core::validate::{validate, FileInfo};
use cropper_core::UploaderConfig;
use wasm_bindgen::prelude::*;

/// Check a candidate file against an uploader configuration.
///
/// `config` may be `undefined` for the defaults. Throws the user-facing
/// message (e.g. `File is too large. Maximum size: 5MB`) on rejection.
#[wasm_bindgen]
pub fn validate_file(mime_type: &str, size: f64, config: JsValue) -> Result<(), JsValue> {
    let config = config_from_js(config)?;
    check(&config, mime_type, size).map_err(|message| JsValue::from_str(&message))
}

/// Sizes arrive from `File.size` as a JS number.
fn check(config: &UploaderConfig, mime_type: &str, size: f64) -> Result<(), String> {
    if !(size.is_finite() && size >= 0.0) {
        return Err(format!("Invalid file size: {}", size));
    }
    validate(&FileInfo::new(mime_type, size as u64), &config.constraints())
        .map_err(|e| e.to_string())
}
