//! The `ImageUploader` class: one editing session exposed to JavaScript.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const uploader = new ImageUploader({ aspectRatio: 16 / 9, maxSize: 2 * 1024 * 1024 });
//! uploader.onImageCropped((blob: Blob) => upload(blob));
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! uploader.load(bytes, file.type);      // throws the validation message on rejection
//! uploader.setDisplay(img.clientWidth, img.clientHeight);
//! uploader.setCrop(dx, dy, zoom);
//! uploader.apply();                     // onImageCropped runs once apply has returned
//! ```

use crate::types::{artifact_blob, config_from_js, JsCropRegion, JsOutputArtifact};
use cropper_core::{
    DisplayGeometry, FileInfo, OutputArtifact, Session, SessionError, SessionState,
    UploaderConfig,
};
use wasm_bindgen::prelude::*;

/// Image upload and crop session.
#[wasm_bindgen]
pub struct ImageUploader {
    session: Session,
}

#[wasm_bindgen]
impl ImageUploader {
    /// Create an uploader. `config` may be `undefined` for the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<ImageUploader, JsValue> {
        Self::with_config(config_from_js(config)?).map_err(|e| JsValue::from_str(&e))
    }

    /// Register the callback receiving each committed crop as a JPEG `Blob`.
    ///
    /// The callback runs as a microtask after the committing call returns, so
    /// it may use the uploader (read its state, `clear()` it, ...).
    #[wasm_bindgen(js_name = onImageCropped)]
    pub fn on_image_cropped(&mut self, callback: js_sys::Function) {
        self.session
            .on_image_cropped(move |artifact: &OutputArtifact| match artifact_blob(artifact) {
                Ok(blob) => deliver_later(callback.clone(), blob),
                Err(e) => log::error!("failed to build Blob for onImageCropped: {:?}", e),
            });
    }

    /// Validate, decode and open the crop view for a selected file.
    ///
    /// Throws the user-facing validation or decode message on failure; the
    /// uploader is then empty.
    pub fn load(&mut self, bytes: &[u8], mime_type: &str) -> Result<(), JsValue> {
        let file = FileInfo::new(mime_type, bytes.len() as u64);
        self.session.load(&file, bytes).map_err(to_js)
    }

    /// Report the size the image is rendered at. Returns the updated region.
    #[wasm_bindgen(js_name = setDisplay)]
    pub fn set_display(&mut self, width: f64, height: f64) -> Option<JsCropRegion> {
        self.session
            .set_display(DisplayGeometry::new(width, height))
            .map(JsCropRegion::from)
    }

    /// Update pan and zoom. Returns the native-pixel region they select.
    #[wasm_bindgen(js_name = setCrop)]
    pub fn set_crop(
        &mut self,
        offset_x: f64,
        offset_y: f64,
        zoom: f64,
    ) -> Result<JsCropRegion, JsValue> {
        self.session
            .set_selection(cropper_core::CropSelection::new(offset_x, offset_y, zoom))
            .map(JsCropRegion::from)
            .map_err(to_js)
    }

    /// Crop, encode and commit the current region.
    pub fn apply(&mut self) -> Result<(), JsValue> {
        self.session.apply().map_err(to_js)
    }

    /// Reopen the crop view on the loaded image ("Edit").
    pub fn reopen(&mut self) -> Result<(), JsValue> {
        self.session.reopen().map_err(to_js)
    }

    /// Close the crop view without applying ("Cancel").
    pub fn cancel(&mut self) -> Result<(), JsValue> {
        self.session.cancel_edit().map_err(to_js)
    }

    /// Remove the image and the cropped result.
    pub fn clear(&mut self) {
        self.session.clear();
    }

    /// One of `empty`, `loaded`, `editing`, `committed`.
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        state_name(self.session.state()).to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn generation(&self) -> f64 {
        self.session.generation() as f64
    }

    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> f64 {
        self.session.selection().zoom
    }

    #[wasm_bindgen(getter, js_name = offsetX)]
    pub fn offset_x(&self) -> f64 {
        self.session.selection().offset.x
    }

    #[wasm_bindgen(getter, js_name = offsetY)]
    pub fn offset_y(&self) -> f64 {
        self.session.selection().offset.y
    }

    #[wasm_bindgen(getter, js_name = nativeWidth)]
    pub fn native_width(&self) -> u32 {
        self.session.source().map_or(0, |s| s.width())
    }

    #[wasm_bindgen(getter, js_name = nativeHeight)]
    pub fn native_height(&self) -> u32 {
        self.session.source().map_or(0, |s| s.height())
    }

    #[wasm_bindgen(getter)]
    pub fn region(&self) -> Option<JsCropRegion> {
        self.session.region().map(JsCropRegion::from)
    }

    /// Message of the last failed operation.
    #[wasm_bindgen(getter)]
    pub fn error(&self) -> Option<String> {
        self.session.last_error().map(|e| e.to_string())
    }

    /// The committed crop, if any.
    #[wasm_bindgen(getter)]
    pub fn artifact(&self) -> Option<JsOutputArtifact> {
        self.session.artifact().cloned().map(JsOutputArtifact::from)
    }

    /// Value for the file input's `accept` attribute.
    #[wasm_bindgen(getter)]
    pub fn accept(&self) -> String {
        self.session.config().accept_attribute()
    }

    /// Drop zone hint, e.g. `.jpeg, .png, .webp (max 5MB)`.
    #[wasm_bindgen(getter)]
    pub fn hint(&self) -> String {
        let config = self.session.config();
        format!("{} (max {})", config.extensions_hint(), config.max_size_label())
    }
}

impl ImageUploader {
    pub fn with_config(config: UploaderConfig) -> Result<Self, String> {
        let session = Session::new(config).map_err(|e| e.to_string())?;
        Ok(Self { session })
    }
}

/// Call `callback` with `blob` once the current call into the uploader has
/// returned and released its borrow.
fn deliver_later(callback: js_sys::Function, blob: web_sys::Blob) {
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = callback.call1(&JsValue::NULL, &blob) {
            log::error!("onImageCropped failed: {:?}", e);
        }
    });
}

fn to_js(e: SessionError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn state_name(state: SessionState) -> &'static str {
    match state {
        SessionState::Empty => "empty",
        SessionState::Loaded => "loaded",
        SessionState::Editing => "editing",
        SessionState::Committed => "committed",
    }
}
