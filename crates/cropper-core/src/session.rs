//! Editing session: the validate → preview → crop → commit lifecycle.
//!
//! # States
//!
//! ```text
//!            select_file / load           (automatic)          apply
//!   Empty ───────────────────────▶ Loaded ──────────▶ Editing ───────▶ Committed
//!     ▲                               │  ◀── cancel_edit ──┘  ◀── reopen ───┘
//!     └──────────── clear (from any state) ───────────────────────────────┘
//! ```
//!
//! # Asynchronous steps
//!
//! Decoding and encoding may run off the UI thread (e.g. in a Web Worker).
//! They are split into `begin_*` / `finish_*` pairs: `begin` hands out a
//! ticket stamped with the session generation, `finish` accepts the result
//! only if that generation is still current. Every file selection and every
//! clear bumps the generation, so a result that resolves after the user moved
//! on is discarded instead of overwriting newer state. At most one crop is
//! in flight at a time; pan and zoom remain available while it runs.
//!
//! The synchronous [`Session::load`] and [`Session::apply`] run both halves
//! back to back.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ConfigError, UploaderConfig};
use crate::decode::{decode_image, DecodeError, DecodedImage, SourceImage};
use crate::geometry::{
    clamp_selection, compute_crop_region, CropRegion, CropSelection, DisplayGeometry, Point,
};
use crate::raster::{self, OutputArtifact, RasterError};
use crate::validate::{validate, FileInfo, ValidationError};

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No image.
    Empty,
    /// Image decoded, crop view closed.
    Loaded,
    /// Crop view open; selection changes recompute the region.
    Editing,
    /// An artifact has been produced and handed to the consumer.
    Committed,
}

/// Errors returned by session operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error("Cannot {action} while the session is {state:?}")]
    InvalidState {
        action: &'static str,
        state: SessionState,
    },

    #[error("A crop is already in progress")]
    CropInProgress,

    #[error("No image loaded")]
    NoImage,

    #[error("Discarded result of a superseded request")]
    Stale,
}

/// Proof that a file passed validation; redeemed by [`Session::finish_load`].
#[derive(Debug)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Everything needed to rasterize one crop request off the session.
#[derive(Debug, Clone)]
pub struct CropTicket {
    generation: u64,
    request: u64,
    region: CropRegion,
    source: SourceImage,
    quality: u8,
}

impl CropTicket {
    /// Region captured when the request was issued.
    pub fn region(&self) -> CropRegion {
        self.region
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn request(&self) -> u64 {
        self.request
    }

    /// Run the rasterizer for this request.
    pub fn rasterize(&self) -> Result<OutputArtifact, RasterError> {
        raster::crop(&self.source, &self.region, self.quality)
    }
}

/// Callback fired once per successful commit.
pub type CropCallback = Box<dyn FnMut(&OutputArtifact)>;

/// Transient editing state of one uploader.
pub struct Session {
    config: UploaderConfig,
    state: SessionState,
    generation: u64,
    next_request: u64,
    pending_load: Option<u64>,
    pending_crop: Option<u64>,
    source: Option<SourceImage>,
    display: DisplayGeometry,
    selection: CropSelection,
    region: Option<CropRegion>,
    artifact: Option<OutputArtifact>,
    last_error: Option<SessionError>,
    on_cropped: Option<CropCallback>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("generation", &self.generation)
            .field("pending_load", &self.pending_load)
            .field("pending_crop", &self.pending_crop)
            .field("selection", &self.selection)
            .field("region", &self.region)
            .field("has_source", &self.source.is_some())
            .field("has_artifact", &self.artifact.is_some())
            .field("last_error", &self.last_error)
            .finish()
    }
}

impl Session {
    /// Create a session after validating the configuration.
    pub fn new(config: UploaderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            state: SessionState::Empty,
            generation: 0,
            next_request: 0,
            pending_load: None,
            pending_crop: None,
            source: None,
            display: DisplayGeometry::default(),
            selection: CropSelection::default(),
            region: None,
            artifact: None,
            last_error: None,
            on_cropped: None,
        })
    }

    /// Register the commit callback, replacing any previous one.
    pub fn on_image_cropped(&mut self, callback: impl FnMut(&OutputArtifact) + 'static) {
        self.on_cropped = Some(Box::new(callback));
    }

    pub fn config(&self) -> &UploaderConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Counter identifying the current file; bumped on every selection and clear.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn selection(&self) -> CropSelection {
        self.selection
    }

    pub fn display(&self) -> DisplayGeometry {
        self.display
    }

    /// Last computed crop region, if an image is loaded.
    pub fn region(&self) -> Option<CropRegion> {
        self.region
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    /// Current output artifact.
    pub fn artifact(&self) -> Option<&OutputArtifact> {
        self.artifact.as_ref()
    }

    /// Error of the most recent failed operation, cleared by the next attempt.
    pub fn last_error(&self) -> Option<&SessionError> {
        self.last_error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending_load.is_some()
    }

    pub fn is_crop_pending(&self) -> bool {
        self.pending_crop.is_some()
    }

    /// Validate a candidate file and start loading it.
    ///
    /// Any current image is released either way. On rejection the session is
    /// `Empty` and the error is kept in [`Session::last_error`].
    pub fn select_file(&mut self, file: &FileInfo) -> Result<LoadTicket, SessionError> {
        self.reset();

        if let Err(e) = validate(file, &self.config.constraints()) {
            log::debug!("rejected {} ({} bytes): {}", file.mime_type, file.size, e);
            return Err(self.fail(e.into()));
        }

        self.pending_load = Some(self.generation);
        log::debug!(
            "accepted {} ({} bytes), generation {}",
            file.mime_type,
            file.size,
            self.generation
        );
        Ok(LoadTicket {
            generation: self.generation,
        })
    }

    /// Complete a load started by [`Session::select_file`].
    ///
    /// On success the selection is reset and the crop view opens (`Editing`).
    /// A decode failure leaves the session `Empty`.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        decoded: Result<DecodedImage, DecodeError>,
    ) -> Result<(), SessionError> {
        if self.pending_load != Some(ticket.generation) {
            log::warn!(
                "discarding decode for generation {} (current {})",
                ticket.generation,
                self.generation
            );
            return Err(SessionError::Stale);
        }
        self.pending_load = None;

        let source = match decoded.and_then(SourceImage::new) {
            Ok(source) => source,
            Err(e) => {
                log::warn!("decode failed: {}", e);
                return Err(self.fail(RasterError::from(e).into()));
            }
        };

        log::debug!("loaded {}x{} source", source.width(), source.height());
        self.source = Some(source);
        self.selection = CropSelection::default();
        self.state = SessionState::Loaded;
        self.enter_editing();
        Ok(())
    }

    /// Validate, decode and open the crop view in one step.
    pub fn load(&mut self, file: &FileInfo, bytes: &[u8]) -> Result<(), SessionError> {
        let ticket = self.select_file(file)?;
        self.finish_load(ticket, decode_image(bytes))
    }

    /// Update the size the image is displayed at.
    ///
    /// Allowed in any state; the region is recomputed while editing.
    pub fn set_display(&mut self, display: DisplayGeometry) -> Option<CropRegion> {
        self.display = display;
        if self.state == SessionState::Editing {
            self.selection = self.clamped(self.selection);
            self.recompute_region();
        }
        self.region
    }

    /// Replace the pan/zoom selection and recompute the crop region.
    ///
    /// The offset is restricted so the crop box stays on the image and the
    /// zoom is clamped to its supported range.
    pub fn set_selection(&mut self, selection: CropSelection) -> Result<CropRegion, SessionError> {
        self.require(SessionState::Editing, "change the selection")?;
        self.selection = self.clamped(selection);
        self.recompute_region().ok_or(SessionError::NoImage)
    }

    pub fn set_offset(&mut self, x: f64, y: f64) -> Result<CropRegion, SessionError> {
        let selection = CropSelection {
            offset: Point::new(x, y),
            ..self.selection
        };
        self.set_selection(selection)
    }

    pub fn set_zoom(&mut self, zoom: f64) -> Result<CropRegion, SessionError> {
        let selection = CropSelection {
            zoom,
            ..self.selection
        };
        self.set_selection(selection)
    }

    /// Issue a crop request for the current region.
    ///
    /// # Errors
    ///
    /// - `InvalidState` outside `Editing`
    /// - `CropInProgress` while a previous request has not finished
    /// - `NoImage` if no source is loaded
    pub fn begin_apply(&mut self) -> Result<CropTicket, SessionError> {
        self.require(SessionState::Editing, "apply a crop")?;
        if self.pending_crop.is_some() {
            return Err(SessionError::CropInProgress);
        }

        let (source, region) = match (&self.source, self.region) {
            (Some(source), Some(region)) => (source.clone(), region),
            _ => return Err(SessionError::NoImage),
        };

        let request = self.next_request;
        self.next_request += 1;
        self.pending_crop = Some(request);
        self.last_error = None;

        log::debug!("crop request {} for {:?}", request, region);
        Ok(CropTicket {
            generation: self.generation,
            request,
            region,
            source,
            quality: self.config.output_quality,
        })
    }

    /// Complete a crop request.
    ///
    /// On success the artifact replaces the previous one, the session is
    /// `Committed` and the callback fires. On failure the session stays in
    /// `Editing` and the previous artifact is kept.
    pub fn finish_apply(
        &mut self,
        ticket: CropTicket,
        result: Result<OutputArtifact, RasterError>,
    ) -> Result<(), SessionError> {
        if ticket.generation != self.generation || self.pending_crop != Some(ticket.request) {
            log::warn!(
                "discarding crop request {} of generation {} (current {})",
                ticket.request,
                ticket.generation,
                self.generation
            );
            return Err(SessionError::Stale);
        }
        self.pending_crop = None;

        let artifact = match result {
            Ok(artifact) => artifact,
            Err(e) => {
                log::warn!("crop request {} failed: {}", ticket.request, e);
                return Err(self.fail(e.into()));
            }
        };

        self.artifact = Some(artifact);
        self.state = SessionState::Committed;
        log::debug!("committed crop request {}", ticket.request);

        if let (Some(callback), Some(artifact)) =
            (self.on_cropped.as_mut(), self.artifact.as_ref())
        {
            callback(artifact);
        }
        Ok(())
    }

    /// Rasterize the current region and commit it in one step.
    pub fn apply(&mut self) -> Result<(), SessionError> {
        let ticket = self.begin_apply()?;
        let result = ticket.rasterize();
        self.finish_apply(ticket, result)
    }

    /// Open the crop view again on the loaded image.
    ///
    /// The previous selection is kept, so re-editing starts where the last
    /// commit left off.
    pub fn reopen(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Loaded | SessionState::Committed => {
                self.enter_editing();
                Ok(())
            }
            SessionState::Editing => Ok(()),
            SessionState::Empty => Err(SessionError::InvalidState {
                action: "reopen the crop view",
                state: self.state,
            }),
        }
    }

    /// Close the crop view without applying.
    ///
    /// Returns to `Committed` when an artifact exists, otherwise to `Loaded`.
    pub fn cancel_edit(&mut self) -> Result<(), SessionError> {
        self.require(SessionState::Editing, "cancel editing")?;
        self.state = if self.artifact.is_some() {
            SessionState::Committed
        } else {
            SessionState::Loaded
        };
        log::debug!("crop view closed, now {:?}", self.state);
        Ok(())
    }

    /// Release the image and artifact and return to `Empty`.
    pub fn clear(&mut self) {
        self.reset();
        self.last_error = None;
        log::debug!("session cleared, generation {}", self.generation);
    }

    fn reset(&mut self) {
        self.generation += 1;
        self.pending_load = None;
        self.pending_crop = None;
        self.source = None;
        self.artifact = None;
        self.region = None;
        self.selection = CropSelection::default();
        self.state = SessionState::Empty;
        self.last_error = None;
    }

    fn enter_editing(&mut self) {
        self.state = SessionState::Editing;
        self.selection = self.clamped(self.selection);
        self.recompute_region();
    }

    fn clamped(&self, selection: CropSelection) -> CropSelection {
        let display = match &self.source {
            Some(source) if !self.display.is_valid() => {
                DisplayGeometry::native(source.native_size())
            }
            _ => self.display,
        };
        clamp_selection(&selection, &display, self.config.aspect_ratio)
    }

    fn recompute_region(&mut self) -> Option<CropRegion> {
        self.region = self.source.as_ref().map(|source| {
            compute_crop_region(
                &self.selection,
                &self.display,
                source.native_size(),
                self.config.aspect_ratio,
            )
        });
        self.region
    }

    fn require(&self, state: SessionState, action: &'static str) -> Result<(), SessionError> {
        if self.state == state {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                action,
                state: self.state,
            })
        }
    }

    /// Record an error as the session's last error and hand it back.
    fn fail(&mut self, error: SessionError) -> SessionError {
        self.last_error = Some(error.clone());
        error
    }
}
