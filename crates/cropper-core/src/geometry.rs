//! Crop geometry: mapping a display-space selection into native pixels.
//!
//! The crop view renders the source image scaled to fit its container, then
//! lets the user pan and zoom the image underneath a fixed crop box. This
//! module turns that interaction state into the rectangle of *native* pixels
//! the rasterizer extracts.
//!
//! # Coordinate System
//!
//! - Display space: CSS pixels of the image as rendered, origin top-left
//! - Native space: pixels of the decoded, orientation-corrected image
//! - The selection offset is the pan of the zoomed image relative to the
//!   centered crop box, in display pixels (positive x moves the image right)
//!
//! # Mapping Rule
//!
//! 1. The crop box is the largest box with the requested aspect ratio that
//!    fits inside the displayed image.
//! 2. Zooming shrinks the visible window on the unzoomed image to
//!    `box / zoom`, centered on the image center shifted by `-offset / zoom`.
//! 3. The window is clamped inside the displayed image (over-panning never
//!    errors, it pins the window to the nearest edge).
//! 4. The window is scaled to native space with independent horizontal and
//!    vertical factors, then rounded to whole pixels and clamped to the
//!    native bounds.
//!
//! The horizontal and vertical factors differ when the image is displayed at
//! a distorted aspect ratio. That distortion carries through to the native
//! rectangle on purpose: the region is what the user saw inside the box.

use serde::{Deserialize, Serialize};

/// Smallest zoom factor; the crop box then covers the largest possible area.
pub const MIN_ZOOM: f64 = 1.0;

/// Largest zoom factor accepted from the zoom slider.
pub const MAX_ZOOM: f64 = 3.0;

/// Aspect ratio used when none (or an invalid one) is configured.
pub const DEFAULT_ASPECT_RATIO: f64 = 1.0;

/// Integer pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A point in display space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Size at which the source image is rendered on screen.
///
/// Not stored by the session: hosts recompute it whenever the image or its
/// container resizes and pass it along with every selection change.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DisplayGeometry {
    pub width: f64,
    pub height: f64,
}

impl DisplayGeometry {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Geometry of an image rendered at its native size.
    pub fn native(size: Size) -> Self {
        Self::new(size.width as f64, size.height as f64)
    }

    /// Geometry of an image scaled to fit inside a container while keeping
    /// its aspect ratio (CSS `object-fit: contain`).
    ///
    /// Returns a zero geometry when either the image or the container is empty.
    pub fn fit_within(native: Size, container_width: f64, container_height: f64) -> Self {
        if native.is_empty() || !is_positive(container_width) || !is_positive(container_height) {
            return Self::default();
        }

        let scale = (container_width / native.width as f64)
            .min(container_height / native.height as f64);

        Self::new(native.width as f64 * scale, native.height as f64 * scale)
    }

    /// Whether both dimensions are finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        is_positive(self.width) && is_positive(self.height)
    }
}

/// Pan and zoom state of the crop view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropSelection {
    /// Pan of the zoomed image relative to the centered crop box (display px).
    pub offset: Point,
    /// Zoom factor, `MIN_ZOOM..=MAX_ZOOM`.
    pub zoom: f64,
}

impl Default for CropSelection {
    fn default() -> Self {
        Self {
            offset: Point::default(),
            zoom: MIN_ZOOM,
        }
    }
}

impl CropSelection {
    pub fn new(x: f64, y: f64, zoom: f64) -> Self {
        Self {
            offset: Point::new(x, y),
            zoom,
        }
    }
}

/// Rectangle of native pixels to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Region covering an entire image.
    pub fn full(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height.max(1) as f64
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Whether the region is non-empty and lies entirely inside `bounds`.
    pub fn fits_within(&self, bounds: Size) -> bool {
        self.width >= 1
            && self.height >= 1
            && self.right() <= bounds.width as u64
            && self.bottom() <= bounds.height as u64
    }

    /// Clamp the region into `bounds`, shrinking it only when it is larger
    /// than the bounds themselves. Width and height stay at least 1.
    pub fn clamp_to(&self, bounds: Size) -> CropRegion {
        let bound_w = bounds.width.max(1);
        let bound_h = bounds.height.max(1);

        let width = self.width.clamp(1, bound_w);
        let height = self.height.clamp(1, bound_h);

        CropRegion {
            x: self.x.min(bound_w - width),
            y: self.y.min(bound_h - height),
            width,
            height,
        }
    }
}

/// Visible window on the unzoomed displayed image.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Window {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

/// Clamp a zoom factor into `MIN_ZOOM..=MAX_ZOOM`; non-finite values reset to `MIN_ZOOM`.
pub fn sanitize_zoom(zoom: f64) -> f64 {
    if zoom.is_finite() {
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    } else {
        MIN_ZOOM
    }
}

/// Replace a non-finite or non-positive aspect ratio with `DEFAULT_ASPECT_RATIO`.
pub fn sanitize_aspect_ratio(aspect_ratio: f64) -> f64 {
    if is_positive(aspect_ratio) {
        aspect_ratio
    } else {
        DEFAULT_ASPECT_RATIO
    }
}

/// Map a display-space selection to a native-space crop region.
///
/// Deterministic: the same inputs always yield the same rectangle. The result
/// always lies inside `native` with width and height of at least one pixel.
///
/// Degenerate inputs are repaired rather than rejected: an invalid display
/// geometry is treated as the image rendered at native size, a zero native
/// dimension is treated as one pixel.
pub fn compute_crop_region(
    selection: &CropSelection,
    display: &DisplayGeometry,
    native: Size,
    aspect_ratio: f64,
) -> CropRegion {
    let native = Size::new(native.width.max(1), native.height.max(1));
    let display = effective_display(display, native);
    let window = visible_window(selection, &display, aspect_ratio);

    let scale_x = native.width as f64 / display.width;
    let scale_y = native.height as f64 / display.height;

    let width = round_px(window.width * scale_x).clamp(1, native.width);
    let height = round_px(window.height * scale_y).clamp(1, native.height);
    let x = round_px(window.x * scale_x).min(native.width - width);
    let y = round_px(window.y * scale_y).min(native.height - height);

    CropRegion {
        x,
        y,
        width,
        height,
    }
}

/// Restrict a selection so the crop box stays inside the image.
///
/// The zoom is sanitized and the offset is pinned to the range in which
/// [`compute_crop_region`] does not need to clamp. Hosts use this to snap the
/// pan position back after the user drags past an edge.
pub fn clamp_selection(
    selection: &CropSelection,
    display: &DisplayGeometry,
    aspect_ratio: f64,
) -> CropSelection {
    let zoom = sanitize_zoom(selection.zoom);
    if !display.is_valid() {
        return CropSelection {
            offset: Point::default(),
            zoom,
        };
    }

    let (box_w, box_h) = crop_box(display, sanitize_aspect_ratio(aspect_ratio));
    let max_x = ((display.width * zoom - box_w) / 2.0).max(0.0);
    let max_y = ((display.height * zoom - box_h) / 2.0).max(0.0);

    CropSelection {
        offset: Point::new(
            finite_or_zero(selection.offset.x).clamp(-max_x, max_x),
            finite_or_zero(selection.offset.y).clamp(-max_y, max_y),
        ),
        zoom,
    }
}

/// Size of the crop box in display space.
fn crop_box(display: &DisplayGeometry, aspect_ratio: f64) -> (f64, f64) {
    let width = display.width.min(display.height * aspect_ratio);
    (width, width / aspect_ratio)
}

fn visible_window(
    selection: &CropSelection,
    display: &DisplayGeometry,
    aspect_ratio: f64,
) -> Window {
    let zoom = sanitize_zoom(selection.zoom);
    let (box_w, box_h) = crop_box(display, sanitize_aspect_ratio(aspect_ratio));

    let width = box_w / zoom;
    let height = box_h / zoom;
    let max_x = (display.width - width).max(0.0);
    let max_y = (display.height - height).max(0.0);

    let x = (display.width - width) / 2.0 - finite_or_zero(selection.offset.x) / zoom;
    let y = (display.height - height) / 2.0 - finite_or_zero(selection.offset.y) / zoom;

    Window {
        x: x.clamp(0.0, max_x),
        y: y.clamp(0.0, max_y),
        width,
        height,
    }
}

fn effective_display(display: &DisplayGeometry, native: Size) -> DisplayGeometry {
    if display.is_valid() {
        *display
    } else {
        DisplayGeometry::native(native)
    }
}

fn round_px(value: f64) -> u32 {
    // Float-to-int casts saturate and map NaN to zero.
    value.round().max(0.0) as u32
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(
        offset: (f64, f64),
        zoom: f64,
        display: (f64, f64),
        native: (u32, u32),
        aspect: f64,
    ) -> CropRegion {
        compute_crop_region(
            &CropSelection::new(offset.0, offset.1, zoom),
            &DisplayGeometry::new(display.0, display.1),
            Size::new(native.0, native.1),
            aspect,
        )
    }

    #[test]
    fn test_centered_square_on_landscape() {
        let r = region((0.0, 0.0), 1.0, (400.0, 300.0), (4000, 3000), 1.0);
        assert_eq!(r, CropRegion::new(500, 0, 3000, 3000));
    }

    #[test]
    fn test_centered_square_on_portrait() {
        let r = region((0.0, 0.0), 1.0, (300.0, 400.0), (3000, 4000), 1.0);
        assert_eq!(r, CropRegion::new(0, 500, 3000, 3000));
    }

    #[test]
    fn test_wide_aspect_on_landscape() {
        // 16:9 box inside a 4:3 image is limited by width
        let r = region((0.0, 0.0), 1.0, (400.0, 300.0), (4000, 3000), 16.0 / 9.0);
        assert_eq!(r.width, 4000);
        assert_eq!(r.height, 2250);
        assert_eq!(r.x, 0);
        assert_eq!(r.y, 375);
    }

    #[test]
    fn test_zoom_shrinks_region_around_center() {
        let r = region((0.0, 0.0), 2.0, (400.0, 300.0), (4000, 3000), 1.0);
        assert_eq!(r, CropRegion::new(1250, 750, 1500, 1500));
    }

    #[test]
    fn test_pan_moves_window_opposite_to_offset() {
        // Image dragged 20px right at zoom 2: window moves 10 display px left
        let r = region((20.0, 0.0), 2.0, (400.0, 300.0), (4000, 3000), 1.0);
        assert_eq!(r, CropRegion::new(1150, 750, 1500, 1500));
    }

    #[test]
    fn test_over_pan_clamps_to_edges() {
        let left = region((10_000.0, 10_000.0), 2.0, (400.0, 300.0), (4000, 3000), 1.0);
        assert_eq!((left.x, left.y), (0, 0));

        let right = region((-10_000.0, -10_000.0), 2.0, (400.0, 300.0), (4000, 3000), 1.0);
        assert_eq!(right.right(), 4000);
        assert_eq!(right.bottom(), 3000);
        assert_eq!(right.size(), Size::new(1500, 1500));
    }

    #[test]
    fn test_pan_without_room_is_ignored() {
        // At zoom 1 the square box already spans the full height
        let r = region((0.0, 50.0), 1.0, (400.0, 300.0), (4000, 3000), 1.0);
        assert_eq!(r.y, 0);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let under = region((0.0, 0.0), 0.25, (400.0, 300.0), (4000, 3000), 1.0);
        let at_min = region((0.0, 0.0), MIN_ZOOM, (400.0, 300.0), (4000, 3000), 1.0);
        assert_eq!(under, at_min);

        let over = region((0.0, 0.0), 50.0, (400.0, 300.0), (4000, 3000), 1.0);
        let at_max = region((0.0, 0.0), MAX_ZOOM, (400.0, 300.0), (4000, 3000), 1.0);
        assert_eq!(over, at_max);
        assert_eq!(at_max.width, 1000);
    }

    #[test]
    fn test_nan_inputs_fall_back() {
        let r = region((f64::NAN, f64::INFINITY), f64::NAN, (400.0, 300.0), (4000, 3000), f64::NAN);
        assert_eq!(r, CropRegion::new(500, 0, 3000, 3000));
    }

    #[test]
    fn test_invalid_display_uses_native_size() {
        let r = region((0.0, 0.0), 1.0, (0.0, 300.0), (40, 30), 1.0);
        assert_eq!(r, CropRegion::new(5, 0, 30, 30));
    }

    #[test]
    fn test_anisotropic_display_keeps_independent_scales() {
        // Native 4:3 image squeezed into a square display
        let r = region((0.0, 0.0), 1.0, (300.0, 300.0), (4000, 3000), 1.0);
        assert_eq!(r, CropRegion::new(0, 0, 4000, 3000));
        assert!((r.aspect_ratio() - 1.0).abs() > 0.01);
    }

    #[test]
    fn test_tiny_native_image_keeps_minimum_size() {
        let r = region((0.0, 0.0), 3.0, (400.0, 300.0), (2, 1), 1.0);
        assert!(r.width >= 1 && r.height >= 1);
        assert!(r.fits_within(Size::new(2, 1)));
    }

    #[test]
    fn test_zero_native_size_is_treated_as_one_pixel() {
        let r = region((0.0, 0.0), 1.0, (400.0, 300.0), (0, 0), 1.0);
        assert_eq!(r, CropRegion::new(0, 0, 1, 1));
    }

    #[test]
    fn test_aspect_within_tolerance_at_odd_zoom() {
        let aspect = 16.0 / 9.0;
        let r = region((13.0, -7.0), 1.7, (400.0, 300.0), (4000, 3000), aspect);
        assert!((r.aspect_ratio() - aspect).abs() < 0.01);
    }

    #[test]
    fn test_fit_within_landscape_container() {
        let g = DisplayGeometry::fit_within(Size::new(4000, 3000), 512.0, 320.0);
        assert!((g.width - 426.666_666).abs() < 1e-3);
        assert!((g.height - 320.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_within_upscales_small_images() {
        let g = DisplayGeometry::fit_within(Size::new(100, 50), 400.0, 400.0);
        assert_eq!(g, DisplayGeometry::new(400.0, 200.0));
    }

    #[test]
    fn test_fit_within_degenerate() {
        assert!(!DisplayGeometry::fit_within(Size::new(0, 10), 100.0, 100.0).is_valid());
        assert!(!DisplayGeometry::fit_within(Size::new(10, 10), 0.0, 100.0).is_valid());
    }

    #[test]
    fn test_clamp_selection_limits_offset() {
        let display = DisplayGeometry::new(400.0, 300.0);
        let clamped = clamp_selection(&CropSelection::new(500.0, -500.0, 2.0), &display, 1.0);

        // (400 * 2 - 300) / 2 = 250, (300 * 2 - 300) / 2 = 150
        assert_eq!(clamped.offset, Point::new(250.0, -150.0));
        assert_eq!(clamped.zoom, 2.0);
    }

    #[test]
    fn test_clamp_selection_matches_region_clamping() {
        let display = DisplayGeometry::new(400.0, 300.0);
        let native = Size::new(4000, 3000);
        let wild = CropSelection::new(900.0, 900.0, 2.0);
        let clamped = clamp_selection(&wild, &display, 1.0);

        assert_eq!(
            compute_crop_region(&wild, &display, native, 1.0),
            compute_crop_region(&clamped, &display, native, 1.0)
        );
    }

    #[test]
    fn test_clamp_to_bounds() {
        let bounds = Size::new(100, 80);
        assert_eq!(
            CropRegion::new(90, 70, 50, 50).clamp_to(bounds),
            CropRegion::new(50, 30, 50, 50)
        );
        assert_eq!(
            CropRegion::new(0, 0, 500, 0).clamp_to(bounds),
            CropRegion::new(0, 0, 100, 1)
        );
        let inside = CropRegion::new(10, 10, 20, 20);
        assert_eq!(inside.clamp_to(bounds), inside);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
