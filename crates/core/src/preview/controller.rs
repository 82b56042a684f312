//! Interactive photo positioning state.

use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

use super::geometry::{FrameLayout, MIN_SCALE, PhotoPosition, auto_fit_scale};

/// Tracks the photo position through loads, drags, zoom, and rotation.
///
/// The controller is serializable so a server can keep it in the session
/// between pointer events. Every operation returns the resulting position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviewController {
    layout: FrameLayout,
    image: Option<Size>,
    position: PhotoPosition,
    /// Pointer minus offset at drag start.
    drag_anchor: Option<Vec2>,
}

impl PreviewController {
    #[must_use]
    pub fn new(layout: FrameLayout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    /// Resume from a stored position.
    #[must_use]
    pub fn with_state(layout: FrameLayout, image: Option<Size>, position: PhotoPosition) -> Self {
        Self {
            layout,
            image,
            position,
            drag_anchor: None,
        }
    }

    #[must_use]
    pub const fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    #[must_use]
    pub const fn image(&self) -> Option<Size> {
        self.image
    }

    #[must_use]
    pub const fn position(&self) -> PhotoPosition {
        self.position
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    fn fitted_scale(&self, image: Size) -> f64 {
        auto_fit_scale(self.layout.photo_area().size(), image).max(MIN_SCALE)
    }

    /// Load a photo and fit it to the photo area. Offset and rotation are kept.
    pub fn load_image(&mut self, image: Size) -> PhotoPosition {
        self.image = Some(image);
        self.drag_anchor = None;
        self.position.scale = self.fitted_scale(image);
        self.position
    }

    /// Remove the photo; the position resets.
    pub fn clear_image(&mut self) -> PhotoPosition {
        self.image = None;
        self.drag_anchor = None;
        self.position = PhotoPosition::default();
        self.position
    }

    /// Switch layouts, re-fitting the photo if the photo area changed.
    pub fn set_layout(&mut self, layout: FrameLayout) -> PhotoPosition {
        let changed = self.layout.aperture_differs(&layout);
        self.layout = layout;
        if changed && let Some(image) = self.image {
            self.position.scale = self.fitted_scale(image);
        }
        self.position
    }

    /// Start a drag at `pointer`. Ignored when no photo is loaded.
    pub fn begin_drag(&mut self, pointer: Point) -> PhotoPosition {
        let anchor = pointer.to_vec2() - self.position.offset();
        if self.image.is_some() && anchor.is_finite() {
            self.drag_anchor = Some(anchor);
        }
        self.position
    }

    /// Move the photo so it stays under the pointer.
    pub fn drag_to(&mut self, pointer: Point) -> PhotoPosition {
        if let Some(offset) = self.drag_anchor.map(|anchor| pointer.to_vec2() - anchor)
            && offset.is_finite()
        {
            self.position.x = offset.x;
            self.position.y = offset.y;
        }
        self.position
    }

    /// End a drag (pointer released or left the canvas).
    pub fn end_drag(&mut self) -> PhotoPosition {
        self.drag_anchor = None;
        self.position
    }

    pub fn set_scale(&mut self, scale: f64) -> PhotoPosition {
        self.position.scale = PhotoPosition::clamp_scale(scale);
        self.position
    }

    pub fn set_rotation(&mut self, degrees: f64) -> PhotoPosition {
        self.position.rotation = PhotoPosition::clamp_rotation(degrees);
        self.position
    }

    /// Back to center, unscaled, unrotated.
    pub fn reset(&mut self) -> PhotoPosition {
        self.drag_anchor = None;
        self.position = PhotoPosition::default();
        self.position
    }
}
