//! Frame layout and photo placement math.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

use crate::types::OrientationCode;

/// Preview pixels per inch of frame or mat width.
pub const PX_PER_INCH: f64 = 20.0;

/// Frame width used before a thickness is chosen (one inch).
pub const DEFAULT_FRAME_WIDTH: f64 = 20.0;

pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 3.0;
pub const SCALE_STEP: f64 = 0.1;
pub const MAX_ROTATION: f64 = 180.0;

/// Preview canvas size for an orientation.
#[must_use]
pub const fn canvas_size(orientation: OrientationCode) -> Size {
    match orientation {
        OrientationCode::Portrait => Size::new(400.0, 500.0),
        OrientationCode::Landscape => Size::new(500.0, 400.0),
        OrientationCode::Square => Size::new(450.0, 450.0),
    }
}

/// Shrink `rect` by `amount` on every side without inverting it.
fn inset_saturating(rect: Rect, amount: f64) -> Rect {
    let amount = amount.max(0.0);
    let center = rect.center();
    Rect::new(
        (rect.x0 + amount).min(center.x),
        (rect.y0 + amount).min(center.y),
        (rect.x1 - amount).max(center.x),
        (rect.y1 - amount).max(center.y),
    )
}

/// Nested regions of a framed preview: frame ring, mat ring, photo area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameLayout {
    pub canvas: Size,
    /// Frame ring width in pixels.
    pub frame_width: f64,
    /// Mat ring width in pixels, if a mat is chosen.
    pub mat_thickness: Option<f64>,
}

impl Default for FrameLayout {
    fn default() -> Self {
        Self {
            canvas: canvas_size(OrientationCode::Portrait),
            frame_width: DEFAULT_FRAME_WIDTH,
            mat_thickness: None,
        }
    }
}

impl FrameLayout {
    #[must_use]
    pub const fn new(canvas: Size, frame_width: f64, mat_thickness: Option<f64>) -> Self {
        Self {
            canvas,
            frame_width,
            mat_thickness,
        }
    }

    /// Layout from physical option sizes in inches.
    #[must_use]
    pub fn from_inches(
        orientation: OrientationCode,
        frame_width_inches: Option<f64>,
        mat_inches: Option<f64>,
    ) -> Self {
        Self {
            canvas: canvas_size(orientation),
            frame_width: frame_width_inches.map_or(DEFAULT_FRAME_WIDTH, |w| w * PX_PER_INCH),
            mat_thickness: mat_inches.map(|m| m * PX_PER_INCH),
        }
    }

    #[must_use]
    pub fn outer(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.canvas)
    }

    /// Inside edge of the frame ring.
    #[must_use]
    pub fn opening(&self) -> Rect {
        inset_saturating(self.outer(), self.frame_width)
    }

    /// Where the photo shows through the mat.
    #[must_use]
    pub fn photo_area(&self) -> Rect {
        inset_saturating(self.opening(), self.mat_thickness.unwrap_or(0.0))
    }

    #[must_use]
    pub fn has_mat(&self) -> bool {
        self.mat_thickness.is_some_and(|m| m > 0.0)
    }

    /// Whether two layouts give the photo a different area.
    #[must_use]
    pub fn aperture_differs(&self, other: &Self) -> bool {
        self.photo_area() != other.photo_area()
    }
}

/// Largest scale at which `image` fits inside `area`, never above 1.
///
/// Degenerate images get a scale of 1; a degenerate area gives 0.
#[must_use]
pub fn auto_fit_scale(area: Size, image: Size) -> f64 {
    if image.width <= 0.0 || image.height <= 0.0 {
        return 1.0;
    }
    let fit = (area.width / image.width)
        .min(area.height / image.height)
        .min(1.0);
    fit.max(0.0)
}

/// Offset, zoom, and rotation of the photo inside the photo area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhotoPosition {
    /// Horizontal offset from the photo area center, in pixels.
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    /// Degrees, clockwise.
    pub rotation: f64,
}

impl Default for PhotoPosition {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            rotation: 0.0,
        }
    }
}

impl PhotoPosition {
    #[must_use]
    pub fn clamp_scale(scale: f64) -> f64 {
        if scale.is_finite() {
            scale.clamp(MIN_SCALE, MAX_SCALE)
        } else {
            1.0
        }
    }

    #[must_use]
    pub fn clamp_rotation(degrees: f64) -> f64 {
        if degrees.is_finite() {
            degrees.clamp(-MAX_ROTATION, MAX_ROTATION)
        } else {
            0.0
        }
    }

    /// Replace non-finite fields so the position always serializes.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let finite_or_zero = |v: f64| if v.is_finite() { v } else { 0.0 };
        Self {
            x: finite_or_zero(self.x),
            y: finite_or_zero(self.y),
            scale: Self::clamp_scale(self.scale),
            rotation: Self::clamp_rotation(self.rotation),
        }
    }

    #[must_use]
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Map image pixel coordinates onto the canvas.
    ///
    /// The image is centered on the origin, scaled, rotated, then moved to
    /// the photo area center plus the offset.
    #[must_use]
    pub fn transform(&self, area_center: Point, image: Size) -> Affine {
        Affine::translate(area_center.to_vec2() + self.offset())
            * Affine::rotate(self.rotation.to_radians())
            * Affine::scale(self.scale)
            * Affine::translate((-image.width / 2.0, -image.height / 2.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_default_layout_regions() {
        let layout = FrameLayout::default();
        assert_eq!(layout.opening(), Rect::new(20.0, 20.0, 380.0, 480.0));
        assert_eq!(layout.photo_area(), layout.opening());
        assert!(!layout.has_mat());
    }

    #[test]
    fn test_mat_insets_photo_area() {
        let layout = FrameLayout::from_inches(OrientationCode::Landscape, Some(1.5), Some(2.0));
        assert_eq!(layout.canvas, Size::new(500.0, 400.0));
        assert_eq!(layout.opening(), Rect::new(30.0, 30.0, 470.0, 370.0));
        assert_eq!(layout.photo_area(), Rect::new(70.0, 70.0, 430.0, 330.0));
    }

    #[test]
    fn test_insets_saturate() {
        let layout = FrameLayout::new(Size::new(100.0, 60.0), 40.0, Some(40.0));
        let area = layout.photo_area();
        assert!(area.width() >= 0.0);
        assert!(approx(area.height(), 0.0));
        assert_eq!(area.center(), Point::new(50.0, 30.0));
    }

    #[test]
    fn test_auto_fit_never_upscales() {
        assert!(approx(
            auto_fit_scale(Size::new(360.0, 460.0), Size::new(100.0, 100.0)),
            1.0
        ));
        assert!(approx(
            auto_fit_scale(Size::new(360.0, 460.0), Size::new(720.0, 460.0)),
            0.5
        ));
        assert!(approx(
            auto_fit_scale(Size::new(360.0, 460.0), Size::new(0.0, 10.0)),
            1.0
        ));
    }

    #[test]
    fn test_clamps() {
        assert!(approx(PhotoPosition::clamp_scale(0.01), MIN_SCALE));
        assert!(approx(PhotoPosition::clamp_scale(9.0), MAX_SCALE));
        assert!(approx(PhotoPosition::clamp_rotation(-270.0), -180.0));
        assert!(approx(PhotoPosition::clamp_rotation(f64::NAN), 0.0));
    }

    #[test]
    fn test_transform_centers_image() {
        let position = PhotoPosition {
            x: 10.0,
            y: -5.0,
            scale: 0.5,
            rotation: 90.0,
        };
        let affine = position.transform(Point::new(200.0, 250.0), Size::new(100.0, 40.0));
        let center = affine * Point::new(50.0, 20.0);
        assert!(approx(center.x, 210.0));
        assert!(approx(center.y, 245.0));
        // Top-left corner: (-25, -10) rotated 90deg clockwise -> (10, -25)
        let corner = affine * Point::ZERO;
        assert!(approx(corner.x, 220.0));
        assert!(approx(corner.y, 220.0));
    }
}
