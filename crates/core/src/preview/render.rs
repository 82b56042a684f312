//! Software compositing of the framed preview.
//!
//! Regions are disjoint: each canvas pixel belongs to exactly one of the
//! frame ring, the mat ring, or the photo area, so no layer erases another.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{ImageFormat, Rgba, RgbaImage};
use kurbo::{Point, Rect, Size};

use super::PreviewError;
use super::geometry::{FrameLayout, PhotoPosition};
use crate::types::HexColor;

/// Longest side of a decoded preview photo.
pub const MAX_PREVIEW_DIMENSION: u32 = 2048;

pub type Rgba8 = [u8; 4];

/// How the frame ring is painted.
#[derive(Debug, Clone, Copy)]
pub enum FrameFill<'a> {
    Solid(HexColor),
    /// A frame asset image stretched over the whole canvas.
    Texture(&'a RgbaImage),
}

/// Everything needed to draw one preview.
#[derive(Debug, Clone, Copy)]
pub struct PreviewScene<'a> {
    pub layout: FrameLayout,
    pub frame: FrameFill<'a>,
    pub mat_color: HexColor,
    pub photo: Option<(&'a RgbaImage, PhotoPosition)>,
}

impl<'a> PreviewScene<'a> {
    #[must_use]
    pub const fn new(layout: FrameLayout, frame: FrameFill<'a>) -> Self {
        Self {
            layout,
            frame,
            mat_color: HexColor::WHITE,
            photo: None,
        }
    }

    #[must_use]
    pub const fn with_mat_color(mut self, color: HexColor) -> Self {
        self.mat_color = color;
        self
    }

    #[must_use]
    pub const fn with_photo(mut self, photo: &'a RgbaImage, position: PhotoPosition) -> Self {
        self.photo = Some((photo, position));
        self
    }
}

/// Source-over blend of straight-alpha pixels.
#[must_use]
pub fn over(dst: Rgba8, src: Rgba8) -> Rgba8 {
    let sa = u16::from(src[3]);
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }
    let inv = 255 - sa;
    let da = mul_div255(u16::from(dst[3]), inv);
    let out_a = sa + u16::from(da);
    if out_a == 0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    for (i, channel) in out.iter_mut().take(3).enumerate() {
        let s = u32::from(src.get(i).copied().unwrap_or(0)) * u32::from(sa);
        let d = u32::from(dst.get(i).copied().unwrap_or(0)) * u32::from(da);
        *channel = ((s + d + u32::from(out_a) / 2) / u32::from(out_a)).min(255) as u8;
    }
    out[3] = out_a.min(255) as u8;
    out
}

fn mul_div255(a: u16, b: u16) -> u8 {
    ((u32::from(a) * u32::from(b) + 127) / 255) as u8
}

fn sample_nearest(img: &RgbaImage, x: f64, y: f64) -> Option<Rgba8> {
    if x < 0.0 || y < 0.0 {
        return None;
    }
    let (px, py) = (x.floor() as u32, y.floor() as u32);
    if px >= img.width() || py >= img.height() {
        return None;
    }
    Some(img.get_pixel(px, py).0)
}

/// Whether `p` falls on the upload hint: an arrow over a tray, centered in
/// the photo area. Areas too small to hold it stay plain.
fn on_upload_mark(p: Point, area: Rect) -> bool {
    if area.width() < 80.0 || area.height() < 80.0 {
        return false;
    }
    let center = area.center();
    let (dx, dy) = ((p.x - center.x).abs(), p.y - center.y);
    let head = (-24.0..-8.0).contains(&dy) && dx <= dy + 24.0;
    let shaft = (-8.0..20.0).contains(&dy) && dx <= 4.0;
    let tray = (26.0..32.0).contains(&dy) && dx <= 24.0;
    head || shaft || tray
}

/// Composite a scene into an RGBA image the size of the layout canvas.
#[must_use]
pub fn render(scene: &PreviewScene<'_>) -> RgbaImage {
    let layout = scene.layout;
    let width = layout.canvas.width.round().max(1.0) as u32;
    let height = layout.canvas.height.round().max(1.0) as u32;
    let opening = layout.opening();
    let photo_area = layout.photo_area();

    let mat = scene.mat_color.to_rgba();
    let placeholder = HexColor::PLACEHOLDER.to_rgba();
    let placeholder_mark = HexColor::PLACEHOLDER_MARK.to_rgba();
    let backdrop = HexColor::WHITE.to_rgba();

    let inverse = scene.photo.map(|(img, position)| {
        let size = Size::new(f64::from(img.width()), f64::from(img.height()));
        let position = PhotoPosition {
            scale: PhotoPosition::clamp_scale(position.scale),
            ..position
        };
        (img, position.transform(photo_area.center(), size).inverse())
    });

    RgbaImage::from_fn(width, height, |x, y| {
        let p = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);

        let pixel = if !opening.contains(p) {
            match scene.frame {
                FrameFill::Solid(color) => color.to_rgba(),
                FrameFill::Texture(texture) => {
                    let tx = p.x / layout.canvas.width * f64::from(texture.width());
                    let ty = p.y / layout.canvas.height * f64::from(texture.height());
                    over(
                        HexColor::WALNUT.to_rgba(),
                        sample_nearest(texture, tx, ty).unwrap_or([0, 0, 0, 0]),
                    )
                }
            }
        } else if !photo_area.contains(p) {
            mat
        } else {
            match inverse {
                None if on_upload_mark(p, photo_area) => placeholder_mark,
                None => placeholder,
                Some((img, inv)) => {
                    let src = inv * p;
                    sample_nearest(img, src.x, src.y)
                        .map_or(backdrop, |sample| over(backdrop, sample))
                }
            }
        };
        Rgba(pixel)
    })
}

/// Encode a rendered preview as PNG.
///
/// # Errors
///
/// Returns `PreviewError::Encode` if the encoder fails.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, PreviewError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| PreviewError::Encode(e.to_string()))?;
    Ok(buf)
}

/// Decode a photo, downscaling so neither side exceeds
/// [`MAX_PREVIEW_DIMENSION`].
///
/// # Errors
///
/// Returns `PreviewError::Decode` if the bytes are not a supported image.
pub fn decode_photo(bytes: &[u8]) -> Result<RgbaImage, PreviewError> {
    let img = image::load_from_memory(bytes).map_err(|e| PreviewError::Decode(e.to_string()))?;
    let (w, h) = (img.width(), img.height());
    let (tw, th) = preview_dimensions(w, h);
    let img = if (tw, th) == (w, h) {
        img
    } else {
        img.resize_exact(tw, th, FilterType::Triangle)
    };
    Ok(img.to_rgba8())
}

/// Original pixel dimensions of an encoded image, read from its header.
///
/// # Errors
///
/// Returns `PreviewError::Decode` if the format is unknown or the header is
/// unreadable.
pub fn probe_dimensions(bytes: &[u8]) -> Result<(u32, u32), PreviewError> {
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| PreviewError::Decode(e.to_string()))?
        .into_dimensions()
        .map_err(|e| PreviewError::Decode(e.to_string()))
}

/// Dimensions of a `width`×`height` photo after preview downscaling.
#[must_use]
pub fn preview_dimensions(width: u32, height: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= MAX_PREVIEW_DIMENSION {
        return (width, height);
    }
    let ratio = f64::from(MAX_PREVIEW_DIMENSION) / f64::from(longest);
    (
        ((f64::from(width) * ratio).round() as u32).max(1),
        ((f64::from(height) * ratio).round() as u32).max(1),
    )
}
