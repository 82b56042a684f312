//! Frame preview engine.
//!
//! A preview is three nested regions on a fixed canvas: the frame ring, an
//! optional mat ring, and the photo area. The photo is positioned by a
//! [`PhotoPosition`] (offset from the photo area center, zoom, rotation) and
//! clipped to the photo area when rendered.
//!
//! - [`geometry`] - layout regions, auto-fit, and the photo transform
//! - [`controller`] - drag/zoom/rotate state machine
//! - [`render`] - CPU compositing to RGBA and PNG

pub mod controller;
pub mod geometry;
pub mod render;

use thiserror::Error;

pub use controller::PreviewController;
pub use geometry::{FrameLayout, PhotoPosition, auto_fit_scale, canvas_size};
pub use image::RgbaImage;
pub use render::{
    FrameFill, PreviewScene, decode_photo, encode_png, preview_dimensions, probe_dimensions,
    render,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreviewError {
    #[error("could not decode image: {0}")]
    Decode(String),
    #[error("could not encode preview: {0}")]
    Encode(String),
}
