//! Session-held state for the admin panel.

pub mod flash;
pub mod session;

pub use flash::{Flash, FlashLevel};
