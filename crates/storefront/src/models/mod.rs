//! Session-held state for storefront visitors.

pub mod flash;
pub mod session;

pub use flash::{Flash, FlashLevel};
pub use session::keys as session_keys;
