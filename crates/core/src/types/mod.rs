//! Core types for Framecraft.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod color;
pub mod id;
pub mod price;
pub mod status;

pub use color::{ColorError, HexColor};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use status::*;
