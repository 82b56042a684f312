//! Framecraft Core - Domain library for the framing storefront.
//!
//! This crate provides the types and rules shared by all Framecraft components:
//! - `storefront` - Public catalog, customization wizard, and cart
//! - `admin` - Back-office for products, frame assets, and variants
//! - `cli` - Command-line tools for migrations and catalog seeding
//!
//! # Architecture
//!
//! Everything except [`storage`] is pure: no database access and no HTTP.
//! The preview renderer works on in-memory images so it can run inside a
//! blocking task of either server, or in tests.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, colors, and status enums
//! - [`catalog`] - Catalog records (products, option sets, assets, variants)
//! - [`pricing`] - Price calculation from selected options
//! - [`wizard`] - The five-step customization flow and its draft state
//! - [`preview`] - Frame/mat/photo layout, positioning, and compositing
//! - [`filter`] - Gallery and product filters
//! - [`variants`] - Bulk variant planning across option sets
//! - [`assets`] - Object paths and upload validation
//! - [`storage`] - Object storage backends (feature `storage`)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod assets;
pub mod catalog;
pub mod filter;
pub mod preview;
pub mod pricing;
#[cfg(feature = "storage")]
pub mod storage;
pub mod types;
pub mod variants;
pub mod wizard;

pub use types::*;
