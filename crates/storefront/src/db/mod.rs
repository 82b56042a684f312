//! Database operations for the storefront.
//!
//! ## Tables read
//!
//! - `products`, `frame_sizes`, `frame_colors`, `frame_thicknesses`,
//!   `matting_options`, `aspect_ratios`, `frame_orientations`
//! - `gallery_items`, `frame_assets`
//!
//! ## Tables written
//!
//! - `uploaded_photos` - Customer photos from the wizard
//! - `cart_items` - Cart lines keyed by the session's cart token
//! - `orders`, `order_items` - Created at checkout
//! - `tower_sessions.session` - Tower-sessions storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p framecraft-cli -- migrate
//! ```

pub mod cart;
pub mod catalog;
pub mod gallery;
pub mod orders;
pub mod photos;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use cart::{CartLine, CartRepository};
pub use catalog::CatalogRepository;
pub use gallery::GalleryRepository;
pub use orders::OrderRepository;
pub use photos::{NewPhoto, PhotoRepository};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation.
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
