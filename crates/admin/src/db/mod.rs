//! Database operations for the admin panel.
//!
//! The admin works on the same catalog database as the storefront.
//!
//! ## Tables written
//!
//! - `products` - Catalog products and their images
//! - `frame_assets` - Frame texture images, one per ratio/color/thickness
//! - `product_variants` - Generated option combinations
//! - `tower_sessions.admin_session` - Admin session storage
//!
//! # Migrations
//!
//! Migrations live with the storefront in `crates/storefront/migrations/` and
//! run via:
//! ```bash
//! cargo run -p framecraft-cli -- migrate
//! ```

pub mod assets;
pub mod options;
pub mod products;
pub mod variants;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use assets::AssetRepository;
pub use options::OptionsRepository;
pub use products::{ProductInput, ProductRepository};
pub use variants::{VariantRepository, VariantRow};

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

    /// Constraint violation (e.g., duplicate SKU or a row still referenced).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// `23505` unique violation, `23503` foreign key violation.
const CONFLICT_CODES: [&str; 2] = ["23505", "23503"];

impl RepositoryError {
    /// Classify a sqlx error, turning constraint violations into `Conflict`.
    #[must_use]
    pub fn from_write(err: sqlx::Error) -> Self {
        if let Some(db) = err.as_database_error()
            && db.code().is_some_and(|c| CONFLICT_CODES.contains(&c.as_ref()))
        {
            return Self::Conflict(
                db.constraint()
                    .map_or_else(|| db.message().to_string(), String::from),
            );
        }
        Self::Database(err)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
