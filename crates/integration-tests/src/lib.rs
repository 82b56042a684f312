//! Integration tests for Framecraft.
//!
//! The tests talk to running servers over HTTP, so every test is
//! `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Prepare a database with the sample catalog
//! fc-cli migrate
//! fc-cli seed catalog crates/cli/data/catalog.yaml
//!
//! # Start both servers, then
//! cargo test -p framecraft-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `storefront_catalog` - Catalog, gallery, and product pages
//! - `storefront_cart` - Wizard entry, cart fragments, and checkout guards
//! - `admin_catalog` - Admin pages and the variant estimate

use reqwest::Client;
use reqwest::redirect::Policy;
use serde::Deserialize;

/// Base URL for the storefront (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Base URL for the admin (configurable via environment).
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// A client that keeps cookies and does not follow redirects.
///
/// Each client is its own shopper: a fresh session, draft, and cart.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
#[allow(clippy::expect_used)]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// The first product id linked from a page, if any.
#[must_use]
pub fn first_product_id(html: &str) -> Option<i32> {
    html.split("href=\"/products/").skip(1).find_map(|rest| {
        let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
        digits.parse().ok()
    })
}

/// Photo position returned by the preview endpoint.
#[derive(Debug, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub rotation: f64,
}

/// Body of a positioning response.
#[derive(Debug, Deserialize)]
pub struct PositionResponse {
    pub position: Position,
    pub dragging: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_product_id() {
        let html = r#"<a href="/gallery">x</a><a href="/products/42">y</a><a href="/products/7">"#;
        assert_eq!(first_product_id(html), Some(42));
        assert_eq!(first_product_id("<p>none</p>"), None);
        assert_eq!(first_product_id(r#"<a href="/products/new">"#), None);
    }
}
