//! Session-related types and helpers.
//!
//! Visitors are anonymous. Each session gets a random cart token on first
//! use; carts, uploaded photos, and orders are keyed by it.

use tower_sessions::Session;
use uuid::Uuid;

/// Session keys for storefront state.
pub mod keys {
    /// Random token identifying this visitor's cart and uploads.
    pub const CART_TOKEN: &str = "cart_token";

    /// Pending flash notifications.
    pub const FLASH: &str = "flash";

    /// Prefix for an in-progress drag: `preview_drag:{product_id}`.
    pub const PREVIEW_DRAG_PREFIX: &str = "preview_drag";
}

/// The visitor's cart token, if one has been issued.
pub async fn existing_cart_token(session: &Session) -> Option<String> {
    session
        .get::<String>(keys::CART_TOKEN)
        .await
        .ok()
        .flatten()
}

/// The visitor's cart token, issuing a new one on first use.
///
/// # Errors
///
/// Returns the session store error if the new token cannot be saved.
pub async fn cart_token(session: &Session) -> Result<String, tower_sessions::session::Error> {
    if let Some(token) = existing_cart_token(session).await {
        return Ok(token);
    }
    let token = Uuid::new_v4().simple().to_string();
    session.insert(keys::CART_TOKEN, &token).await?;
    Ok(token)
}
