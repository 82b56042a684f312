//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Catalog home (product grid with filters)
//! GET  /gallery                - Customer gallery with filters
//! GET  /products/{id}          - Product detail
//!
//! # Customization wizard
//! GET  /customize/{id}                - Resume at the draft's current step
//! GET  /customize/{id}/step/{step}    - Show a step (go-to)
//! POST /customize/{id}/photo          - Upload photo (multipart, rate limited)
//! POST /customize/{id}/size           - Save size step
//! POST /customize/{id}/frame          - Save frame step
//! POST /customize/{id}/style          - Save style step
//! POST /customize/{id}/next           - Next step
//! POST /customize/{id}/prev           - Previous step
//! POST /customize/{id}/position       - Drag/scale/rotate/reset (JSON, rate limited)
//! GET  /customize/{id}/preview.png    - Rendered preview
//! POST /customize/{id}/add-to-cart    - Finish and add to cart
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/update            - Update quantity (returns cart_items fragment)
//! POST /cart/remove            - Remove item (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout                              - Shipping form
//! POST /checkout                              - Place a pending order
//! GET  /checkout/confirmation/{order_number}  - Order confirmation
//! ```

pub mod cart;
pub mod checkout;
pub mod customize;
pub mod gallery;
pub mod home;
pub mod products;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::middleware::{interaction_rate_limiter, upload_rate_limiter};
use crate::state::AppState;

/// Multipart framing on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new().route("/{id}", get(products::show))
}

/// Create the wizard routes router.
///
/// `max_upload_bytes` bounds the photo upload body.
pub fn customize_routes(max_upload_bytes: usize) -> Router<AppState> {
    let upload = Router::new()
        .route("/{id}/photo", post(customize::forms::upload_photo))
        .layer(DefaultBodyLimit::max(max_upload_bytes + MULTIPART_OVERHEAD))
        .route_layer(upload_rate_limiter());

    let interaction = Router::new()
        .route("/{id}/position", post(customize::position::update))
        .route_layer(interaction_rate_limiter());

    Router::new()
        .route("/{id}", get(customize::start))
        .route("/{id}/step/{step}", get(customize::show_step))
        .route("/{id}/size", post(customize::forms::size))
        .route("/{id}/frame", post(customize::forms::frame))
        .route("/{id}/style", post(customize::forms::style))
        .route("/{id}/next", post(customize::next))
        .route("/{id}/prev", post(customize::prev))
        .route("/{id}/preview.png", get(customize::position::preview_png))
        .route("/{id}/add-to-cart", post(customize::add_to_cart))
        .merge(upload)
        .merge(interaction)
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show).post(checkout::place_order))
        .route("/confirmation/{order_number}", get(checkout::confirmation))
}

/// Create all routes for the storefront.
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/", get(home::home))
        .route("/gallery", get(gallery::index))
        .nest("/products", product_routes())
        // Wizard
        .nest("/customize", customize_routes(max_upload_bytes))
        // Cart and checkout
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
}
