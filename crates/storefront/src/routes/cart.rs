//! Cart route handlers.
//!
//! Quantity changes and removals use HTMX: they return the cart items
//! fragment and trigger `cart-updated` so the header badge refreshes.
//! Plain form posts redirect back to the cart page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use framecraft_core::{CartItemId, Price};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::db::{CartLine, CartRepository};
use crate::error::Result;
use crate::filters;
use crate::models::Flash;
use crate::models::session::existing_cart_token;
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: i32,
    pub product_name: String,
    pub size: String,
    pub frame: String,
    pub matting: Option<String>,
    pub glass: &'static str,
    pub image_url: Option<String>,
    pub special_instructions: Option<String>,
    pub quantity: i32,
    pub price: String,
    pub line_price: String,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        let frame = [line.color_name.as_deref(), line.thickness_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            id: line.item.id.as_i32(),
            product_name: line.product_name.clone(),
            size: line.size_label(),
            frame,
            matting: line.matting_name.clone(),
            glass: line.item.glass_type.label(),
            image_url: line.item.custom_image_url.clone(),
            special_instructions: line.item.special_instructions.clone(),
            quantity: line.item.quantity,
            price: line.unit_price(),
            line_price: line.line_total(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: i32,
}

impl CartView {
    #[must_use]
    pub fn empty() -> Self {
        Self::from_lines(&[])
    }

    #[must_use]
    pub fn from_lines(lines: &[CartLine]) -> Self {
        let subtotal: Decimal = lines.iter().map(|l| l.item.line_total()).sum();
        Self {
            items: lines.iter().map(CartItemView::from).collect(),
            subtotal: Price::usd(subtotal).display(),
            item_count: lines.iter().map(|l| l.item.quantity).sum(),
        }
    }
}

/// Load the visitor's cart. Visitors without a cart token have an empty cart.
///
/// # Errors
///
/// Returns `AppError::Database` if the query fails.
pub async fn load_cart(state: &AppState, session: &Session) -> Result<CartView> {
    let Some(token) = existing_cart_token(session).await else {
        return Ok(CartView::empty());
    };
    let lines = CartRepository::new(state.pool()).lines(&token).await?;
    Ok(CartView::from_lines(&lines))
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub item_id: i32,
    pub quantity: i32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub item_id: i32,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub flashes: Vec<Flash>,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: i64,
}

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<CartShowTemplate> {
    Ok(CartShowTemplate {
        cart: load_cart(&state, &session).await?,
        flashes: Flash::take_all(&session).await,
    })
}

/// Whether the request came from HTMX rather than a plain form post.
fn is_htmx(headers: &HeaderMap) -> bool {
    headers.get("hx-request").is_some_and(|v| v == "true")
}

/// The items fragment for HTMX, or a redirect back to the cart page.
async fn cart_response(state: &AppState, session: &Session, headers: &HeaderMap) -> Result<Response> {
    if !is_htmx(headers) {
        return Ok(Redirect::to("/cart").into_response());
    }
    let cart = load_cart(state, session).await?;
    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate { cart },
    )
        .into_response())
}

/// Update a line's quantity (HTMX).
///
/// Quantities are clamped to 1..=99; use remove to delete a line.
#[instrument(skip(state, session, headers))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    if let Some(token) = existing_cart_token(&session).await {
        CartRepository::new(state.pool())
            .update_quantity(&token, CartItemId::new(form.item_id), form.quantity)
            .await?;
    }
    cart_response(&state, &session, &headers).await
}

/// Remove a line (HTMX).
#[instrument(skip(state, session, headers))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    if let Some(token) = existing_cart_token(&session).await {
        CartRepository::new(state.pool())
            .remove(&token, CartItemId::new(form.item_id))
            .await?;
        tracing::info!(cart_item_id = form.item_id, "Cart line removed");
    }
    cart_response(&state, &session, &headers).await
}

/// Cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Result<CartCountTemplate> {
    let count = match existing_cart_token(&session).await {
        Some(token) => CartRepository::new(state.pool()).count(&token).await?,
        None => 0,
    };
    Ok(CartCountTemplate { count })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use framecraft_core::catalog::CartItem;
    use framecraft_core::{GlassType, ProductId};

    use super::*;

    fn line(id: i32, quantity: i32, cents: i64) -> CartLine {
        CartLine {
            item: CartItem {
                id: CartItemId::new(id),
                session_id: "token".to_string(),
                product_id: ProductId::new(1),
                photo_id: None,
                size_id: None,
                custom_width_inches: None,
                custom_height_inches: None,
                color_id: None,
                thickness_id: None,
                matting_id: None,
                glass_type: GlassType::AntiGlare,
                custom_image_url: None,
                special_instructions: None,
                quantity,
                unit_price: Decimal::new(cents, 2),
                created_at: Utc::now(),
            },
            product_name: "Gallery Frame".to_string(),
            size_name: Some("8x10".to_string()),
            color_name: Some("Walnut".to_string()),
            thickness_name: None,
            matting_name: None,
        }
    }

    #[test]
    fn test_cart_view_totals() {
        let cart = CartView::from_lines(&[line(1, 2, 4550), line(2, 1, 1000)]);
        assert_eq!(cart.subtotal, "$101.00");
        assert_eq!(cart.item_count, 3);
        assert_eq!(cart.items.first().map(|i| i.frame.as_str()), Some("Walnut"));
        assert_eq!(cart.items.first().map(|i| i.glass), Some("Anti-glare glass"));
    }

    #[test]
    fn test_empty_cart() {
        let cart = CartView::empty();
        assert!(cart.items.is_empty());
        assert_eq!(cart.subtotal, "$0.00");
    }

    #[test]
    fn test_is_htmx() {
        let mut headers = HeaderMap::new();
        assert!(!is_htmx(&headers));
        headers.insert("hx-request", axum::http::HeaderValue::from_static("true"));
        assert!(is_htmx(&headers));
    }
}
