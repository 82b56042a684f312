//! Checkout: turns the cart into a pending order. No payment is taken.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use framecraft_core::Price;
use framecraft_core::catalog::ShippingAddress;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::cart::{CartView, load_cart};
use crate::db::{OrderRepository, RepositoryError};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::models::Flash;
use crate::models::session::existing_cart_token;
use crate::state::AppState;

/// Checkout form data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub line1: String,
    #[serde(default)]
    pub line2: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
}

impl CheckoutForm {
    /// The trimmed email and address, or the list of problems.
    ///
    /// # Errors
    ///
    /// Returns one message per missing or malformed field.
    pub fn validate(&self) -> std::result::Result<(String, ShippingAddress), Vec<String>> {
        let mut errors = Vec::new();
        let email = self.email.trim();
        if !is_plausible_email(email) {
            errors.push("Please enter a valid email address".to_string());
        }
        let mut required = |value: &str, label: &str| {
            let value = value.trim();
            if value.is_empty() {
                errors.push(format!("{label} is required"));
            }
            value.to_string()
        };
        let address = ShippingAddress {
            name: required(&self.name, "Name"),
            line1: required(&self.line1, "Address"),
            line2: Some(self.line2.trim().to_string()).filter(|l| !l.is_empty()),
            city: required(&self.city, "City"),
            region: required(&self.region, "State / region"),
            postal_code: required(&self.postal_code, "Postal code"),
            country: required(&self.country, "Country"),
        };
        if errors.is_empty() {
            Ok((email.to_string(), address))
        } else {
            Err(errors)
        }
    }
}

/// One `@` with text on both sides and a dot in the domain.
fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub cart: CartView,
    pub form: CheckoutForm,
    pub errors: Vec<String>,
    pub flashes: Vec<Flash>,
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirmation.html")]
pub struct ConfirmationTemplate {
    pub order_number: String,
    pub email: String,
    pub address: ShippingAddress,
    pub status: &'static str,
    pub total: String,
    pub flashes: Vec<Flash>,
}

/// Display the checkout form.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Response> {
    let cart = load_cart(&state, &session).await?;
    if cart.items.is_empty() {
        Flash::info("Your cart is empty.").push(&session).await;
        return Ok(Redirect::to("/cart").into_response());
    }
    Ok(CheckoutTemplate {
        cart,
        form: CheckoutForm::default(),
        errors: Vec::new(),
        flashes: Flash::take_all(&session).await,
    }
    .into_response())
}

/// Place the order.
#[instrument(skip(state, session, form))]
pub async fn place_order(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let Some(token) = existing_cart_token(&session).await else {
        Flash::info("Your cart is empty.").push(&session).await;
        return Ok(Redirect::to("/cart").into_response());
    };
    let (email, address) = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => {
            return Ok(CheckoutTemplate {
                cart: load_cart(&state, &session).await?,
                form,
                errors,
                flashes: Vec::new(),
            }
            .into_response());
        }
    };

    let order = match OrderRepository::new(state.pool())
        .create_from_cart(&token, &email, &address)
        .await
    {
        Ok(order) => order,
        Err(RepositoryError::NotFound) => {
            Flash::info("Your cart is empty.").push(&session).await;
            return Ok(Redirect::to("/cart").into_response());
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(
        order_number = %order.order_number,
        total = %order.total_amount,
        "Order placed"
    );
    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("order_number", &order.order_number)]),
    );
    Ok(Redirect::to(&format!("/checkout/confirmation/{}", order.order_number)).into_response())
}

/// Show a placed order.
#[instrument(skip(state, session))]
pub async fn confirmation(
    State(state): State<AppState>,
    session: Session,
    Path(order_number): Path<String>,
) -> Result<ConfirmationTemplate> {
    let token = existing_cart_token(&session)
        .await
        .ok_or_else(|| AppError::NotFound(format!("order {order_number}")))?;
    let order = OrderRepository::new(state.pool())
        .get_for_session(&order_number, &token)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {order_number}")))?;

    Ok(ConfirmationTemplate {
        order_number: order.order_number,
        email: order.email,
        address: order.shipping_address,
        status: order.status.as_str(),
        total: Price::usd(order.total_amount).display(),
        flashes: Flash::take_all(&session).await,
    })
}
