//! The five-step customization wizard.
//!
//! The draft for each product lives in the session under
//! `frame_wizard:{product_id}` and is restored against the current catalog
//! on every request, so options deactivated since the last visit drop out.
//! Form posts redirect back to the draft's current step; recoverable
//! problems become flash notifications.

pub mod forms;
pub mod position;
pub mod view;

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use framecraft_core::ProductId;
use framecraft_core::assets::format_file_size;
use framecraft_core::catalog::{CatalogOptions, Product};
use framecraft_core::wizard::{WizardDraft, WizardStep};
use rust_decimal::Decimal;
use tower_sessions::Session;
use tracing::instrument;

use crate::db::{CartRepository, CatalogRepository};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::{Flash, session_keys};
use crate::state::AppState;
use view::WizardTemplate;

/// A product with its restored draft.
pub struct Wizard {
    pub product: Product,
    pub options: Arc<CatalogOptions>,
    pub draft: WizardDraft,
}

impl Wizard {
    /// Load the product and its draft, starting a new draft if none exists.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the product is missing or inactive.
    pub async fn load(state: &AppState, session: &Session, id: i32) -> Result<Self> {
        let product_id = ProductId::new(id);
        let product = CatalogRepository::new(state.pool())
            .active_product(product_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
        let options = state.catalog_options().await?;

        let draft = restored_draft(session, product_id, product.base_price, &options).await?;

        Ok(Self {
            product,
            options,
            draft,
        })
    }

    /// Persist the draft.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the session store fails.
    pub async fn save(&self, session: &Session) -> Result<()> {
        session
            .insert(&WizardDraft::session_key(self.product.id), &self.draft)
            .await?;
        Ok(())
    }

    /// Forget the draft and any drag in progress.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the session store fails.
    pub async fn clear(&self, session: &Session) -> Result<()> {
        session
            .remove::<WizardDraft>(&WizardDraft::session_key(self.product.id))
            .await?;
        session
            .remove::<serde_json::Value>(&drag_key(self.product.id.as_i32()))
            .await?;
        Ok(())
    }

    /// Redirect to the draft's current step.
    #[must_use]
    pub fn redirect(&self) -> Redirect {
        Redirect::to(&step_url(self.product.id.as_i32(), self.draft.current_step))
    }
}

/// Read the stored draft and bring it up to date with `options`.
///
/// When options were dropped the customer is told once and the cleaned
/// draft is written back, so later requests do not repeat the notice.
async fn restored_draft(
    session: &Session,
    product_id: ProductId,
    base_price: Decimal,
    options: &CatalogOptions,
) -> Result<WizardDraft> {
    let key = WizardDraft::session_key(product_id);
    let mut draft = match session.get::<WizardDraft>(&key).await {
        Ok(Some(draft)) => draft,
        Ok(None) => return Ok(WizardDraft::new(product_id, base_price)),
        Err(e) => {
            tracing::warn!(error = %e, "Stored draft unreadable, starting over");
            return Ok(WizardDraft::new(product_id, base_price));
        }
    };

    let dropped = draft.restore(options, base_price);
    if !dropped.is_empty() {
        tracing::info!(?dropped, "Draft options no longer available");
        Flash::info(format!(
            "Some of your choices are no longer available and were cleared: {}.",
            dropped.join(", ")
        ))
        .push(session)
        .await;
        session.insert(&key, &draft).await?;
    }
    Ok(draft)
}

/// `/customize/{id}/step/{slug}`
#[must_use]
pub fn step_url(product_id: i32, step: WizardStep) -> String {
    format!("/customize/{product_id}/step/{}", step.slug())
}

/// Session key for an in-progress drag on this product's preview.
#[must_use]
pub fn drag_key(product_id: i32) -> String {
    format!("{}:{product_id}", session_keys::PREVIEW_DRAG_PREFIX)
}

/// Enter the wizard at the draft's current step.
#[instrument(skip(state, session))]
pub async fn start(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    let wizard = Wizard::load(&state, &session, id).await?;
    wizard.save(&session).await?;
    Ok(wizard.redirect())
}

/// Show a step. Jumping ahead to a locked step redirects to the current one.
#[instrument(skip(state, session))]
pub async fn show_step(
    State(state): State<AppState>,
    session: Session,
    Path((id, slug)): Path<(i32, String)>,
) -> Result<Response> {
    let step = WizardStep::from_slug(&slug)
        .ok_or_else(|| AppError::NotFound(format!("wizard step {slug}")))?;
    let mut wizard = Wizard::load(&state, &session, id).await?;

    if step != wizard.draft.current_step
        && let Err(e) = wizard.draft.go_to(step)
    {
        Flash::error(e.to_string()).push(&session).await;
        wizard.save(&session).await?;
        return Ok(wizard.redirect().into_response());
    }
    wizard.save(&session).await?;

    let page = WizardTemplate::build(
        &wizard.product,
        &wizard.options,
        &wizard.draft,
        format_file_size(Some(state.config().max_upload_bytes as u64)),
        Flash::take_all(&session).await,
    );
    Ok(page.into_response())
}

/// Advance to the next step if the current one is complete.
#[instrument(skip(state, session))]
pub async fn next(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    let mut wizard = Wizard::load(&state, &session, id).await?;
    if let Err(e) = wizard.draft.next() {
        Flash::error(e.to_string()).push(&session).await;
    }
    wizard.save(&session).await?;
    Ok(wizard.redirect())
}

/// Go back one step.
#[instrument(skip(state, session))]
pub async fn prev(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    let mut wizard = Wizard::load(&state, &session, id).await?;
    wizard.draft.prev();
    wizard.save(&session).await?;
    Ok(wizard.redirect())
}

/// Finish the wizard and put the framed photo in the cart.
///
/// An incomplete draft is sent back to its first incomplete step.
#[instrument(skip(state, session))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    let mut wizard = Wizard::load(&state, &session, id).await?;
    let customization = match wizard.draft.finish(&wizard.options) {
        Ok(customization) => customization,
        Err(e) => {
            Flash::error(e.to_string()).push(&session).await;
            if let Some(step) = wizard.draft.validation().first_incomplete() {
                wizard.draft.current_step = step;
            }
            wizard.save(&session).await?;
            return Ok(wizard.redirect());
        }
    };

    let token = crate::models::session::cart_token(&session).await?;
    let item_id = CartRepository::new(state.pool())
        .add(&token, &customization)
        .await?;
    wizard.clear(&session).await?;

    tracing::info!(
        cart_item_id = %item_id,
        product_id = %wizard.product.id,
        unit_price = %customization.unit_price,
        "Customization added to cart"
    );
    add_breadcrumb(
        "cart",
        "Added framed photo to cart",
        Some(&[("product_id", &wizard.product.id.to_string())]),
    );
    Flash::success(format!("{} added to your cart.", wizard.product.name))
        .push(&session)
        .await;
    Ok(Redirect::to("/cart"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use framecraft_core::FrameColorId;
    use tower_sessions::MemoryStore;

    use super::*;

    #[test]
    fn test_urls() {
        assert_eq!(step_url(7, WizardStep::Frame), "/customize/7/step/frame");
        assert_eq!(drag_key(7), "preview_drag:7");
    }

    #[tokio::test]
    async fn test_retired_option_is_reported_once() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let product_id = ProductId::new(3);
        let price = Decimal::new(40, 0);
        let mut stored = WizardDraft::new(product_id, price);
        stored.color_id = Some(FrameColorId::new(9));
        session
            .insert(&WizardDraft::session_key(product_id), &stored)
            .await
            .unwrap();

        let options = CatalogOptions::default();
        let first = restored_draft(&session, product_id, price, &options)
            .await
            .unwrap();
        assert_eq!(first.color_id, None);
        let second = restored_draft(&session, product_id, price, &options)
            .await
            .unwrap();
        assert_eq!(second, first);

        let flashes = Flash::take_all(&session).await;
        assert_eq!(flashes.len(), 1);
        assert!(flashes[0].message.contains("color"));
    }

    #[tokio::test]
    async fn test_missing_draft_starts_fresh() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let draft = restored_draft(
            &session,
            ProductId::new(3),
            Decimal::new(40, 0),
            &CatalogOptions::default(),
        )
        .await
        .unwrap();
        assert_eq!(draft, WizardDraft::new(ProductId::new(3), Decimal::new(40, 0)));
        assert!(Flash::take_all(&session).await.is_empty());
    }
}
