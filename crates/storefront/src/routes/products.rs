//! Product detail page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use framecraft_core::ProductId;
use framecraft_core::catalog::{FrameColor, FrameSize};
use tower_sessions::Session;
use tracing::instrument;

use super::home::ProductCard;
use crate::db::CatalogRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::models::Flash;
use crate::state::AppState;

/// How many same-style products to suggest.
const RELATED_LIMIT: usize = 4;

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductCard,
    pub sizes: Vec<FrameSize>,
    pub colors: Vec<FrameColor>,
    pub related: Vec<ProductCard>,
    pub flashes: Vec<Flash>,
}

/// Display a product with its available options.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<ProductShowTemplate> {
    let repo = CatalogRepository::new(state.pool());
    let product = repo
        .active_product(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    let options = state.catalog_options().await?;

    let related = repo
        .active_products()
        .await?
        .iter()
        .filter(|p| p.id != product.id && p.style == product.style)
        .take(RELATED_LIMIT)
        .map(ProductCard::from)
        .collect();

    Ok(ProductShowTemplate {
        product: ProductCard::from(&product),
        sizes: options.sizes.clone(),
        colors: options.colors.clone(),
        related,
        flashes: Flash::take_all(&session).await,
    })
}
