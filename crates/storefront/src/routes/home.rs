//! Catalog home page: the product grid with filters.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use framecraft_core::catalog::Product;
use framecraft_core::filter::{PriceBand, ProductFilter, ProductSort};
use framecraft_core::{FrameStyle, Price};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::db::CatalogRepository;
use crate::error::Result;
use crate::filters;
use crate::models::Flash;
use crate::state::AppState;

/// Product card data for templates.
#[derive(Clone)]
pub struct ProductCard {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image_url: Option<String>,
    pub style: &'static str,
    pub material: &'static str,
    pub is_featured: bool,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: Price::usd(product.base_price).display(),
            image_url: product.image_url.clone(),
            style: product.style.label(),
            material: product.material.label(),
            is_featured: product.is_featured,
        }
    }
}

/// A `<select>` choice.
#[derive(Clone)]
pub struct FilterOption {
    pub code: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Catalog filter query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub search: Option<String>,
    pub style: Option<String>,
    pub price: Option<String>,
    pub sort: Option<String>,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub products: Vec<ProductCard>,
    pub search: String,
    pub styles: Vec<FilterOption>,
    pub prices: Vec<FilterOption>,
    pub sorts: Vec<FilterOption>,
    pub filtered: bool,
    pub flashes: Vec<Flash>,
}

/// Display the catalog home page.
#[instrument(skip(state, session))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CatalogQuery>,
) -> Result<HomeTemplate> {
    let filter = ProductFilter::from_query(
        query.search.as_deref(),
        query.style.as_deref(),
        query.price.as_deref(),
        query.sort.as_deref(),
    );
    let products = CatalogRepository::new(state.pool()).active_products().await?;
    let products: Vec<ProductCard> = filter
        .apply(&products)
        .into_iter()
        .map(ProductCard::from)
        .collect();
    tracing::debug!(count = products.len(), "Catalog filtered");

    Ok(HomeTemplate {
        products,
        search: query.search.unwrap_or_default(),
        styles: FrameStyle::ALL
            .iter()
            .map(|style| FilterOption {
                code: style.as_str(),
                label: style.label(),
                selected: filter.style == Some(*style),
            })
            .collect(),
        prices: price_options(filter.price_band),
        sorts: ProductSort::ALL
            .iter()
            .map(|sort| FilterOption {
                code: sort.code(),
                label: sort.label(),
                selected: filter.sort == *sort,
            })
            .collect(),
        filtered: filter != ProductFilter::default(),
        flashes: Flash::take_all(&session).await,
    })
}

/// Price band choices with the current one marked.
#[must_use]
pub fn price_options(current: Option<PriceBand>) -> Vec<FilterOption> {
    PriceBand::ALL
        .iter()
        .map(|band| FilterOption {
            code: band.code(),
            label: band.label(),
            selected: current == Some(*band),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use framecraft_core::{FrameMaterial, ProductId};
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_product_card() {
        let product = Product {
            id: ProductId::new(4),
            name: "Oak Classic".to_string(),
            description: None,
            base_price: Decimal::new(4950, 2),
            image_url: None,
            style: FrameStyle::Classic,
            material: FrameMaterial::Wood,
            is_active: true,
            is_featured: false,
            popularity_score: 0,
            stock_quantity: 10,
            created_at: Utc::now(),
        };
        let card = ProductCard::from(&product);
        assert_eq!(card.id, 4);
        assert_eq!(card.price, "$49.50");
        assert_eq!(card.style, "Classic");
        assert_eq!(card.description, "");
    }

    #[test]
    fn test_price_options_marks_current() {
        let options = price_options(Some(PriceBand::ALL[1]));
        assert_eq!(options.len(), PriceBand::ALL.len());
        assert_eq!(options.iter().filter(|o| o.selected).count(), 1);
        assert!(options.get(1).is_some_and(|o| o.selected));
        assert!(price_options(None).iter().all(|o| !o.selected));
    }
}
