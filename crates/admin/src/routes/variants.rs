//! Bulk variant generation and per-product variant editing.
//!
//! The generator form posts repeated checkbox fields (`size_ids=1&size_ids=3`),
//! so bodies are decoded with `form_urlencoded` directly rather than through
//! `Form`, which cannot collect repeated keys.

use askama::Template;
use askama_web::WebTemplate;
use axum::Form;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::response::Redirect;
use framecraft_core::catalog::CatalogOptions;
use framecraft_core::pricing::variant_price;
use framecraft_core::variants::{
    DEFAULT_STOCK, LARGE_BATCH, MAX_BATCH, VariantCategory, VariantPlanError, VariantSelection,
};
use framecraft_core::{Price, ProductId, VariantId};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use url::form_urlencoded;

use crate::db::{OptionsRepository, ProductRepository, VariantRepository, VariantRow};
use crate::error::Result;
use crate::filters;
use crate::models::Flash;
use crate::models::session::keys;
use crate::state::AppState;

/// Decoded generator form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorForm {
    pub selection: VariantSelection,
    /// Raw stock field; blank means [`DEFAULT_STOCK`].
    pub default_stock: String,
}

impl GeneratorForm {
    /// Decode a urlencoded body. Unparseable ids are ignored.
    #[must_use]
    pub fn parse(body: &[u8]) -> Self {
        let mut product_id = None;
        let mut default_stock = String::new();
        let mut checked: Vec<(VariantCategory, i32)> = Vec::new();

        for (key, value) in form_urlencoded::parse(body) {
            match key.as_ref() {
                "product_id" => product_id = value.trim().parse().ok().map(ProductId::new),
                "default_stock" => default_stock = value.trim().to_string(),
                field => {
                    if let Some(category) =
                        VariantCategory::ALL.into_iter().find(|c| c.field() == field)
                        && let Ok(id) = value.trim().parse::<i32>()
                    {
                        checked.push((category, id));
                    }
                }
            }
        }

        let mut selection = VariantSelection::new(product_id);
        for category in VariantCategory::ALL {
            selection.select_all(
                category,
                checked
                    .iter()
                    .filter(|(c, _)| *c == category)
                    .map(|(_, id)| *id),
            );
        }
        Self {
            selection,
            default_stock,
        }
    }

    /// # Errors
    ///
    /// Returns a message if the field is not a whole number.
    pub fn stock(&self) -> std::result::Result<i32, String> {
        if self.default_stock.is_empty() {
            return Ok(DEFAULT_STOCK);
        }
        self.default_stock
            .parse()
            .map_err(|_| format!("Default stock '{}' is not a whole number", self.default_stock))
    }
}

/// One checkbox in an option group.
#[derive(Debug, Clone)]
pub struct OptionBox {
    pub id: i32,
    pub name: String,
    pub checked: bool,
}

/// A fieldset of checkboxes for one category.
#[derive(Debug, Clone)]
pub struct OptionGroup {
    pub field: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub options: Vec<OptionBox>,
}

fn option_groups(options: &CatalogOptions, selection: &VariantSelection) -> Vec<OptionGroup> {
    VariantCategory::ALL
        .into_iter()
        .map(|category| {
            let choices: Vec<(i32, &str)> = match category {
                VariantCategory::AspectRatios => options
                    .aspect_ratios
                    .iter()
                    .map(|a| (a.id.as_i32(), a.name.as_str()))
                    .collect(),
                VariantCategory::Orientations => options
                    .orientations
                    .iter()
                    .map(|o| (o.id.as_i32(), o.name.as_str()))
                    .collect(),
                VariantCategory::Sizes => options
                    .sizes
                    .iter()
                    .map(|s| (s.id.as_i32(), s.display_name.as_str()))
                    .collect(),
                VariantCategory::Colors => options
                    .colors
                    .iter()
                    .map(|c| (c.id.as_i32(), c.name.as_str()))
                    .collect(),
                VariantCategory::Thicknesses => options
                    .thicknesses
                    .iter()
                    .map(|t| (t.id.as_i32(), t.name.as_str()))
                    .collect(),
                VariantCategory::Mattings => options
                    .mattings
                    .iter()
                    .map(|m| (m.id.as_i32(), m.name.as_str()))
                    .collect(),
            };
            OptionGroup {
                field: category.field(),
                label: category.label(),
                required: category.is_required(),
                options: choices
                    .into_iter()
                    .map(|(id, name)| OptionBox {
                        id,
                        name: name.to_string(),
                        checked: selection.is_selected(category, id),
                    })
                    .collect(),
            }
        })
        .collect()
}

/// The live count shown under the generator form.
#[derive(Debug, Clone, Template, WebTemplate)]
#[template(path = "variants/estimate.html")]
pub struct EstimateTemplate {
    pub count: usize,
    pub large: bool,
    pub too_large: bool,
    /// First blocking problem with the selection, if any.
    pub problem: Option<String>,
}

impl EstimateTemplate {
    #[must_use]
    pub fn for_selection(selection: &VariantSelection) -> Self {
        let count = selection.estimated_count();
        let problem = match selection.plan(DEFAULT_STOCK) {
            Err(e @ (VariantPlanError::NoProduct | VariantPlanError::MissingCategory(_))) => {
                Some(e.to_string())
            }
            _ => None,
        };
        Self {
            count,
            large: count > LARGE_BATCH,
            too_large: count > MAX_BATCH,
            problem,
        }
    }
}

/// A product in the generator's product picker.
#[derive(Debug, Clone)]
pub struct ProductChoice {
    pub id: i32,
    pub name: String,
    pub selected: bool,
}

/// Variant generator page template.
#[derive(Template, WebTemplate)]
#[template(path = "variants/generator.html")]
pub struct GeneratorTemplate {
    pub current_path: &'static str,
    pub products: Vec<ProductChoice>,
    pub product_id: Option<i32>,
    pub groups: Vec<OptionGroup>,
    pub default_stock: String,
    pub estimate: EstimateTemplate,
    pub flashes: Vec<Flash>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GeneratorQuery {
    pub product_id: Option<i32>,
}

/// Generator form; restores the last submitted selection for this session.
#[instrument(skip(state, session))]
pub async fn generator(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<GeneratorQuery>,
) -> Result<GeneratorTemplate> {
    let options = OptionsRepository::new(state.pool()).all().await?.active_only();
    let products = ProductRepository::new(state.pool()).list().await?;

    let saved: Option<GeneratorForm> = session
        .remove::<(VariantSelection, String)>(keys::VARIANT_SELECTION)
        .await?
        .map(|(selection, default_stock)| GeneratorForm {
            selection,
            default_stock,
        });
    let mut form = saved.unwrap_or_else(|| GeneratorForm {
        selection: VariantSelection::new(None),
        default_stock: DEFAULT_STOCK.to_string(),
    });
    if let Some(id) = query.product_id {
        form.selection.product_id = Some(ProductId::new(id));
    }
    let product_id = form.selection.product_id.map(|id| id.as_i32());

    Ok(GeneratorTemplate {
        current_path: "/variants",
        products: products
            .iter()
            .map(|p| ProductChoice {
                id: p.id.as_i32(),
                name: p.name.clone(),
                selected: Some(p.id.as_i32()) == product_id,
            })
            .collect(),
        product_id,
        groups: option_groups(&options, &form.selection),
        default_stock: form.default_stock,
        estimate: EstimateTemplate::for_selection(&form.selection),
        flashes: Flash::take_all(&session).await,
    })
}

/// Recount as checkboxes change (HTMX fragment).
#[instrument(skip(body))]
pub async fn estimate(body: Bytes) -> EstimateTemplate {
    EstimateTemplate::for_selection(&GeneratorForm::parse(&body).selection)
}

/// Insert every combination, skipping ones that already exist.
#[instrument(skip(state, session, body))]
pub async fn generate(
    State(state): State<AppState>,
    session: Session,
    body: Bytes,
) -> Result<Redirect> {
    let form = GeneratorForm::parse(&body);
    let retry = |form: &GeneratorForm| {
        let query = form
            .selection
            .product_id
            .map(|id| format!("?product_id={id}"))
            .unwrap_or_default();
        Redirect::to(&format!("/variants{query}"))
    };

    let plan = match form.stock().and_then(|stock| {
        form.selection
            .plan(stock)
            .map_err(|e| e.to_string())
    }) {
        Ok(plan) => plan,
        Err(message) => {
            tracing::info!(%message, "Variant plan rejected");
            session
                .insert(
                    keys::VARIANT_SELECTION,
                    (&form.selection, &form.default_stock),
                )
                .await?;
            Flash::error(message).push(&session).await;
            return Ok(retry(&form));
        }
    };
    let Some(product_id) = form.selection.product_id else {
        return Ok(retry(&form));
    };
    // 404 for a product deleted since the form loaded
    ProductRepository::new(state.pool()).get(product_id).await?;

    let summary = VariantRepository::new(state.pool())
        .insert_plan(&plan.variants)
        .await?;
    tracing::info!(
        product_id = %product_id,
        requested = summary.requested,
        inserted = summary.inserted,
        skipped = summary.skipped,
        large = plan.large,
        "Variants generated"
    );
    Flash::success(summary.message()).push(&session).await;
    Ok(Redirect::to(&format!("/variants/product/{product_id}")))
}

/// A row in the per-product variant table.
#[derive(Debug, Clone)]
pub struct VariantView {
    pub id: i32,
    pub sku: String,
    pub aspect_ratio: String,
    pub orientation: String,
    pub size: String,
    pub color: String,
    pub thickness: String,
    pub matting: String,
    pub stock_quantity: i32,
    pub price_override: String,
    /// Effective price, or `None` if an option has been retired.
    pub price: Option<String>,
}

impl VariantView {
    fn new(row: VariantRow, base_price: Decimal, options: &CatalogOptions) -> Self {
        let price = variant_price(base_price, &row.variant, options)
            .ok()
            .map(|p| Price::usd(p).display());
        Self {
            id: row.variant.id.as_i32(),
            sku: row.variant.sku.unwrap_or_default(),
            aspect_ratio: row.aspect_ratio_name,
            orientation: row.orientation_name,
            size: row.size_name,
            color: row.color_name,
            thickness: row.thickness_name,
            matting: row.matting_name.unwrap_or_else(|| "None".to_string()),
            stock_quantity: row.variant.stock_quantity,
            price_override: row
                .variant
                .price_override
                .map(|p| p.to_string())
                .unwrap_or_default(),
            price,
        }
    }
}

/// Per-product variant list template.
#[derive(Template, WebTemplate)]
#[template(path = "variants/list.html")]
pub struct VariantListTemplate {
    pub current_path: &'static str,
    pub product_id: i32,
    pub product_name: String,
    pub base_price: String,
    pub variants: Vec<VariantView>,
    pub flashes: Vec<Flash>,
}

/// All variants of one product.
#[instrument(skip(state, session))]
pub async fn list(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<VariantListTemplate> {
    let product = ProductRepository::new(state.pool())
        .get(ProductId::new(id))
        .await?;
    let options = OptionsRepository::new(state.pool()).all().await?;
    let rows = VariantRepository::new(state.pool())
        .list_for_product(product.id)
        .await?;

    Ok(VariantListTemplate {
        current_path: "/variants",
        product_id: id,
        product_name: product.name,
        base_price: Price::usd(product.base_price).display(),
        variants: rows
            .into_iter()
            .map(|row| VariantView::new(row, product.base_price, &options))
            .collect(),
        flashes: Flash::take_all(&session).await,
    })
}

/// Inline edit of one variant.
#[derive(Debug, Clone, Deserialize)]
pub struct VariantEditForm {
    pub stock_quantity: String,
    #[serde(default)]
    pub price_override: String,
}

impl VariantEditForm {
    /// # Errors
    ///
    /// Returns a message for a negative or non-numeric field.
    pub fn parse(&self) -> std::result::Result<(i32, Option<Decimal>), String> {
        let stock = self
            .stock_quantity
            .trim()
            .parse::<i32>()
            .ok()
            .filter(|n| *n >= 0)
            .ok_or_else(|| format!("Stock '{}' must be 0 or more", self.stock_quantity))?;
        let price = match self.price_override.trim().trim_start_matches('$') {
            "" => None,
            raw => Some(
                raw.parse::<Decimal>()
                    .ok()
                    .filter(|p| !p.is_sign_negative())
                    .ok_or_else(|| format!("Price '{raw}' must be a positive amount"))?,
            ),
        };
        Ok((stock, price))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BackQuery {
    pub product_id: Option<i32>,
}

fn back_to(product_id: Option<i32>) -> Redirect {
    product_id.map_or_else(
        || Redirect::to("/variants"),
        |id| Redirect::to(&format!("/variants/product/{id}")),
    )
}

/// Save stock and price override.
#[instrument(skip(state, session, form))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Query(back): Query<BackQuery>,
    Form(form): Form<VariantEditForm>,
) -> Result<Redirect> {
    let (stock, price) = match form.parse() {
        Ok(values) => values,
        Err(message) => {
            Flash::error(message).push(&session).await;
            return Ok(back_to(back.product_id));
        }
    };
    let variant = VariantRepository::new(state.pool())
        .update(VariantId::new(id), stock, price)
        .await?;
    tracing::info!(variant_id = id, stock, "Variant updated");
    Flash::success(format!(
        "Updated {}",
        variant.sku.as_deref().unwrap_or("variant")
    ))
    .push(&session)
    .await;
    Ok(back_to(Some(variant.product_id.as_i32())))
}

/// Delete one variant.
#[instrument(skip(state, session))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    let variant = VariantRepository::new(state.pool())
        .delete(VariantId::new(id))
        .await?;
    tracing::info!(variant_id = id, "Variant deleted");
    Flash::success(format!(
        "Deleted {}",
        variant.sku.as_deref().unwrap_or("variant")
    ))
    .push(&session)
    .await;
    Ok(back_to(Some(variant.product_id.as_i32())))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repeated_checkboxes() {
        let form = GeneratorForm::parse(
            b"product_id=4&aspect_ratio_ids=1&orientation_ids=1&orientation_ids=2\
              &size_ids=3&size_ids=3&color_ids=5&thickness_ids=2&default_stock=",
        );
        let s = &form.selection;
        assert_eq!(s.product_id, Some(ProductId::new(4)));
        assert_eq!(s.selected(VariantCategory::Orientations), &[1, 2]);
        // Duplicates collapse
        assert_eq!(s.selected(VariantCategory::Sizes), &[3]);
        assert!(s.selected(VariantCategory::Mattings).is_empty());
        assert_eq!(s.estimated_count(), 2);
        assert_eq!(form.stock().unwrap(), DEFAULT_STOCK);
    }

    #[test]
    fn test_parse_ignores_junk() {
        let form = GeneratorForm::parse(b"size_ids=abc&unknown=1&default_stock=12");
        assert!(form.selection.selected(VariantCategory::Sizes).is_empty());
        assert_eq!(form.selection.product_id, None);
        assert_eq!(form.stock().unwrap(), 12);

        let form = GeneratorForm::parse(b"default_stock=lots");
        assert!(form.stock().is_err());
    }

    #[test]
    fn test_estimate_reports_first_problem() {
        let estimate = EstimateTemplate::for_selection(&VariantSelection::new(None));
        assert_eq!(estimate.count, 1);
        assert_eq!(
            estimate.problem.as_deref(),
            Some("Please select a product first")
        );

        let form = GeneratorForm::parse(b"product_id=1&aspect_ratio_ids=1");
        let estimate = EstimateTemplate::for_selection(&form.selection);
        assert_eq!(
            estimate.problem.as_deref(),
            Some("Please select at least one option from Orientations")
        );
    }

    #[test]
    fn test_estimate_flags_large_batches() {
        let mut selection = VariantSelection::new(Some(ProductId::new(1)));
        selection.select_all(VariantCategory::AspectRatios, 1..=5);
        selection.select_all(VariantCategory::Orientations, 1..=2);
        selection.select_all(VariantCategory::Sizes, 1..=10);
        selection.select_all(VariantCategory::Colors, 1..=12);
        selection.select_all(VariantCategory::Thicknesses, [1]);

        let estimate = EstimateTemplate::for_selection(&selection);
        assert_eq!(estimate.count, 1200);
        assert!(estimate.large);
        assert!(!estimate.too_large);
        assert_eq!(estimate.problem, None);
    }

    #[test]
    fn test_variant_edit_form() {
        let form = VariantEditForm {
            stock_quantity: "8".to_string(),
            price_override: " $72.50 ".to_string(),
        };
        assert_eq!(form.parse().unwrap(), (8, Some(Decimal::new(7250, 2))));

        let cleared = VariantEditForm {
            stock_quantity: "0".to_string(),
            price_override: String::new(),
        };
        assert_eq!(cleared.parse().unwrap(), (0, None));

        let negative = VariantEditForm {
            stock_quantity: "-1".to_string(),
            price_override: String::new(),
        };
        assert!(negative.parse().is_err());
    }
}
