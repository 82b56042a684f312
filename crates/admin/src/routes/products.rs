//! Product catalog management.

use askama::Template;
use askama_web::WebTemplate;
use axum::Form;
use axum::extract::{Multipart, Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use framecraft_core::assets::{content_type, product_image_path, validate_upload};
use framecraft_core::catalog::Product;
use framecraft_core::filter::ProductFilter;
use framecraft_core::{FrameMaterial, FrameStyle, Price, ProductId};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::db::{ProductInput, ProductRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::filters;
use crate::models::Flash;
use crate::state::AppState;

/// Multipart field carrying the image.
const IMAGE_FIELD: &str = "image";

/// List query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub style: Option<String>,
}

/// A row in the product table.
#[derive(Debug, Clone)]
pub struct ProductRow {
    pub id: i32,
    pub name: String,
    pub style: &'static str,
    pub material: &'static str,
    pub price: String,
    pub stock_quantity: i32,
    pub is_active: bool,
    pub is_featured: bool,
    pub image_url: Option<String>,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            style: product.style.label(),
            material: product.material.label(),
            price: Price::usd(product.base_price).display(),
            stock_quantity: product.stock_quantity,
            is_active: product.is_active,
            is_featured: product.is_featured,
            image_url: product.image_url.clone(),
        }
    }
}

/// A `<select>` option.
#[derive(Debug, Clone)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

fn style_choices() -> Vec<Choice> {
    FrameStyle::ALL
        .iter()
        .map(|s| Choice {
            value: s.as_str(),
            label: s.label(),
        })
        .collect()
}

fn material_choices() -> Vec<Choice> {
    FrameMaterial::ALL
        .iter()
        .map(|m| Choice {
            value: m.as_str(),
            label: m.label(),
        })
        .collect()
}

/// Products list page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub current_path: &'static str,
    pub products: Vec<ProductRow>,
    pub total: usize,
    pub search: String,
    pub style: String,
    pub styles: Vec<Choice>,
    pub flashes: Vec<Flash>,
}

/// Products list page handler.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ProductQuery>,
) -> Result<ProductsIndexTemplate> {
    let products = ProductRepository::new(state.pool()).list().await?;
    let filter =
        ProductFilter::from_query(query.search.as_deref(), query.style.as_deref(), None, None)
            .including_inactive();
    let rows: Vec<ProductRow> = filter
        .apply(&products)
        .into_iter()
        .map(ProductRow::from)
        .collect();

    Ok(ProductsIndexTemplate {
        current_path: "/products",
        products: rows,
        total: products.len(),
        search: query.search.unwrap_or_default(),
        style: query.style.unwrap_or_default(),
        styles: style_choices(),
        flashes: Flash::take_all(&session).await,
    })
}

/// Submitted product fields, all as typed by the operator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub base_price: String,
    pub style: String,
    pub material: String,
    #[serde(default)]
    pub stock_quantity: String,
    /// Checkbox: present as `on` when ticked.
    pub is_active: Option<String>,
    pub is_featured: Option<String>,
}

impl ProductForm {
    /// Validate into repository input.
    ///
    /// # Errors
    ///
    /// Returns a message for the first invalid field.
    pub fn parse(&self) -> std::result::Result<ProductInput, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Name is required".to_string());
        }
        let base_price: Decimal = self
            .base_price
            .trim()
            .trim_start_matches('$')
            .parse()
            .map_err(|_| format!("Base price '{}' is not a number", self.base_price))?;
        if base_price.is_sign_negative() {
            return Err("Base price cannot be negative".to_string());
        }
        let style: FrameStyle = self.style.parse()?;
        let material: FrameMaterial = self.material.parse()?;
        let stock_quantity = match self.stock_quantity.trim() {
            "" => 0,
            raw => raw
                .parse::<i32>()
                .ok()
                .filter(|n| *n >= 0)
                .ok_or_else(|| format!("Stock '{raw}' must be a whole number, 0 or more"))?,
        };
        let description = self.description.trim();

        Ok(ProductInput {
            name: name.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            base_price,
            style,
            material,
            is_active: self.is_active.is_some(),
            is_featured: self.is_featured.is_some(),
            stock_quantity,
        })
    }
}

impl From<&Product> for ProductForm {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            base_price: product.base_price.to_string(),
            style: product.style.as_str().to_string(),
            material: product.material.as_str().to_string(),
            stock_quantity: product.stock_quantity.to_string(),
            is_active: product.is_active.then(|| "on".to_string()),
            is_featured: product.is_featured.then(|| "on".to_string()),
        }
    }
}

/// Create/edit product form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub current_path: &'static str,
    /// `None` for a new product.
    pub product_id: Option<i32>,
    pub image_url: Option<String>,
    pub form: ProductForm,
    pub error: Option<String>,
    pub styles: Vec<Choice>,
    pub materials: Vec<Choice>,
    pub flashes: Vec<Flash>,
}

impl ProductFormTemplate {
    fn new(product_id: Option<i32>, form: ProductForm, flashes: Vec<Flash>) -> Self {
        Self {
            current_path: "/products",
            product_id,
            image_url: None,
            form,
            error: None,
            styles: style_choices(),
            materials: material_choices(),
            flashes,
        }
    }

    fn action(&self) -> String {
        self.product_id
            .map_or_else(|| "/products".to_string(), |id| format!("/products/{id}"))
    }
}

/// Blank form for a new product.
#[instrument(skip(session))]
pub async fn new(session: Session) -> ProductFormTemplate {
    let form = ProductForm {
        style: FrameStyle::default().as_str().to_string(),
        material: FrameMaterial::default().as_str().to_string(),
        stock_quantity: "0".to_string(),
        is_active: Some("on".to_string()),
        ..ProductForm::default()
    };
    ProductFormTemplate::new(None, form, Flash::take_all(&session).await)
}

/// Create a product; invalid input re-renders the form with the values kept.
#[instrument(skip(state, session, form), fields(name = %form.name))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let input = match form.parse() {
        Ok(input) => input,
        Err(message) => {
            let mut page = ProductFormTemplate::new(None, form, Vec::new());
            page.error = Some(message);
            return Ok(page.into_response());
        }
    };

    let product = ProductRepository::new(state.pool()).create(&input).await?;
    tracing::info!(product_id = %product.id, "Product created");
    Flash::success(format!("Created {}", product.name))
        .push(&session)
        .await;
    Ok(Redirect::to(&format!("/products/{}/edit", product.id)).into_response())
}

/// Edit form for an existing product.
#[instrument(skip(state, session))]
pub async fn edit(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<ProductFormTemplate> {
    let product = ProductRepository::new(state.pool())
        .get(ProductId::new(id))
        .await?;
    let mut page = ProductFormTemplate::new(
        Some(id),
        ProductForm::from(&product),
        Flash::take_all(&session).await,
    );
    page.image_url = product.image_url;
    Ok(page)
}

/// Save edits to a product.
#[instrument(skip(state, session, form))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let repo = ProductRepository::new(state.pool());
    let input = match form.parse() {
        Ok(input) => input,
        Err(message) => {
            let existing = repo.get(ProductId::new(id)).await?;
            let mut page = ProductFormTemplate::new(Some(id), form, Vec::new());
            page.image_url = existing.image_url;
            page.error = Some(message);
            return Ok(page.into_response());
        }
    };

    let product = repo.update(ProductId::new(id), &input).await?;
    tracing::info!(product_id = %product.id, "Product updated");
    Flash::success(format!("Saved {}", product.name))
        .push(&session)
        .await;
    Ok(Redirect::to(&format!("/products/{id}/edit")).into_response())
}

/// Delete a product. Products on existing orders cannot be deleted.
#[instrument(skip(state, session))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    match ProductRepository::new(state.pool())
        .delete(ProductId::new(id))
        .await
    {
        Ok(product) => {
            tracing::info!(product_id = %product.id, "Product deleted");
            if let Some(url) = &product.image_url {
                remove_stored_image(&state, url).await;
            }
            Flash::success(format!("Deleted {}", product.name))
                .push(&session)
                .await;
        }
        Err(RepositoryError::Conflict(constraint)) => {
            tracing::info!(product_id = id, %constraint, "Product still referenced");
            Flash::error("This product appears on orders; mark it inactive instead.")
                .push(&session)
                .await;
            return Ok(Redirect::to(&format!("/products/{id}/edit")));
        }
        Err(e) => return Err(e.into()),
    }
    Ok(Redirect::to("/products"))
}

/// Replace a product's image.
///
/// The old object is removed after the row points at the new one; if that
/// removal fails the product is still updated and a warning is shown.
#[instrument(skip(state, session, multipart))]
pub async fn upload_image(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    mut multipart: Multipart,
) -> Result<Redirect> {
    let back = Redirect::to(&format!("/products/{id}/edit"));
    let repo = ProductRepository::new(state.pool());
    // 404 before touching storage
    repo.get(ProductId::new(id)).await?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        upload = Some((file_name, bytes));
    }
    let (file_name, bytes) = upload.unwrap_or_default();

    let ext = match validate_upload(&file_name, bytes.len(), state.config().max_upload_bytes) {
        Ok(ext) => ext,
        Err(e) => {
            Flash::error(e.to_string()).push(&session).await;
            return Ok(back);
        }
    };

    let path = product_image_path(chrono::Utc::now().timestamp_millis(), &ext);
    let stored = state
        .store()
        .upload(&path, bytes.to_vec(), content_type(&ext))
        .await?;
    let previous = repo
        .set_image(ProductId::new(id), &stored.public_url)
        .await?;
    tracing::info!(product_id = id, path = %stored.path, size = stored.size, "Product image uploaded");

    let old_removed = match previous.as_deref() {
        Some(url) if url != stored.public_url => remove_stored_image(&state, url).await,
        _ => true,
    };
    if old_removed {
        Flash::success("Image updated").push(&session).await;
    } else {
        Flash::warning("Image updated, but the previous file could not be removed")
            .push(&session)
            .await;
    }
    Ok(back)
}

/// Remove the object behind a public URL, if it lives in our store.
///
/// Returns `false` only when a removal was attempted and failed.
async fn remove_stored_image(state: &AppState, url: &str) -> bool {
    let Some(path) = state.store().path_from_public_url(url) else {
        tracing::debug!(%url, "Image is not in our store; leaving it");
        return true;
    };
    match state.store().remove(&[path.to_string()]).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, %path, "Failed to remove product image");
            false
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> ProductForm {
        ProductForm {
            name: "  Walnut Gallery Frame ".to_string(),
            description: String::new(),
            base_price: "$49.50".to_string(),
            style: "classic".to_string(),
            material: "wood".to_string(),
            stock_quantity: "12".to_string(),
            is_active: Some("on".to_string()),
            is_featured: None,
        }
    }

    #[test]
    fn test_parse_valid_form() {
        let input = form().parse().unwrap();
        assert_eq!(input.name, "Walnut Gallery Frame");
        assert_eq!(input.description, None);
        assert_eq!(input.base_price, Decimal::new(4950, 2));
        assert_eq!(input.style, FrameStyle::Classic);
        assert_eq!(input.material, FrameMaterial::Wood);
        assert_eq!(input.stock_quantity, 12);
        assert!(input.is_active);
        assert!(!input.is_featured);
    }

    #[test]
    fn test_parse_rejects_bad_fields() {
        let mut bad = form();
        bad.name = "   ".to_string();
        assert_eq!(bad.parse().unwrap_err(), "Name is required");

        let mut bad = form();
        bad.base_price = "cheap".to_string();
        assert!(bad.parse().unwrap_err().contains("not a number"));

        let mut bad = form();
        bad.base_price = "-1".to_string();
        assert!(bad.parse().is_err());

        let mut bad = form();
        bad.style = "baroque".to_string();
        assert_eq!(bad.parse().unwrap_err(), "invalid frame style: baroque");

        let mut bad = form();
        bad.stock_quantity = "-3".to_string();
        assert!(bad.parse().is_err());
    }

    #[test]
    fn test_blank_stock_is_zero() {
        let mut f = form();
        f.stock_quantity = " ".to_string();
        assert_eq!(f.parse().unwrap().stock_quantity, 0);
    }

    #[test]
    fn test_form_action() {
        let page = ProductFormTemplate::new(None, form(), Vec::new());
        assert_eq!(page.action(), "/products");
        let page = ProductFormTemplate::new(Some(7), form(), Vec::new());
        assert_eq!(page.action(), "/products/7");
    }
}
