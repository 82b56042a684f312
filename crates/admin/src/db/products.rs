//! Product CRUD.

use framecraft_core::catalog::Product;
use framecraft_core::{FrameMaterial, FrameStyle, ProductId};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::RepositoryError;

const PRODUCT_COLUMNS: &str = "id, name, description, base_price, image_url, style, material, \
     is_active, is_featured, popularity_score, stock_quantity, created_at";

/// Editable product fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInput {
    pub name: String,
    pub description: Option<String>,
    pub base_price: Decimal,
    pub style: FrameStyle,
    pub material: FrameMaterial,
    pub is_active: bool,
    pub is_featured: bool,
    pub stock_quantity: i32,
}

pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every product, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(products)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if there is no such product.
    pub async fn get(&self, id: ProductId) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &ProductInput) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(&format!(
            r"
            INSERT INTO products
                (name, description, base_price, style, material, is_active, is_featured,
                 stock_quantity)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(&input.name)
        .bind(input.description.as_deref())
        .bind(input.base_price)
        .bind(input.style)
        .bind(input.material)
        .bind(input.is_active)
        .bind(input.is_featured)
        .bind(input.stock_quantity)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::from_write)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if there is no such product.
    pub async fn update(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(&format!(
            r"
            UPDATE products
            SET name = $2, description = $3, base_price = $4, style = $5, material = $6,
                is_active = $7, is_featured = $8, stock_quantity = $9, updated_at = now()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&input.name)
        .bind(input.description.as_deref())
        .bind(input.base_price)
        .bind(input.style)
        .bind(input.material)
        .bind(input.is_active)
        .bind(input.is_featured)
        .bind(input.stock_quantity)
        .fetch_optional(self.pool)
        .await
        .map_err(RepositoryError::from_write)?
        .ok_or(RepositoryError::NotFound)
    }

    /// Point the product at a new image, returning the previous URL.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if there is no such product.
    pub async fn set_image(
        &self,
        id: ProductId,
        image_url: &str,
    ) -> Result<Option<String>, RepositoryError> {
        let previous: Option<Option<String>> = sqlx::query_scalar(
            r"
            UPDATE products p
            SET image_url = $2, updated_at = now()
            FROM (SELECT image_url FROM products WHERE id = $1 FOR UPDATE) old
            WHERE p.id = $1
            RETURNING old.image_url
            ",
        )
        .bind(id)
        .bind(image_url)
        .fetch_optional(self.pool)
        .await?;
        previous.ok_or(RepositoryError::NotFound)
    }

    /// Delete a product and its variants.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if carts or orders still reference
    /// the product, or `RepositoryError::NotFound` if it does not exist.
    pub async fn delete(&self, id: ProductId) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(&format!(
            "DELETE FROM products WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(RepositoryError::from_write)?
        .ok_or(RepositoryError::NotFound)
    }
}
