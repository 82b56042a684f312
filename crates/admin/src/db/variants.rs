//! Generated product variants.

use framecraft_core::catalog::ProductVariant;
use framecraft_core::variants::{GenerationSummary, NewVariant};
use framecraft_core::{ProductId, VariantId};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::RepositoryError;

const VARIANT_COLUMNS: &str = "v.id, v.product_id, v.aspect_ratio_id, v.orientation_id, \
     v.size_id, v.color_id, v.thickness_id, v.matting_id, v.sku, v.stock_quantity, \
     v.price_override, v.variant_image_url, v.is_active";

/// Rows per `INSERT ... SELECT FROM UNNEST`.
const INSERT_CHUNK: usize = 1000;

/// A variant with its option names.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VariantRow {
    #[sqlx(flatten)]
    pub variant: ProductVariant,
    pub aspect_ratio_name: String,
    pub orientation_name: String,
    pub size_name: String,
    pub color_name: String,
    pub thickness_name: String,
    pub matting_name: Option<String>,
}

pub struct VariantRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> VariantRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a planned batch, skipping combinations that already exist.
    ///
    /// The whole batch commits or rolls back together.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if an option id does not exist.
    pub async fn insert_plan(
        &self,
        variants: &[NewVariant],
    ) -> Result<GenerationSummary, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0usize;

        for chunk in variants.chunks(INSERT_CHUNK) {
            let column = |f: fn(&NewVariant) -> i32| chunk.iter().map(f).collect::<Vec<i32>>();
            let result = sqlx::query(
                r"
                INSERT INTO product_variants
                    (product_id, aspect_ratio_id, orientation_id, size_id, color_id,
                     thickness_id, matting_id, sku, stock_quantity)
                SELECT * FROM UNNEST(
                    $1::int4[], $2::int4[], $3::int4[], $4::int4[], $5::int4[],
                    $6::int4[], $7::int4[], $8::text[], $9::int4[]
                )
                ON CONFLICT DO NOTHING
                ",
            )
            .bind(column(|v| v.product_id.as_i32()))
            .bind(column(|v| v.aspect_ratio_id.as_i32()))
            .bind(column(|v| v.orientation_id.as_i32()))
            .bind(column(|v| v.size_id.as_i32()))
            .bind(column(|v| v.color_id.as_i32()))
            .bind(column(|v| v.thickness_id.as_i32()))
            .bind(
                chunk
                    .iter()
                    .map(|v| v.matting_id.map(|m| m.as_i32()))
                    .collect::<Vec<Option<i32>>>(),
            )
            .bind(chunk.iter().map(|v| v.sku.clone()).collect::<Vec<String>>())
            .bind(column(|v| v.stock_quantity))
            .execute(&mut *tx)
            .await
            .map_err(RepositoryError::from_write)?;
            inserted += usize::try_from(result.rows_affected()).unwrap_or(usize::MAX);
        }

        tx.commit().await?;
        Ok(GenerationSummary {
            requested: variants.len(),
            inserted,
            skipped: variants.len().saturating_sub(inserted),
        })
    }

    /// A product's variants with option names, in option order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<VariantRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, VariantRow>(&format!(
            r"
            SELECT {VARIANT_COLUMNS},
                   ar.name AS aspect_ratio_name,
                   o.name AS orientation_name,
                   s.display_name AS size_name,
                   c.name AS color_name,
                   t.name AS thickness_name,
                   m.name AS matting_name
            FROM product_variants v
            JOIN aspect_ratios ar ON ar.id = v.aspect_ratio_id
            JOIN frame_orientations o ON o.id = v.orientation_id
            JOIN frame_sizes s ON s.id = v.size_id
            JOIN frame_colors c ON c.id = v.color_id
            JOIN frame_thicknesses t ON t.id = v.thickness_id
            LEFT JOIN matting_options m ON m.id = v.matting_id
            WHERE v.product_id = $1
            ORDER BY ar.sort_order, o.id, s.sort_order, c.sort_order, t.sort_order, m.sort_order
            "
        ))
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Set stock and price override.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if there is no such variant.
    pub async fn update(
        &self,
        id: VariantId,
        stock_quantity: i32,
        price_override: Option<Decimal>,
    ) -> Result<ProductVariant, RepositoryError> {
        sqlx::query_as::<_, ProductVariant>(&format!(
            r"
            UPDATE product_variants v
            SET stock_quantity = $2, price_override = $3
            WHERE v.id = $1
            RETURNING {VARIANT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(stock_quantity)
        .bind(price_override)
        .fetch_optional(self.pool)
        .await
        .map_err(RepositoryError::from_write)?
        .ok_or(RepositoryError::NotFound)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if there is no such variant.
    pub async fn delete(&self, id: VariantId) -> Result<ProductVariant, RepositoryError> {
        sqlx::query_as::<_, ProductVariant>(&format!(
            "DELETE FROM product_variants v WHERE v.id = $1 RETURNING {VARIANT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }
}
