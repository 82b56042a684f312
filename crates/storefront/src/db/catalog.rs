//! Read access to products, option sets, and frame assets.

use framecraft_core::catalog::{
    AspectRatio, CatalogOptions, FrameAsset, FrameColor, FrameSize, FrameThickness,
    MattingOption, Orientation, Product,
};
use framecraft_core::{AspectRatioId, FrameColorId, FrameThicknessId, ProductId};
use sqlx::PgPool;

use super::RepositoryError;

const PRODUCT_COLUMNS: &str = "id, name, description, base_price, image_url, style, material, \
     is_active, is_featured, popularity_score, stock_quantity, created_at";

/// Repository for catalog reads.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All active products, featured and popular first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn active_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_active \
             ORDER BY is_featured DESC, popularity_score DESC, name"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(products)
    }

    /// An active product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn active_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 AND is_active"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(product)
    }

    /// Every option set, including inactive rows, in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn options(&self) -> Result<CatalogOptions, RepositoryError> {
        let sizes = sqlx::query_as::<_, FrameSize>(
            r"
            SELECT id, display_name, width_inches, height_inches, price_multiplier, is_active
            FROM frame_sizes
            ORDER BY sort_order, width_inches * height_inches
            ",
        )
        .fetch_all(self.pool)
        .await?;

        let colors = sqlx::query_as::<_, FrameColor>(
            r"
            SELECT id, name, hex_code, price_adjustment, is_active
            FROM frame_colors
            ORDER BY sort_order, name
            ",
        )
        .fetch_all(self.pool)
        .await?;

        let thicknesses = sqlx::query_as::<_, FrameThickness>(
            r"
            SELECT id, name, width_inches, price_multiplier, is_active
            FROM frame_thicknesses
            ORDER BY sort_order, width_inches
            ",
        )
        .fetch_all(self.pool)
        .await?;

        let mattings = sqlx::query_as::<_, MattingOption>(
            r"
            SELECT id, name, color_hex, thickness_inches, price_adjustment, is_double_mat,
                   is_active
            FROM matting_options
            ORDER BY sort_order, name
            ",
        )
        .fetch_all(self.pool)
        .await?;

        let aspect_ratios = sqlx::query_as::<_, AspectRatio>(
            r"
            SELECT id, name, width_ratio, height_ratio, ratio_value, sort_order
            FROM aspect_ratios
            ORDER BY sort_order, ratio_value
            ",
        )
        .fetch_all(self.pool)
        .await?;

        let orientations = sqlx::query_as::<_, Orientation>(
            "SELECT id, code, name FROM frame_orientations ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(CatalogOptions {
            sizes,
            colors,
            thicknesses,
            mattings,
            aspect_ratios,
            orientations,
        })
    }

    /// The frame texture for one aspect ratio, color, and thickness.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn frame_asset(
        &self,
        aspect_ratio_id: AspectRatioId,
        color_id: FrameColorId,
        thickness_id: FrameThicknessId,
    ) -> Result<Option<FrameAsset>, RepositoryError> {
        let asset = sqlx::query_as::<_, FrameAsset>(
            r"
            SELECT id, aspect_ratio_id, color_id, thickness_id, storage_path, image_url,
                   file_size, created_at
            FROM frame_assets
            WHERE aspect_ratio_id = $1 AND color_id = $2 AND thickness_id = $3
            ",
        )
        .bind(aspect_ratio_id)
        .bind(color_id)
        .bind(thickness_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(asset)
    }
}
