//! Option sets for the generator and the asset manager.

use framecraft_core::catalog::{
    AspectRatio, CatalogOptions, FrameColor, FrameSize, FrameThickness, MattingOption,
    Orientation,
};
use sqlx::PgPool;

use super::RepositoryError;

pub struct OptionsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OptionsRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every option row, active or not, in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn all(&self) -> Result<CatalogOptions, RepositoryError> {
        let sizes = sqlx::query_as::<_, FrameSize>(
            "SELECT id, display_name, width_inches, height_inches, price_multiplier, is_active \
             FROM frame_sizes ORDER BY sort_order, width_inches * height_inches",
        )
        .fetch_all(self.pool)
        .await?;
        let colors = sqlx::query_as::<_, FrameColor>(
            "SELECT id, name, hex_code, price_adjustment, is_active \
             FROM frame_colors ORDER BY sort_order, name",
        )
        .fetch_all(self.pool)
        .await?;
        let thicknesses = sqlx::query_as::<_, FrameThickness>(
            "SELECT id, name, width_inches, price_multiplier, is_active \
             FROM frame_thicknesses ORDER BY sort_order, width_inches",
        )
        .fetch_all(self.pool)
        .await?;
        let mattings = sqlx::query_as::<_, MattingOption>(
            "SELECT id, name, color_hex, thickness_inches, price_adjustment, is_double_mat, \
             is_active FROM matting_options ORDER BY sort_order, name",
        )
        .fetch_all(self.pool)
        .await?;
        let aspect_ratios = sqlx::query_as::<_, AspectRatio>(
            "SELECT id, name, width_ratio, height_ratio, ratio_value, sort_order \
             FROM aspect_ratios ORDER BY sort_order, ratio_value",
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
}
