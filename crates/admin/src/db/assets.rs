//! Frame texture assets.

use framecraft_core::catalog::FrameAsset;
use framecraft_core::{AspectRatioId, FrameAssetId, FrameColorId, FrameThicknessId};
use sqlx::PgPool;

use super::RepositoryError;

const ASSET_COLUMNS: &str =
    "id, aspect_ratio_id, color_id, thickness_id, storage_path, image_url, file_size, created_at";

/// A stored texture about to be recorded.
#[derive(Debug)]
pub struct NewAsset<'a> {
    pub aspect_ratio_id: AspectRatioId,
    pub color_id: FrameColorId,
    pub thickness_id: FrameThicknessId,
    pub storage_path: &'a str,
    pub image_url: &'a str,
    pub file_size: i64,
}

pub struct AssetRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AssetRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every asset, grouped by ratio, color, and thickness.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<FrameAsset>, RepositoryError> {
        let assets = sqlx::query_as::<_, FrameAsset>(&format!(
            "SELECT {ASSET_COLUMNS} FROM frame_assets \
             ORDER BY aspect_ratio_id, color_id, thickness_id"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(assets)
    }

    /// Insert, or replace the asset for the same ratio/color/thickness.
    ///
    /// Returns the new row and the storage path it replaced, if any; the
    /// caller removes the old object.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if an option id does not exist.
    pub async fn upsert(
        &self,
        asset: &NewAsset<'_>,
    ) -> Result<(FrameAsset, Option<String>), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let previous: Option<String> = sqlx::query_scalar(
            r"
            SELECT storage_path FROM frame_assets
            WHERE aspect_ratio_id = $1 AND color_id = $2 AND thickness_id = $3
            FOR UPDATE
            ",
        )
        .bind(asset.aspect_ratio_id)
        .bind(asset.color_id)
        .bind(asset.thickness_id)
        .fetch_optional(&mut *tx)
        .await?;

        let row = sqlx::query_as::<_, FrameAsset>(&format!(
            r"
            INSERT INTO frame_assets
                (aspect_ratio_id, color_id, thickness_id, storage_path, image_url, file_size)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (aspect_ratio_id, color_id, thickness_id) DO UPDATE
            SET storage_path = EXCLUDED.storage_path,
                image_url = EXCLUDED.image_url,
                file_size = EXCLUDED.file_size,
                created_at = now()
            RETURNING {ASSET_COLUMNS}
            "
        ))
        .bind(asset.aspect_ratio_id)
        .bind(asset.color_id)
        .bind(asset.thickness_id)
        .bind(asset.storage_path)
        .bind(asset.image_url)
        .bind(asset.file_size)
        .fetch_one(&mut *tx)
        .await
        .map_err(RepositoryError::from_write)?;

        tx.commit().await?;
        let replaced = previous.filter(|path| path != asset.storage_path);
        Ok((row, replaced))
    }

    /// Delete an asset row, returning it so the caller can remove the object.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if there is no such asset.
    pub async fn delete(&self, id: FrameAssetId) -> Result<FrameAsset, RepositoryError> {
        sqlx::query_as::<_, FrameAsset>(&format!(
            "DELETE FROM frame_assets WHERE id = $1 RETURNING {ASSET_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }
}
