//! Customer showcase entries.

use framecraft_core::catalog::GalleryItem;
use sqlx::PgPool;

use super::RepositoryError;

pub struct GalleryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> GalleryRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every gallery item, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<GalleryItem>, RepositoryError> {
        let items = sqlx::query_as::<_, GalleryItem>(
            r"
            SELECT id, title, description, image_url, frame_style, material, customer_name,
                   rating, product_id, occasion, room_type, price_range, testimonial,
                   size_label
            FROM gallery_items
            ORDER BY created_at DESC, id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(items)
    }
}
