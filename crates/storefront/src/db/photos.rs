//! Customer photo records.

use framecraft_core::PhotoId;
use framecraft_core::catalog::UploadedPhoto;
use sqlx::PgPool;

use super::RepositoryError;

const PHOTO_COLUMNS: &str = "id, session_id, file_name, file_type, file_size, width_pixels, \
     height_pixels, dpi, storage_path, public_url, is_processed, created_at";

/// Fields for a new photo row.
#[derive(Debug)]
pub struct NewPhoto<'a> {
    pub session_id: &'a str,
    pub file_name: &'a str,
    pub file_type: &'a str,
    pub file_size: i64,
    pub width_pixels: i32,
    pub height_pixels: i32,
    pub storage_path: &'a str,
    pub public_url: &'a str,
}

pub struct PhotoRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PhotoRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record an uploaded photo.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, photo: &NewPhoto<'_>) -> Result<UploadedPhoto, RepositoryError> {
        let row = sqlx::query_as::<_, UploadedPhoto>(&format!(
            r"
            INSERT INTO uploaded_photos
                (session_id, file_name, file_type, file_size, width_pixels, height_pixels,
                 storage_path, public_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PHOTO_COLUMNS}
            "
        ))
        .bind(photo.session_id)
        .bind(photo.file_name)
        .bind(photo.file_type)
        .bind(photo.file_size)
        .bind(photo.width_pixels)
        .bind(photo.height_pixels)
        .bind(photo.storage_path)
        .bind(photo.public_url)
        .fetch_one(self.pool)
        .await?;
        Ok(row)
    }

    /// A photo owned by `session_id`.
    ///
    /// Photos from other sessions are reported as absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_session(
        &self,
        id: PhotoId,
        session_id: &str,
    ) -> Result<Option<UploadedPhoto>, RepositoryError> {
        let row = sqlx::query_as::<_, UploadedPhoto>(&format!(
            "SELECT {PHOTO_COLUMNS} FROM uploaded_photos WHERE id = $1 AND session_id = $2"
        ))
        .bind(id)
        .bind(session_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }
}
