//! Decoded images for the preview renderer.
//!
//! Objects are fetched from storage once, decoded off the async runtime,
//! and kept in the state's weighted cache.

use std::sync::Arc;

use framecraft_core::preview::{RgbaImage, decode_photo};
use tracing::instrument;

use crate::error::AppError;
use crate::state::{AppState, ImageKey};

/// Decode `bytes` on the blocking pool.
///
/// # Errors
///
/// Returns `AppError::Preview` if the bytes are not a supported image.
pub async fn decode_blocking(bytes: Vec<u8>) -> Result<RgbaImage, AppError> {
    tokio::task::spawn_blocking(move || decode_photo(&bytes))
        .await
        .map_err(|e| AppError::Internal(format!("decode task failed: {e}")))?
        .map_err(AppError::from)
}

/// The decoded image for `key`, downloading it on a cache miss.
///
/// # Errors
///
/// Returns `AppError::Storage` if the object cannot be fetched, or
/// `AppError::Preview` if it cannot be decoded.
#[instrument(skip(state), fields(path = key.path()))]
pub async fn decoded_image(state: &AppState, key: ImageKey) -> Result<Arc<RgbaImage>, AppError> {
    if let Some(image) = state.images().get(&key).await {
        return Ok(image);
    }
    let bytes = state.store().download(key.path()).await?;
    let image = Arc::new(decode_blocking(bytes).await?);
    tracing::debug!(
        width = image.width(),
        height = image.height(),
        "Image decoded"
    );
    state.images().insert(key, Arc::clone(&image)).await;
    Ok(image)
}

/// Seed the cache with an image that was just decoded.
pub async fn remember(state: &AppState, key: ImageKey, image: RgbaImage) {
    state.images().insert(key, Arc::new(image)).await;
}
