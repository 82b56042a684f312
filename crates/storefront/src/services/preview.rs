//! Server-side rendering of the framed preview.

use std::sync::Arc;

use framecraft_core::HexColor;
use framecraft_core::catalog::CatalogOptions;
use framecraft_core::preview::{FrameFill, PreviewScene, RgbaImage, encode_png, render};
use framecraft_core::wizard::WizardDraft;
use tracing::instrument;

use super::images::decoded_image;
use crate::db::CatalogRepository;
use crate::error::AppError;
use crate::state::{AppState, ImageKey};

/// Render the draft's current preview as PNG bytes.
///
/// The frame ring uses the uploaded frame asset for the print size's
/// aspect ratio, color, and thickness when one exists, and the color's flat
/// hex otherwise. A missing or unreadable photo renders the empty placeholder.
///
/// # Errors
///
/// Returns `AppError` if rendering or encoding fails.
#[instrument(skip(state, draft, options), fields(product_id = %draft.product_id))]
pub async fn render_png(
    state: &AppState,
    draft: &WizardDraft,
    options: &CatalogOptions,
) -> Result<Vec<u8>, AppError> {
    let layout = draft.layout(options);
    let color = draft
        .color_id
        .and_then(|id| options.color(id))
        .map_or(HexColor::WALNUT, |c| c.hex_code);
    let mat_color = draft
        .matting_id
        .and_then(|id| options.matting(id))
        .map_or(HexColor::WHITE, |m| m.color_hex);

    let photo = match &draft.photo {
        Some(photo) => match state.store().path_from_public_url(&photo.url) {
            Some(path) => load_optional(state, ImageKey::Photo(path.to_string())).await,
            None => None,
        },
        None => None,
    };
    let texture = frame_texture(state, draft, options).await;
    let position = draft.position;

    tokio::task::spawn_blocking(move || {
        let fill = texture
            .as_deref()
            .map_or(FrameFill::Solid(color), FrameFill::Texture);
        let mut scene = PreviewScene::new(layout, fill).with_mat_color(mat_color);
        if let Some(photo) = photo.as_deref() {
            scene = scene.with_photo(photo, position);
        }
        encode_png(&render(&scene))
    })
    .await
    .map_err(|e| AppError::Internal(format!("render task failed: {e}")))?
    .map_err(AppError::from)
}

/// The frame asset texture matching the draft, if any.
async fn frame_texture(
    state: &AppState,
    draft: &WizardDraft,
    options: &CatalogOptions,
) -> Option<Arc<RgbaImage>> {
    let (color_id, thickness_id) = (draft.color_id?, draft.thickness_id?);
    let ratio = draft.aspect_ratio(options)?;

    let asset = match CatalogRepository::new(state.pool())
        .frame_asset(ratio.id, color_id, thickness_id)
        .await
    {
        Ok(asset) => asset?,
        Err(e) => {
            tracing::warn!(error = %e, "Frame asset lookup failed");
            return None;
        }
    };
    load_optional(state, ImageKey::Texture(asset.storage_path)).await
}

async fn load_optional(state: &AppState, key: ImageKey) -> Option<Arc<RgbaImage>> {
    match decoded_image(state, key).await {
        Ok(image) => Some(image),
        Err(e) => {
            tracing::warn!(error = %e, "Preview image unavailable");
            None
        }
    }
}
