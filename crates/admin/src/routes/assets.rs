//! Frame texture assets, one per aspect ratio, color, and thickness.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Multipart, Path, Query, State};
use axum::response::Redirect;
use framecraft_core::assets::{
    AssetFilter, content_type, format_file_size, frame_asset_path, validate_upload,
};
use framecraft_core::catalog::{CatalogOptions, FrameAsset};
use framecraft_core::{AspectRatioId, FrameAssetId, FrameColorId};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::db::{AssetRepository, OptionsRepository, assets::NewAsset};
use crate::error::{AppError, Result};
use crate::filters;
use crate::models::Flash;
use crate::state::AppState;

/// Filter query; blank values mean "all".
#[derive(Debug, Default, Deserialize)]
pub struct AssetQuery {
    pub aspect_ratio_id: Option<String>,
    pub color_id: Option<String>,
}

impl AssetQuery {
    fn filter(&self) -> AssetFilter {
        AssetFilter {
            aspect_ratio_id: parse_id(self.aspect_ratio_id.as_deref()).map(AspectRatioId::new),
            color_id: parse_id(self.color_id.as_deref()).map(FrameColorId::new),
        }
    }
}

fn parse_id(raw: Option<&str>) -> Option<i32> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse().ok())
}

/// An id/name pair for filters and the upload form.
#[derive(Debug, Clone)]
pub struct OptionChoice {
    pub id: i32,
    pub name: String,
}

/// A row in the asset grid.
#[derive(Debug, Clone)]
pub struct AssetRow {
    pub id: i32,
    pub aspect_ratio: String,
    pub color: String,
    pub thickness: String,
    pub image_url: String,
    pub file_size: String,
    pub uploaded: String,
}

impl AssetRow {
    fn new(asset: &FrameAsset, options: &CatalogOptions) -> Self {
        let name_or_id = |name: Option<&String>, id: i32| {
            name.cloned().unwrap_or_else(|| format!("#{id}"))
        };
        Self {
            id: asset.id.as_i32(),
            aspect_ratio: name_or_id(
                options
                    .aspect_ratios
                    .iter()
                    .find(|a| a.id == asset.aspect_ratio_id)
                    .map(|a| &a.name),
                asset.aspect_ratio_id.as_i32(),
            ),
            color: name_or_id(
                options
                    .colors
                    .iter()
                    .find(|c| c.id == asset.color_id)
                    .map(|c| &c.name),
                asset.color_id.as_i32(),
            ),
            thickness: name_or_id(
                options
                    .thicknesses
                    .iter()
                    .find(|t| t.id == asset.thickness_id)
                    .map(|t| &t.name),
                asset.thickness_id.as_i32(),
            ),
            image_url: asset.image_url.clone(),
            file_size: format_file_size(asset.file_size.and_then(|s| u64::try_from(s).ok())),
            uploaded: asset.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Asset library page template.
#[derive(Template, WebTemplate)]
#[template(path = "assets/index.html")]
pub struct AssetsIndexTemplate {
    pub current_path: &'static str,
    pub assets: Vec<AssetRow>,
    pub total: usize,
    pub aspect_ratios: Vec<OptionChoice>,
    pub colors: Vec<OptionChoice>,
    pub thicknesses: Vec<OptionChoice>,
    pub selected_ratio: Option<i32>,
    pub selected_color: Option<i32>,
    pub flashes: Vec<Flash>,
}

/// Asset library, filtered by aspect ratio and color.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<AssetQuery>,
) -> Result<AssetsIndexTemplate> {
    let options = OptionsRepository::new(state.pool()).all().await?;
    let assets = AssetRepository::new(state.pool()).list().await?;
    let filter = query.filter();

    let rows = filter
        .apply(&assets)
        .into_iter()
        .map(|a| AssetRow::new(a, &options))
        .collect();

    Ok(AssetsIndexTemplate {
        current_path: "/assets",
        assets: rows,
        total: assets.len(),
        aspect_ratios: options
            .aspect_ratios
            .iter()
            .map(|a| OptionChoice {
                id: a.id.as_i32(),
                name: a.name.clone(),
            })
            .collect(),
        colors: options
            .colors
            .iter()
            .map(|c| OptionChoice {
                id: c.id.as_i32(),
                name: c.name.clone(),
            })
            .collect(),
        thicknesses: options
            .thicknesses
            .iter()
            .map(|t| OptionChoice {
                id: t.id.as_i32(),
                name: t.name.clone(),
            })
            .collect(),
        selected_ratio: filter.aspect_ratio_id.map(|id| id.as_i32()),
        selected_color: filter.color_id.map(|id| id.as_i32()),
        flashes: Flash::take_all(&session).await,
    })
}

/// Fields of the upload form.
#[derive(Debug, Default)]
struct UploadFields {
    aspect_ratio_id: Option<i32>,
    color_id: Option<i32>,
    thickness_id: Option<i32>,
    file: Option<(String, Vec<u8>)>,
}

impl UploadFields {
    async fn read(multipart: &mut Multipart) -> Result<Self> {
        let mut fields = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == "file" {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                fields.file = Some((file_name, bytes.to_vec()));
                continue;
            }
            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            let id = parse_id(Some(&value));
            match name.as_str() {
                "aspect_ratio_id" => fields.aspect_ratio_id = id,
                "color_id" => fields.color_id = id,
                "thickness_id" => fields.thickness_id = id,
                _ => {}
            }
        }
        Ok(fields)
    }
}

/// Upload a frame texture, replacing any asset for the same combination.
#[instrument(skip(state, session, multipart))]
pub async fn upload(
    State(state): State<AppState>,
    session: Session,
    mut multipart: Multipart,
) -> Result<Redirect> {
    let back = Redirect::to("/assets");
    let fields = UploadFields::read(&mut multipart).await?;
    let options = OptionsRepository::new(state.pool()).all().await?;

    let ratio = fields
        .aspect_ratio_id
        .and_then(|id| options.aspect_ratios.iter().find(|a| a.id.as_i32() == id));
    let color = fields
        .color_id
        .and_then(|id| options.colors.iter().find(|c| c.id.as_i32() == id));
    let thickness = fields
        .thickness_id
        .and_then(|id| options.thicknesses.iter().find(|t| t.id.as_i32() == id));
    let (Some(ratio), Some(color), Some(thickness)) = (ratio, color, thickness) else {
        Flash::error("Choose an aspect ratio, color, and thickness")
            .push(&session)
            .await;
        return Ok(back);
    };

    let (file_name, bytes) = fields.file.unwrap_or_default();
    let ext = match validate_upload(&file_name, bytes.len(), state.config().max_upload_bytes) {
        Ok(ext) => ext,
        Err(e) => {
            Flash::error(e.to_string()).push(&session).await;
            return Ok(back);
        }
    };

    let path = frame_asset_path(
        &ratio.name,
        &color.name,
        &thickness.name,
        chrono::Utc::now().timestamp_millis(),
        &ext,
    );
    let stored = state
        .store()
        .upload(&path, bytes, content_type(&ext))
        .await?;

    let (asset, replaced) = AssetRepository::new(state.pool())
        .upsert(&NewAsset {
            aspect_ratio_id: ratio.id,
            color_id: color.id,
            thickness_id: thickness.id,
            storage_path: &stored.path,
            image_url: &stored.public_url,
            file_size: i64::try_from(stored.size).unwrap_or(i64::MAX),
        })
        .await?;
    tracing::info!(
        asset_id = %asset.id,
        path = %stored.path,
        replaced = replaced.is_some(),
        "Frame asset uploaded"
    );

    let label = format!("{} / {} / {}", ratio.name, color.name, thickness.name);
    match replaced {
        Some(old) => {
            if let Err(e) = state.store().remove(&[old.clone()]).await {
                tracing::warn!(error = %e, path = %old, "Failed to remove replaced asset");
                Flash::warning(format!(
                    "Replaced {label}, but the old file could not be removed"
                ))
                .push(&session)
                .await;
            } else {
                Flash::success(format!("Replaced {label}")).push(&session).await;
            }
        }
        None => {
            Flash::success(format!("Uploaded {label}")).push(&session).await;
        }
    }
    Ok(back)
}

/// Delete an asset. The row goes even if the stored file cannot be removed.
#[instrument(skip(state, session))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    let asset = AssetRepository::new(state.pool())
        .delete(FrameAssetId::new(id))
        .await?;
    tracing::info!(asset_id = id, path = %asset.storage_path, "Frame asset deleted");

    match state.store().remove(&[asset.storage_path.clone()]).await {
        Ok(()) => Flash::success("Asset deleted").push(&session).await,
        Err(e) => {
            tracing::warn!(
                error = %e,
                path = %asset.storage_path,
                "Failed to remove asset file; row already deleted"
            );
            Flash::warning("Asset deleted, but its file could not be removed from storage")
                .push(&session)
                .await;
        }
    }
    Ok(Redirect::to("/assets"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_filter_values_mean_all() {
        let query = AssetQuery {
            aspect_ratio_id: Some(String::new()),
            color_id: Some(" 3 ".to_string()),
        };
        let filter = query.filter();
        assert_eq!(filter.aspect_ratio_id, None);
        assert_eq!(filter.color_id, Some(FrameColorId::new(3)));
    }

    #[test]
    fn test_index_marks_selected_filters() {
        let choices = |names: &[&str]| {
            names
                .iter()
                .zip(1..)
                .map(|(name, id)| OptionChoice {
                    id,
                    name: (*name).to_string(),
                })
                .collect::<Vec<_>>()
        };
        let page = AssetsIndexTemplate {
            current_path: "/assets",
            assets: Vec::new(),
            total: 0,
            aspect_ratios: choices(&["4:5", "1:1"]),
            colors: choices(&["Black", "Walnut"]),
            thicknesses: choices(&["Slim"]),
            selected_ratio: Some(2),
            selected_color: Some(1),
            flashes: Vec::new(),
        };
        let html = page.render().unwrap();

        assert!(html.contains(r#"<option value="2" selected>1:1</option>"#));
        assert!(html.contains(r#"<option value="1" selected>Black</option>"#));
        assert!(html.contains(r#"<option value="1" >4:5</option>"#));
        assert!(html.contains("No frame assets match."));
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id(Some("12")), Some(12));
        assert_eq!(parse_id(Some("twelve")), None);
        assert_eq!(parse_id(None), None);
    }
}
