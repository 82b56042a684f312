//! Form posts for the photo, size, frame, and style steps.

use axum::Form;
use axum::extract::{Multipart, Path, State};
use axum::response::Redirect;
use framecraft_core::assets::{content_type, customer_photo_path, validate_upload};
use framecraft_core::preview::{preview_dimensions, probe_dimensions};
use framecraft_core::wizard::{PhotoRef, SizeChoice, WizardUpdate};
use framecraft_core::{FrameColorId, FrameSizeId, FrameThicknessId, GlassType, MattingOptionId};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use super::Wizard;
use crate::db::{NewPhoto, PhotoRepository};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::Flash;
use crate::models::session::cart_token;
use crate::services::images::{decode_blocking, remember};
use crate::state::{AppState, ImageKey};

/// Multipart field carrying the photo.
const PHOTO_FIELD: &str = "photo";

/// Merge an update into the draft, optionally advancing, and redirect.
async fn apply(
    state: &AppState,
    session: &Session,
    id: i32,
    update: WizardUpdate,
    advance: bool,
) -> Result<Redirect> {
    let mut wizard = Wizard::load(state, session, id).await?;
    match wizard.draft.update(update, &wizard.options) {
        Ok(outcome) => {
            if outcome.refitted {
                tracing::debug!("Photo re-fitted to the new opening");
            }
            if advance && let Err(e) = wizard.draft.next() {
                Flash::error(e.to_string()).push(session).await;
            }
        }
        Err(e) => {
            tracing::info!(error = %e, "Wizard update rejected");
            Flash::error(e.to_string()).push(session).await;
        }
    }
    wizard.save(session).await?;
    Ok(wizard.redirect())
}

/// Blank form values mean "not provided".
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Size step form.
#[derive(Debug, Default, Deserialize)]
pub struct SizeForm {
    /// `standard` or `custom`.
    pub mode: Option<String>,
    pub size_id: Option<String>,
    pub custom_width: Option<String>,
    pub custom_height: Option<String>,
    pub advance: Option<String>,
}

impl SizeForm {
    /// The size choice, or a message for the customer.
    ///
    /// # Errors
    ///
    /// Returns a user-facing message when the form is incomplete or a
    /// number does not parse.
    pub fn choice(&self) -> std::result::Result<SizeChoice, String> {
        if self.mode.as_deref() == Some("custom") {
            let parse = |value: Option<&str>, side: &str| {
                present(value)
                    .ok_or_else(|| format!("Please enter a custom {side}"))?
                    .parse::<f64>()
                    .map_err(|_| format!("Custom {side} must be a number of inches"))
            };
            Ok(SizeChoice::Custom {
                width_inches: parse(self.custom_width.as_deref(), "width")?,
                height_inches: parse(self.custom_height.as_deref(), "height")?,
            })
        } else {
            let size_id = present(self.size_id.as_deref())
                .and_then(|v| v.parse::<i32>().ok())
                .ok_or_else(|| "Please choose a size".to_string())?;
            Ok(SizeChoice::Standard {
                size_id: FrameSizeId::new(size_id),
            })
        }
    }
}

/// Save the size step.
#[instrument(skip(state, session, form))]
pub async fn size(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Form(form): Form<SizeForm>,
) -> Result<Redirect> {
    match form.choice() {
        Ok(choice) => {
            let update = WizardUpdate {
                size: Some(choice),
                ..WizardUpdate::default()
            };
            apply(&state, &session, id, update, form.advance.is_some()).await
        }
        Err(message) => {
            Flash::error(message).push(&session).await;
            Ok(Wizard::load(&state, &session, id).await?.redirect())
        }
    }
}

/// Frame step form.
#[derive(Debug, Default, Deserialize)]
pub struct FrameForm {
    pub color_id: Option<i32>,
    pub thickness_id: Option<i32>,
    pub advance: Option<String>,
}

/// Save the frame step.
#[instrument(skip(state, session))]
pub async fn frame(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Form(form): Form<FrameForm>,
) -> Result<Redirect> {
    let update = WizardUpdate {
        color_id: form.color_id.map(FrameColorId::new),
        thickness_id: form.thickness_id.map(FrameThicknessId::new),
        ..WizardUpdate::default()
    };
    apply(&state, &session, id, update, form.advance.is_some()).await
}

/// Style step form.
#[derive(Debug, Default, Deserialize)]
pub struct StyleForm {
    /// A matting id, or `none`.
    pub matting: Option<String>,
    pub glass_type: Option<String>,
    pub special_instructions: Option<String>,
    pub advance: Option<String>,
}

impl StyleForm {
    /// The update this form describes. Unknown values are ignored.
    #[must_use]
    pub fn update(&self) -> WizardUpdate {
        let matting = match present(self.matting.as_deref()) {
            Some("none") => Some(None),
            Some(value) => value
                .parse::<i32>()
                .ok()
                .map(|id| Some(MattingOptionId::new(id))),
            None => None,
        };
        WizardUpdate {
            matting,
            glass_type: present(self.glass_type.as_deref()).and_then(|g| g.parse::<GlassType>().ok()),
            special_instructions: self.special_instructions.clone(),
            ..WizardUpdate::default()
        }
    }
}

/// Save the style step.
#[instrument(skip(state, session, form))]
pub async fn style(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Form(form): Form<StyleForm>,
) -> Result<Redirect> {
    apply(&state, &session, id, form.update(), form.advance.is_some()).await
}

/// Upload the customer's photo.
///
/// The file is checked by name and size, then decoded before anything is
/// stored, so unreadable images never reach storage. The decoded image
/// goes straight into the preview cache.
#[instrument(skip(state, session, multipart))]
pub async fn upload_photo(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    mut multipart: Multipart,
) -> Result<Redirect> {
    let mut wizard = Wizard::load(&state, &session, id).await?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(PHOTO_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        upload = Some((file_name, bytes));
    }
    let (file_name, bytes) = upload.unwrap_or_default();

    let ext = match validate_upload(&file_name, bytes.len(), state.config().max_upload_bytes) {
        Ok(ext) => ext,
        Err(e) => {
            Flash::error(e.to_string()).push(&session).await;
            return Ok(wizard.redirect());
        }
    };
    let Ok((width, height)) = probe_dimensions(&bytes) else {
        Flash::error("That file could not be read as an image.")
            .push(&session)
            .await;
        return Ok(wizard.redirect());
    };
    let bytes = bytes.to_vec();
    let image = match decode_blocking(bytes.clone()).await {
        Ok(image) => image,
        Err(AppError::Preview(e)) => {
            tracing::info!(error = %e, "Uploaded photo failed to decode");
            Flash::error("That file could not be read as an image.")
                .push(&session)
                .await;
            return Ok(wizard.redirect());
        }
        Err(e) => return Err(e),
    };

    let token = cart_token(&session).await?;
    let path = customer_photo_path(&token, Uuid::new_v4(), &ext);
    let file_size = i64::try_from(bytes.len()).unwrap_or(i64::MAX);
    let stored = state
        .store()
        .upload(&path, bytes, content_type(&ext))
        .await?;

    let row = PhotoRepository::new(state.pool())
        .create(&NewPhoto {
            session_id: &token,
            file_name: &file_name,
            file_type: content_type(&ext),
            file_size,
            width_pixels: i32::try_from(width).unwrap_or(i32::MAX),
            height_pixels: i32::try_from(height).unwrap_or(i32::MAX),
            storage_path: &stored.path,
            public_url: &stored.public_url,
        })
        .await?;

    let (preview_width, preview_height) = preview_dimensions(width, height);
    remember(&state, ImageKey::Photo(stored.path.clone()), image).await;

    let photo = PhotoRef {
        id: row.id,
        url: stored.public_url,
        file_name,
        width: preview_width,
        height: preview_height,
    };
    wizard.draft.update(
        WizardUpdate {
            photo: Some(photo),
            ..WizardUpdate::default()
        },
        &wizard.options,
    )?;
    wizard.save(&session).await?;

    tracing::info!(
        photo_id = %row.id,
        width,
        height,
        size = stored.size,
        "Customer photo uploaded"
    );
    add_breadcrumb("wizard", "Photo uploaded", None);
    Flash::success("Photo uploaded. Drag it in the preview to position it.")
        .push(&session)
        .await;
    Ok(wizard.redirect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size_form(mode: &str, size_id: &str, width: &str, height: &str) -> SizeForm {
        SizeForm {
            mode: Some(mode.to_string()),
            size_id: Some(size_id.to_string()),
            custom_width: Some(width.to_string()),
            custom_height: Some(height.to_string()),
            advance: None,
        }
    }

    #[test]
    fn test_size_form_standard() {
        assert_eq!(
            size_form("standard", "3", "", "").choice(),
            Ok(SizeChoice::Standard {
                size_id: FrameSizeId::new(3)
            })
        );
        assert_eq!(
            size_form("standard", "", "", "").choice(),
            Err("Please choose a size".to_string())
        );
    }

    #[test]
    fn test_size_form_custom() {
        assert_eq!(
            size_form("custom", "", "12.5", " 30 ").choice(),
            Ok(SizeChoice::Custom {
                width_inches: 12.5,
                height_inches: 30.0
            })
        );
        assert_eq!(
            size_form("custom", "", "", "30").choice(),
            Err("Please enter a custom width".to_string())
        );
        assert_eq!(
            size_form("custom", "", "12", "tall").choice(),
            Err("Custom height must be a number of inches".to_string())
        );
    }

    #[test]
    fn test_style_form_matting() {
        let form = |matting: &str| StyleForm {
            matting: Some(matting.to_string()),
            ..StyleForm::default()
        };
        assert_eq!(form("none").update().matting, Some(None));
        assert_eq!(
            form("4").update().matting,
            Some(Some(MattingOptionId::new(4)))
        );
        assert_eq!(form("").update().matting, None);
    }

    #[test]
    fn test_style_form_glass() {
        let form = StyleForm {
            glass_type: Some("anti_glare".to_string()),
            ..StyleForm::default()
        };
        assert_eq!(form.update().glass_type, Some(GlassType::AntiGlare));
    }
}
