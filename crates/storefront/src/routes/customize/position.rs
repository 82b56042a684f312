//! Photo positioning and the rendered preview.
//!
//! The browser sends pointer events in preview canvas pixels. A drag keeps
//! its controller in the session between events so the anchor survives;
//! every action also writes the resulting position into the draft.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use framecraft_core::preview::{PhotoPosition, PreviewController};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use super::{Wizard, drag_key};
use crate::error::Result;
use crate::services::preview::render_png;
use crate::state::AppState;

/// A positioning action from the preview widget.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PositionAction {
    DragStart { x: f64, y: f64 },
    DragMove { x: f64, y: f64 },
    DragEnd,
    Scale { value: f64 },
    Rotate { degrees: f64 },
    Reset,
}

impl PositionAction {
    /// Apply to `controller`, returning the new position.
    pub fn apply(self, controller: &mut PreviewController) -> PhotoPosition {
        match self {
            Self::DragStart { x, y } => controller.begin_drag(Point::new(x, y)),
            Self::DragMove { x, y } => controller.drag_to(Point::new(x, y)),
            Self::DragEnd => controller.end_drag(),
            Self::Scale { value } => controller.set_scale(value),
            Self::Rotate { degrees } => controller.set_rotation(degrees),
            Self::Reset => controller.reset(),
        }
    }

    const fn continues_drag(self) -> bool {
        matches!(self, Self::DragMove { .. } | Self::DragEnd)
    }
}

/// Position after an action.
#[derive(Debug, Serialize)]
pub struct PositionResponse {
    pub position: PhotoPosition,
    pub dragging: bool,
}

/// Apply a positioning action.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(action): Json<PositionAction>,
) -> Result<Json<PositionResponse>> {
    let mut wizard = Wizard::load(&state, &session, id).await?;
    let key = drag_key(id);

    let stored = if action.continues_drag() {
        session.get::<PreviewController>(&key).await?
    } else {
        None
    };
    let mut controller = stored.unwrap_or_else(|| wizard.draft.controller(&wizard.options));
    let position = action.apply(&mut controller);

    if controller.is_dragging() {
        session.insert(&key, &controller).await?;
    } else {
        session.remove::<PreviewController>(&key).await?;
    }
    wizard.draft.position = position;
    wizard.save(&session).await?;

    Ok(Json(PositionResponse {
        position,
        dragging: controller.is_dragging(),
    }))
}

/// The framed preview as PNG.
#[instrument(skip(state, session))]
pub async fn preview_png(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let wizard = Wizard::load(&state, &session, id).await?;
    let png = render_png(&state, &wizard.draft, &wizard.options).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "private, no-cache"),
        ],
        png,
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use framecraft_core::preview::FrameLayout;

    use super::*;

    fn parse(json: &str) -> Option<PositionAction> {
        serde_json::from_str(json).ok()
    }

    #[test]
    fn test_action_json() {
        assert_eq!(
            parse(r#"{"action":"drag_start","x":10,"y":20.5}"#),
            Some(PositionAction::DragStart { x: 10.0, y: 20.5 })
        );
        assert_eq!(parse(r#"{"action":"reset"}"#), Some(PositionAction::Reset));
        assert_eq!(
            parse(r#"{"action":"scale","value":1.4}"#),
            Some(PositionAction::Scale { value: 1.4 })
        );
        assert_eq!(parse(r#"{"action":"spin"}"#), None);
    }

    #[test]
    fn test_drag_sequence() {
        let mut controller = PreviewController::with_state(
            FrameLayout::default(),
            Some(kurbo::Size::new(300.0, 400.0)),
            PhotoPosition::default(),
        );
        PositionAction::DragStart { x: 100.0, y: 100.0 }.apply(&mut controller);
        assert!(controller.is_dragging());
        let moved = PositionAction::DragMove { x: 130.0, y: 90.0 }.apply(&mut controller);
        assert!((moved.x - 30.0).abs() < 1e-9);
        assert!((moved.y + 10.0).abs() < 1e-9);
        PositionAction::DragEnd.apply(&mut controller);
        assert!(!controller.is_dragging());
    }

    #[test]
    fn test_extreme_drag_keeps_position_serializable() {
        let mut controller = PreviewController::with_state(
            FrameLayout::default(),
            Some(kurbo::Size::new(300.0, 400.0)),
            PhotoPosition::default(),
        );
        PositionAction::DragStart { x: 1e308, y: 0.0 }.apply(&mut controller);
        let moved = PositionAction::DragMove { x: -1e308, y: 0.0 }.apply(&mut controller);
        assert!(moved.x.is_finite());

        let json = serde_json::to_string(&moved).unwrap();
        let back: PhotoPosition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, moved);
    }

    #[test]
    fn test_scale_is_clamped() {
        let mut controller = PreviewController::default();
        let position = PositionAction::Scale { value: 9.0 }.apply(&mut controller);
        assert!((position.scale - 3.0).abs() < 1e-9);
    }
}
