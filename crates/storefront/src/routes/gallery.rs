//! Customer gallery with style, occasion, room, price, and text filters.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use framecraft_core::catalog::GalleryItem;
use framecraft_core::filter::{GalleryFilter, GalleryStyle, OCCASIONS, ROOMS};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::home::{FilterOption, price_options};
use crate::db::GalleryRepository;
use crate::error::Result;
use crate::filters;
use crate::models::Flash;
use crate::state::AppState;

/// Gallery filter query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct GalleryQuery {
    pub style: Option<String>,
    pub occasion: Option<String>,
    pub room: Option<String>,
    pub price: Option<String>,
    pub search: Option<String>,
}

/// Gallery page template.
#[derive(Template, WebTemplate)]
#[template(path = "gallery.html")]
pub struct GalleryTemplate {
    pub items: Vec<GalleryItem>,
    pub total: usize,
    pub search: String,
    pub styles: Vec<FilterOption>,
    pub occasions: Vec<FilterOption>,
    pub rooms: Vec<FilterOption>,
    pub prices: Vec<FilterOption>,
    pub filtered: bool,
    pub flashes: Vec<Flash>,
}

fn keyed_options(pairs: &[(&'static str, &'static str)], current: Option<&str>) -> Vec<FilterOption> {
    pairs
        .iter()
        .map(|&(code, label)| FilterOption {
            code,
            label,
            selected: current == Some(code),
        })
        .collect()
}

/// Display the gallery.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<GalleryQuery>,
) -> Result<GalleryTemplate> {
    let filter = GalleryFilter::from_query(
        query.style.as_deref(),
        query.occasion.as_deref(),
        query.room.as_deref(),
        query.price.as_deref(),
        query.search.as_deref(),
    );
    let all = GalleryRepository::new(state.pool()).list().await?;
    let items: Vec<GalleryItem> = filter.apply(&all).into_iter().cloned().collect();

    Ok(GalleryTemplate {
        total: all.len(),
        items,
        search: query.search.unwrap_or_default(),
        styles: GalleryStyle::ALL
            .iter()
            .map(|style| FilterOption {
                code: style.code(),
                label: style.label(),
                selected: filter.style == *style,
            })
            .collect(),
        occasions: keyed_options(OCCASIONS, filter.occasion.as_deref()),
        rooms: keyed_options(ROOMS, filter.room.as_deref()),
        prices: price_options(filter.price_band),
        filtered: filter.is_active(),
        flashes: Flash::take_all(&session).await,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyed_options() {
        let options = keyed_options(ROOMS, Some("office"));
        assert_eq!(options.len(), ROOMS.len());
        let selected: Vec<_> = options.iter().filter(|o| o.selected).map(|o| o.code).collect();
        assert_eq!(selected, vec!["office"]);
        assert!(keyed_options(OCCASIONS, None).iter().all(|o| !o.selected));
    }
}
