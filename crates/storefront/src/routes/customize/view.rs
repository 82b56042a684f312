//! Template data for the wizard page.

use askama::Template;
use askama_web::WebTemplate;
use framecraft_core::catalog::{CatalogOptions, Product};
use framecraft_core::preview::geometry::{MAX_ROTATION, MAX_SCALE, MIN_SCALE, SCALE_STEP};
use framecraft_core::pricing::{Adjustment, PriceQuote};
use framecraft_core::wizard::{WizardDraft, WizardStep};
use framecraft_core::{GlassType, Price};
use rust_decimal::Decimal;

use crate::filters;
use crate::models::Flash;
use crate::routes::home::{FilterOption, ProductCard};

/// One entry in the step indicator.
#[derive(Clone)]
pub struct StepLink {
    pub slug: &'static str,
    pub title: &'static str,
    pub number: usize,
    pub current: bool,
    pub complete: bool,
    pub reachable: bool,
}

/// A selectable option (size, thickness, mat).
#[derive(Clone)]
pub struct OptionChoice {
    pub id: i32,
    pub label: String,
    pub detail: String,
    pub selected: bool,
}

/// A frame color swatch.
#[derive(Clone)]
pub struct ColorChoice {
    pub id: i32,
    pub name: String,
    pub hex: String,
    pub detail: String,
    pub selected: bool,
}

/// One line of the running price breakdown.
#[derive(Clone)]
pub struct QuoteRow {
    pub label: String,
    pub effect: String,
}

/// A label/value pair on the review step.
#[derive(Clone)]
pub struct SummaryRow {
    pub label: &'static str,
    pub value: String,
}

/// The uploaded photo as shown on the page.
#[derive(Clone)]
pub struct PhotoView {
    pub url: String,
    pub file_name: String,
    pub dimensions: String,
}

/// The wizard page.
#[derive(Template, WebTemplate)]
#[template(path = "customize/wizard.html")]
pub struct WizardTemplate {
    pub product: ProductCard,
    pub step: &'static str,
    pub step_title: &'static str,
    pub step_description: &'static str,
    pub steps: Vec<StepLink>,
    pub progress: u8,
    pub has_prev: bool,
    pub is_last: bool,
    pub step_complete: bool,
    pub photo: Option<PhotoView>,
    pub max_upload: String,
    pub sizes: Vec<OptionChoice>,
    pub custom_selected: bool,
    pub custom_width: String,
    pub custom_height: String,
    pub colors: Vec<ColorChoice>,
    pub thicknesses: Vec<OptionChoice>,
    pub mattings: Vec<OptionChoice>,
    pub no_mat: bool,
    pub glass_types: Vec<FilterOption>,
    pub special_instructions: String,
    pub quote: Vec<QuoteRow>,
    pub total: String,
    pub summary: Vec<SummaryRow>,
    pub can_finish: bool,
    pub preview_config: String,
    pub preview_version: String,
    pub flashes: Vec<Flash>,
}

/// `×1.25`, or `Included` for a neutral multiplier.
fn multiplier_detail(multiplier: Decimal) -> String {
    if multiplier == Decimal::ONE {
        "Included".to_string()
    } else {
        format!("×{}", multiplier.normalize())
    }
}

/// `+$10.00`, `-$5.00`, or `Included` for zero.
fn adjustment_detail(amount: Decimal) -> String {
    if amount.is_zero() {
        "Included".to_string()
    } else if amount.is_sign_negative() {
        format!("-{}", Price::usd(-amount).display())
    } else {
        format!("+{}", Price::usd(amount).display())
    }
}

fn quote_rows(quote: &PriceQuote) -> Vec<QuoteRow> {
    let mut rows = vec![QuoteRow {
        label: "Base price".to_string(),
        effect: Price::usd(quote.base_price).display(),
    }];
    rows.extend(quote.lines.iter().map(|line| QuoteRow {
        label: line.label.clone(),
        effect: match line.adjustment {
            Adjustment::Multiply(factor) => multiplier_detail(factor),
            Adjustment::Add(amount) => adjustment_detail(amount),
        },
    }));
    rows
}

/// `16" x 20"` without trailing zeros.
fn inches(width: f64, height: f64) -> String {
    format!("{width}\" x {height}\"")
}

fn summary(draft: &WizardDraft, options: &CatalogOptions) -> Vec<SummaryRow> {
    let size = match (draft.size_id.and_then(|id| options.size(id)), draft.custom_dimensions()) {
        (Some(size), _) => size.display_name.clone(),
        (None, Some(custom)) => format!("Custom {}", inches(custom.width_inches, custom.height_inches)),
        (None, None) => "Not chosen".to_string(),
    };
    let color = draft.color_id.and_then(|id| options.color(id));
    let thickness = draft.thickness_id.and_then(|id| options.thickness(id));
    let frame = match (color, thickness) {
        (Some(c), Some(t)) => format!("{}, {}", c.name, t.name),
        (Some(c), None) => c.name.clone(),
        (None, Some(t)) => t.name.clone(),
        (None, None) => "Not chosen".to_string(),
    };

    let mut rows = vec![
        SummaryRow {
            label: "Photo",
            value: draft
                .photo
                .as_ref()
                .map_or_else(|| "Not uploaded".to_string(), |p| p.file_name.clone()),
        },
        SummaryRow { label: "Size", value: size },
        SummaryRow { label: "Frame", value: frame },
        SummaryRow {
            label: "Mat",
            value: draft
                .matting_id
                .and_then(|id| options.matting(id))
                .map_or_else(|| "None".to_string(), |m| m.name.clone()),
        },
        SummaryRow {
            label: "Glass",
            value: draft.glass_type.label().to_string(),
        },
    ];
    if let Some(notes) = &draft.special_instructions {
        rows.push(SummaryRow {
            label: "Instructions",
            value: notes.clone(),
        });
    }
    rows
}

fn preview_config(product_id: i32, draft: &WizardDraft, options: &CatalogOptions) -> String {
    let layout = draft.layout(options);
    serde_json::json!({
        "positionUrl": format!("/customize/{product_id}/position"),
        "previewUrl": format!("/customize/{product_id}/preview.png"),
        "canvas": { "width": layout.canvas.width, "height": layout.canvas.height },
        "hasPhoto": draft.photo.is_some(),
        "position": draft.position,
        "minScale": MIN_SCALE,
        "maxScale": MAX_SCALE,
        "scaleStep": SCALE_STEP,
        "maxRotation": MAX_ROTATION,
    })
    .to_string()
}

/// Cache-busting token for the preview image: changes whenever anything
/// that affects the render changes.
fn preview_version(draft: &WizardDraft) -> String {
    let p = draft.position;
    format!(
        "{}-{:?}-{:?}-{:?}-{:?}-{:?}-{:?}-{:.1}-{:.1}-{:.3}-{:.1}",
        draft.photo.as_ref().map_or(0, |p| p.id.as_i32()),
        draft.size_id.map(|id| id.as_i32()),
        draft.custom_width,
        draft.custom_height,
        draft.color_id.map(|id| id.as_i32()),
        draft.thickness_id.map(|id| id.as_i32()),
        draft.matting_id.map(|id| id.as_i32()),
        p.x,
        p.y,
        p.scale,
        p.rotation,
    )
}

impl WizardTemplate {
    /// Page data for the draft's current step.
    #[must_use]
    pub fn build(
        product: &Product,
        options: &CatalogOptions,
        draft: &WizardDraft,
        max_upload: String,
        flashes: Vec<Flash>,
    ) -> Self {
        let validation = draft.validation();
        let current = draft.current_step;
        let quote = draft.quote(options).ok();
        let product_id = product.id.as_i32();

        Self {
            product: ProductCard::from(product),
            step: current.slug(),
            step_title: current.title(),
            step_description: current.description(),
            steps: WizardStep::ALL
                .iter()
                .map(|&step| StepLink {
                    slug: step.slug(),
                    title: step.title(),
                    number: step.index() + 1,
                    current: step == current,
                    complete: validation.is_valid(step),
                    reachable: step <= current || validation.is_valid(step),
                })
                .collect(),
            progress: draft.progress_percent(),
            has_prev: current.prev().is_some(),
            is_last: current.is_last(),
            step_complete: validation.is_valid(current),
            photo: draft.photo.as_ref().map(|p| PhotoView {
                url: p.url.clone(),
                file_name: p.file_name.clone(),
                dimensions: format!("{} × {} px", p.width, p.height),
            }),
            max_upload,
            sizes: options
                .sizes
                .iter()
                .map(|s| OptionChoice {
                    id: s.id.as_i32(),
                    label: s.display_name.clone(),
                    detail: multiplier_detail(s.price_multiplier),
                    selected: draft.size_id == Some(s.id),
                })
                .collect(),
            custom_selected: draft.custom_dimensions().is_some(),
            custom_width: draft.custom_width.map(|w| w.to_string()).unwrap_or_default(),
            custom_height: draft.custom_height.map(|h| h.to_string()).unwrap_or_default(),
            colors: options
                .colors
                .iter()
                .map(|c| ColorChoice {
                    id: c.id.as_i32(),
                    name: c.name.clone(),
                    hex: c.hex_code.to_string(),
                    detail: adjustment_detail(c.price_adjustment),
                    selected: draft.color_id == Some(c.id),
                })
                .collect(),
            thicknesses: options
                .thicknesses
                .iter()
                .map(|t| OptionChoice {
                    id: t.id.as_i32(),
                    label: format!("{} ({}\")", t.name, t.width_inches),
                    detail: multiplier_detail(t.price_multiplier),
                    selected: draft.thickness_id == Some(t.id),
                })
                .collect(),
            mattings: options
                .mattings
                .iter()
                .map(|m| OptionChoice {
                    id: m.id.as_i32(),
                    label: if m.is_double_mat {
                        format!("{} (double)", m.name)
                    } else {
                        m.name.clone()
                    },
                    detail: adjustment_detail(m.price_adjustment),
                    selected: draft.matting_id == Some(m.id),
                })
                .collect(),
            no_mat: draft.matting_id.is_none(),
            glass_types: GlassType::ALL
                .iter()
                .map(|g| FilterOption {
                    code: g.as_str(),
                    label: g.label(),
                    selected: draft.glass_type == *g,
                })
                .collect(),
            special_instructions: draft.special_instructions.clone().unwrap_or_default(),
            total: Price::usd(quote.as_ref().map_or(draft.total_price, |q| q.total)).display(),
            quote: quote.as_ref().map(quote_rows).unwrap_or_default(),
            summary: summary(draft, options),
            can_finish: validation.review,
            preview_config: preview_config(product_id, draft, options),
            preview_version: preview_version(draft),
            flashes,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use framecraft_core::catalog::{FrameColor, FrameSize, FrameThickness};
    use framecraft_core::wizard::{PhotoRef, SizeChoice, WizardUpdate};
    use framecraft_core::{
        FrameColorId, FrameMaterial, FrameSizeId, FrameStyle, FrameThicknessId, HexColor, PhotoId,
        ProductId,
    };

    use super::*;

    fn options() -> CatalogOptions {
        CatalogOptions {
            sizes: vec![FrameSize {
                id: FrameSizeId::new(1),
                display_name: "8x10".to_string(),
                width_inches: 8.0,
                height_inches: 10.0,
                price_multiplier: Decimal::ONE,
                is_active: true,
            }],
            colors: vec![FrameColor {
                id: FrameColorId::new(1),
                name: "Walnut".to_string(),
                hex_code: HexColor::WALNUT,
                price_adjustment: Decimal::ZERO,
                is_active: true,
            }],
            thicknesses: vec![FrameThickness {
                id: FrameThicknessId::new(1),
                name: "Standard".to_string(),
                width_inches: 1.0,
                price_multiplier: Decimal::ONE,
                is_active: true,
            }],
            ..CatalogOptions::default()
        }
    }

    fn product() -> Product {
        Product {
            id: ProductId::new(1),
            name: "Gallery Frame".to_string(),
            description: None,
            base_price: Decimal::new(4000, 2),
            image_url: None,
            style: FrameStyle::Modern,
            material: FrameMaterial::Wood,
            is_active: true,
            is_featured: false,
            popularity_score: 0,
            stock_quantity: 5,
            created_at: Utc::now(),
        }
    }

    fn complete_draft(options: &CatalogOptions) -> WizardDraft {
        let mut draft = WizardDraft::new(ProductId::new(1), Decimal::new(4000, 2));
        let outcome = draft.update(
            WizardUpdate {
                photo: Some(PhotoRef {
                    id: PhotoId::new(9),
                    url: "/media/uploads/abc/1.jpg".to_string(),
                    file_name: "beach.jpg".to_string(),
                    width: 1200,
                    height: 800,
                }),
                size: Some(SizeChoice::Standard {
                    size_id: FrameSizeId::new(1),
                }),
                color_id: Some(FrameColorId::new(1)),
                thickness_id: Some(FrameThicknessId::new(1)),
                ..WizardUpdate::default()
            },
            options,
        );
        assert!(outcome.is_ok());
        draft
    }

    #[test]
    fn test_details() {
        assert_eq!(multiplier_detail(Decimal::ONE), "Included");
        assert_eq!(multiplier_detail(Decimal::new(150, 2)), "×1.5");
        assert_eq!(adjustment_detail(Decimal::ZERO), "Included");
        assert_eq!(adjustment_detail(Decimal::new(1000, 2)), "+$10.00");
        assert_eq!(adjustment_detail(Decimal::new(-500, 2)), "-$5.00");
    }

    #[test]
    fn test_summary_of_complete_draft() {
        let options = options();
        let draft = complete_draft(&options);
        let rows = summary(&draft, &options);
        let value = |label| {
            rows.iter()
                .find(|r| r.label == label)
                .map(|r| r.value.as_str())
        };
        assert_eq!(value("Photo"), Some("beach.jpg"));
        assert_eq!(value("Size"), Some("8x10"));
        assert_eq!(value("Frame"), Some("Walnut, Standard"));
        assert_eq!(value("Mat"), Some("None"));
    }

    #[test]
    fn test_preview_version_tracks_position() {
        let options = options();
        let mut draft = complete_draft(&options);
        let before = preview_version(&draft);
        draft.position.x += 5.0;
        assert_ne!(before, preview_version(&draft));
    }

    #[test]
    fn test_build_page() {
        let options = options();
        let draft = complete_draft(&options);
        let page =
            WizardTemplate::build(&product(), &options, &draft, "10.00 MB".to_string(), Vec::new());
        assert_eq!(page.step, "photo");
        assert_eq!(page.steps.len(), 5);
        assert!(page.steps.iter().all(|s| s.reachable));
        assert!(page.can_finish);
        assert_eq!(page.total, "$40.00");
        assert!(page.preview_config.contains("\"hasPhoto\":true"));
    }
}
