//! Catalog domain records.
//!
//! These mirror the catalog tables column for column. With the `postgres`
//! feature they derive `sqlx::FromRow`, so the binaries can `query_as` them
//! directly.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{
    AspectRatioId, CartItemId, FrameAssetId, FrameColorId, FrameMaterial, FrameSizeId,
    FrameStyle, FrameThicknessId, GalleryItemId, GlassType, HexColor, MattingOptionId, OrderId,
    OrderItemId, OrderStatus, OrientationCode, OrientationId, PhotoId, ProductId, VariantId,
};

/// A frame product offered in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub base_price: Decimal,
    pub image_url: Option<String>,
    pub style: FrameStyle,
    pub material: FrameMaterial,
    pub is_active: bool,
    pub is_featured: bool,
    pub popularity_score: i32,
    pub stock_quantity: i32,
    pub created_at: DateTime<Utc>,
}

/// A standard print size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct FrameSize {
    pub id: FrameSizeId,
    pub display_name: String,
    pub width_inches: f64,
    pub height_inches: f64,
    pub price_multiplier: Decimal,
    pub is_active: bool,
}

impl FrameSize {
    #[must_use]
    pub fn orientation(&self) -> OrientationCode {
        OrientationCode::from_dimensions(self.width_inches, self.height_inches)
    }
}

/// A frame finish color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct FrameColor {
    pub id: FrameColorId,
    pub name: String,
    pub hex_code: HexColor,
    pub price_adjustment: Decimal,
    pub is_active: bool,
}

/// Moulding width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct FrameThickness {
    pub id: FrameThicknessId,
    pub name: String,
    pub width_inches: f64,
    pub price_multiplier: Decimal,
    pub is_active: bool,
}

/// A mat board inset between frame and photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct MattingOption {
    pub id: MattingOptionId,
    pub name: String,
    pub color_hex: HexColor,
    pub thickness_inches: f64,
    pub price_adjustment: Decimal,
    pub is_double_mat: bool,
    pub is_active: bool,
}

/// A photo aspect ratio such as `3:2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct AspectRatio {
    pub id: AspectRatioId,
    pub name: String,
    pub width_ratio: f64,
    pub height_ratio: f64,
    pub ratio_value: f64,
    pub sort_order: i32,
}

/// The aspect ratios offered out of the box, as `(name, ratio_value)`.
pub const STANDARD_ASPECT_RATIOS: &[(&str, f64)] = &[
    ("3:2", 1.5),
    ("4:3", 1.333),
    ("5:4", 1.25),
    ("1:1", 1.0),
    ("7:5", 1.4),
    ("16:9", 1.778),
    ("2:1", 2.0),
    ("3:1", 3.0),
];

/// An orientation row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Orientation {
    pub id: OrientationId,
    pub code: OrientationCode,
    pub name: String,
}

/// A customer showcase entry on the gallery page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct GalleryItem {
    pub id: GalleryItemId,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub frame_style: String,
    pub material: String,
    pub customer_name: Option<String>,
    pub rating: Option<i16>,
    pub product_id: Option<ProductId>,
    pub occasion: Option<String>,
    pub room_type: Option<String>,
    /// Price band code (`under50`, `50to100`, `100to200`, `over200`).
    pub price_range: Option<String>,
    pub testimonial: Option<String>,
    pub size_label: Option<String>,
}

/// A frame texture image for one aspect ratio, color, and thickness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct FrameAsset {
    pub id: FrameAssetId,
    pub aspect_ratio_id: AspectRatioId,
    pub color_id: FrameColorId,
    pub thickness_id: FrameThicknessId,
    pub storage_path: String,
    pub image_url: String,
    pub file_size: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// A sellable combination of product options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct ProductVariant {
    pub id: VariantId,
    pub product_id: ProductId,
    pub aspect_ratio_id: AspectRatioId,
    pub orientation_id: OrientationId,
    pub size_id: FrameSizeId,
    pub color_id: FrameColorId,
    pub thickness_id: FrameThicknessId,
    pub matting_id: Option<MattingOptionId>,
    pub sku: Option<String>,
    pub stock_quantity: i32,
    pub price_override: Option<Decimal>,
    pub variant_image_url: Option<String>,
    pub is_active: bool,
}

/// A customer photo uploaded during customization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct UploadedPhoto {
    pub id: PhotoId,
    pub session_id: String,
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub width_pixels: i32,
    pub height_pixels: i32,
    pub dpi: Option<i32>,
    pub storage_path: String,
    pub public_url: String,
    pub is_processed: bool,
    pub created_at: DateTime<Utc>,
}

/// A line in a shopping cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct CartItem {
    pub id: CartItemId,
    pub session_id: String,
    pub product_id: ProductId,
    pub photo_id: Option<PhotoId>,
    pub size_id: Option<FrameSizeId>,
    pub custom_width_inches: Option<f64>,
    pub custom_height_inches: Option<f64>,
    pub color_id: Option<FrameColorId>,
    pub thickness_id: Option<FrameThicknessId>,
    pub matting_id: Option<MattingOptionId>,
    pub glass_type: GlassType,
    pub custom_image_url: Option<String>,
    pub special_instructions: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub created_at: DateTime<Utc>,
}

impl CartItem {
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub email: String,
    #[cfg_attr(feature = "postgres", sqlx(json))]
    pub shipping_address: ShippingAddress,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// A line of a placed order, copied from a cart item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub photo_id: Option<PhotoId>,
    pub size_id: Option<FrameSizeId>,
    pub custom_width_inches: Option<f64>,
    pub custom_height_inches: Option<f64>,
    pub color_id: Option<FrameColorId>,
    pub thickness_id: Option<FrameThicknessId>,
    pub matting_id: Option<MattingOptionId>,
    pub glass_type: GlassType,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// Postal address stored as JSON on the order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub name: String,
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub country: String,
}

/// The active option sets a customer can choose from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogOptions {
    pub sizes: Vec<FrameSize>,
    pub colors: Vec<FrameColor>,
    pub thicknesses: Vec<FrameThickness>,
    pub mattings: Vec<MattingOption>,
    pub aspect_ratios: Vec<AspectRatio>,
    pub orientations: Vec<Orientation>,
}

impl CatalogOptions {
    #[must_use]
    pub fn size(&self, id: FrameSizeId) -> Option<&FrameSize> {
        self.sizes.iter().find(|s| s.id == id && s.is_active)
    }

    #[must_use]
    pub fn color(&self, id: FrameColorId) -> Option<&FrameColor> {
        self.colors.iter().find(|c| c.id == id && c.is_active)
    }

    #[must_use]
    pub fn thickness(&self, id: FrameThicknessId) -> Option<&FrameThickness> {
        self.thicknesses.iter().find(|t| t.id == id && t.is_active)
    }

    #[must_use]
    pub fn matting(&self, id: MattingOptionId) -> Option<&MattingOption> {
        self.mattings.iter().find(|m| m.id == id && m.is_active)
    }

    #[must_use]
    pub fn aspect_ratio(&self, id: AspectRatioId) -> Option<&AspectRatio> {
        self.aspect_ratios.iter().find(|a| a.id == id)
    }

    #[must_use]
    pub fn orientation(&self, id: OrientationId) -> Option<&Orientation> {
        self.orientations.iter().find(|o| o.id == id)
    }

    /// The aspect ratio nearest to a `width`×`height` image, ignoring
    /// orientation (ratios are stored long side over short side).
    #[must_use]
    pub fn closest_aspect_ratio(&self, width: f64, height: f64) -> Option<&AspectRatio> {
        let (long, short) = if width >= height {
            (width, height)
        } else {
            (height, width)
        };
        if short <= 0.0 {
            return None;
        }
        let ratio = long / short;
        let distance = |a: &AspectRatio| (a.ratio_value - ratio).abs();
        self.aspect_ratios
            .iter()
            .min_by(|a, b| distance(a).total_cmp(&distance(b)))
    }

    /// Drop inactive options, keeping declaration order.
    #[must_use]
    pub fn active_only(mut self) -> Self {
        self.sizes.retain(|s| s.is_active);
        self.colors.retain(|c| c.is_active);
        self.thicknesses.retain(|t| t.is_active);
        self.mattings.retain(|m| m.is_active);
        self
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Shared option sets for unit tests.

    use super::*;

    pub fn size(id: i32, w: f64, h: f64, multiplier: Decimal) -> FrameSize {
        FrameSize {
            id: FrameSizeId::new(id),
            display_name: format!("{w}x{h}"),
            width_inches: w,
            height_inches: h,
            price_multiplier: multiplier,
            is_active: true,
        }
    }

    pub fn color(id: i32, adjustment: Decimal) -> FrameColor {
        FrameColor {
            id: FrameColorId::new(id),
            name: format!("Color {id}"),
            hex_code: HexColor::WALNUT,
            price_adjustment: adjustment,
            is_active: true,
        }
    }

    pub fn thickness(id: i32, width: f64, multiplier: Decimal) -> FrameThickness {
        FrameThickness {
            id: FrameThicknessId::new(id),
            name: format!("{width}\""),
            width_inches: width,
            price_multiplier: multiplier,
            is_active: true,
        }
    }

    pub fn matting(id: i32, thickness: f64, adjustment: Decimal) -> MattingOption {
        MattingOption {
            id: MattingOptionId::new(id),
            name: format!("Mat {id}"),
            color_hex: HexColor::WHITE,
            thickness_inches: thickness,
            price_adjustment: adjustment,
            is_double_mat: false,
            is_active: true,
        }
    }

    /// Sizes 1 (8x10, x1.0) and 2 (16x20, x1.5); colors 1 (+0) and 2 (+5);
    /// thicknesses 1 (1", x1.0) and 2 (2", x1.2); matting 1 (2", +15).
    pub fn options() -> CatalogOptions {
        CatalogOptions {
            sizes: vec![
                size(1, 8.0, 10.0, Decimal::ONE),
                size(2, 16.0, 20.0, Decimal::new(15, 1)),
            ],
            colors: vec![color(1, Decimal::ZERO), color(2, Decimal::new(5, 0))],
            thicknesses: vec![
                thickness(1, 1.0, Decimal::ONE),
                thickness(2, 2.0, Decimal::new(12, 1)),
            ],
            mattings: vec![matting(1, 2.0, Decimal::new(15, 0))],
            aspect_ratios: vec![AspectRatio {
                id: AspectRatioId::new(1),
                name: "5:4".to_string(),
                width_ratio: 5.0,
                height_ratio: 4.0,
                ratio_value: 1.25,
                sort_order: 0,
            }],
            orientations: vec![Orientation {
                id: OrientationId::new(1),
                code: OrientationCode::Portrait,
                name: "Portrait".to_string(),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::options;
    use super::*;

    #[test]
    fn test_lookup_skips_inactive_options() {
        let mut opts = options();
        assert!(opts.color(FrameColorId::new(2)).is_some());
        if let Some(c) = opts.colors.get_mut(1) {
            c.is_active = false;
        }
        assert!(opts.color(FrameColorId::new(2)).is_none());
        assert_eq!(opts.active_only().colors.len(), 1);
    }

    #[test]
    fn test_closest_aspect_ratio() {
        let mut opts = options();
        opts.aspect_ratios.push(AspectRatio {
            id: AspectRatioId::new(2),
            name: "3:2".to_string(),
            width_ratio: 3.0,
            height_ratio: 2.0,
            ratio_value: 1.5,
            sort_order: 1,
        });
        let id = |w, h| opts.closest_aspect_ratio(w, h).map(|a| a.id.as_i32());
        assert_eq!(id(1200.0, 1000.0), Some(1));
        assert_eq!(id(800.0, 1200.0), Some(2));
        assert_eq!(id(0.0, 100.0), None);
        assert_eq!(CatalogOptions::default().closest_aspect_ratio(3.0, 2.0), None);
    }

    #[test]
    fn test_size_orientation() {
        let opts = options();
        let size = opts.size(FrameSizeId::new(1));
        assert_eq!(
            size.map(FrameSize::orientation),
            Some(OrientationCode::Portrait)
        );
    }

    #[test]
    fn test_cart_line_total() {
        let item = CartItem {
            id: CartItemId::new(1),
            session_id: "s".to_string(),
            product_id: ProductId::new(1),
            photo_id: None,
            size_id: None,
            custom_width_inches: None,
            custom_height_inches: None,
            color_id: None,
            thickness_id: None,
            matting_id: None,
            glass_type: GlassType::Standard,
            custom_image_url: None,
            special_instructions: None,
            quantity: 3,
            unit_price: Decimal::new(2550, 2),
            created_at: Utc::now(),
        };
        assert_eq!(item.line_total(), Decimal::new(7650, 2));
    }
}
