//! Price calculation from selected frame options.
//!
//! The total is built in a fixed order:
//!
//! 1. start at the product's base price
//! 2. `× size.price_multiplier`
//! 3. `+ color.price_adjustment`
//! 4. `× thickness.price_multiplier`
//! 5. `+ matting.price_adjustment`
//! 6. custom dimensions without a standard size: `× (w·h / 80) × 1.2`
//!
//! The custom factor scales against the 8×10 reference print (80 in²) and
//! adds a 20% premium. Only the final total is rounded.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{
    CatalogOptions, FrameColor, FrameSize, FrameThickness, MattingOption, ProductVariant,
};
use crate::types::price::round_cents;
use crate::types::{FrameColorId, FrameSizeId, FrameThicknessId, MattingOptionId};

/// Largest accepted custom side, in inches.
pub const MAX_CUSTOM_INCHES: f64 = 60.0;

/// Area of the 8×10 reference print, in square inches.
const REFERENCE_AREA: Decimal = Decimal::from_parts(80, 0, 0, false, 0);

/// Premium on custom sizes (1.2).
const CUSTOM_PREMIUM: Decimal = Decimal::from_parts(12, 0, 0, false, 1);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    #[error("custom dimensions must be between 0 and {max} inches, got {width} x {height}")]
    InvalidCustomDimensions { width: f64, height: f64, max: f64 },
    #[error("unknown or inactive {kind} option: {id}")]
    UnknownOption { kind: &'static str, id: i32 },
    #[error("price came out negative: {0}")]
    NegativeTotal(Decimal),
}

/// Custom print dimensions in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CustomDimensions {
    pub width_inches: f64,
    pub height_inches: f64,
}

impl CustomDimensions {
    /// Validate and build custom dimensions.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidCustomDimensions` unless both sides are
    /// finite, positive, and at most [`MAX_CUSTOM_INCHES`].
    pub fn new(width_inches: f64, height_inches: f64) -> Result<Self, PricingError> {
        let valid = |v: f64| v.is_finite() && v > 0.0 && v <= MAX_CUSTOM_INCHES;
        if valid(width_inches) && valid(height_inches) {
            Ok(Self {
                width_inches,
                height_inches,
            })
        } else {
            Err(PricingError::InvalidCustomDimensions {
                width: width_inches,
                height: height_inches,
                max: MAX_CUSTOM_INCHES,
            })
        }
    }

    /// `(w·h / 80) × 1.2`.
    fn price_factor(self) -> Result<Decimal, PricingError> {
        let invalid = || PricingError::InvalidCustomDimensions {
            width: self.width_inches,
            height: self.height_inches,
            max: MAX_CUSTOM_INCHES,
        };
        let w = Decimal::try_from(self.width_inches).map_err(|_| invalid())?;
        let h = Decimal::try_from(self.height_inches).map_err(|_| invalid())?;
        Ok(w * h / REFERENCE_AREA * CUSTOM_PREMIUM)
    }
}

/// The options feeding a price calculation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceSelection<'a> {
    pub size: Option<&'a FrameSize>,
    pub color: Option<&'a FrameColor>,
    pub thickness: Option<&'a FrameThickness>,
    pub matting: Option<&'a MattingOption>,
    pub custom: Option<CustomDimensions>,
}

impl<'a> PriceSelection<'a> {
    /// Resolve option ids against the catalog.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::UnknownOption` if an id is not an active option.
    pub fn resolve(
        options: &'a CatalogOptions,
        size: Option<FrameSizeId>,
        color: Option<FrameColorId>,
        thickness: Option<FrameThicknessId>,
        matting: Option<MattingOptionId>,
        custom: Option<CustomDimensions>,
    ) -> Result<Self, PricingError> {
        let unknown = |kind, id: i32| PricingError::UnknownOption { kind, id };
        Ok(Self {
            size: size
                .map(|id| options.size(id).ok_or_else(|| unknown("size", id.as_i32())))
                .transpose()?,
            color: color
                .map(|id| options.color(id).ok_or_else(|| unknown("color", id.as_i32())))
                .transpose()?,
            thickness: thickness
                .map(|id| {
                    options
                        .thickness(id)
                        .ok_or_else(|| unknown("thickness", id.as_i32()))
                })
                .transpose()?,
            matting: matting
                .map(|id| {
                    options
                        .matting(id)
                        .ok_or_else(|| unknown("matting", id.as_i32()))
                })
                .transpose()?,
            custom,
        })
    }
}

/// How an adjustment modifies the running total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum Adjustment {
    Multiply(Decimal),
    Add(Decimal),
}

/// One applied step of a quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteLine {
    pub label: String,
    pub adjustment: Adjustment,
    /// Unrounded total after this step.
    pub running_total: Decimal,
}

/// An itemized price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub base_price: Decimal,
    pub lines: Vec<QuoteLine>,
    /// Total rounded to cents.
    pub total: Decimal,
}

/// Compute the price of a configured frame.
///
/// # Errors
///
/// Returns `PricingError::InvalidCustomDimensions` if custom dimensions are
/// used and out of range, or `PricingError::NegativeTotal` if adjustments
/// push the price below zero.
pub fn calculate_total(
    base_price: Decimal,
    selection: &PriceSelection<'_>,
) -> Result<PriceQuote, PricingError> {
    let mut total = base_price;
    let mut lines = Vec::new();
    let mut apply = |label: String, adjustment: Adjustment| {
        total = match adjustment {
            Adjustment::Multiply(factor) => total * factor,
            Adjustment::Add(amount) => total + amount,
        };
        lines.push(QuoteLine {
            label,
            adjustment,
            running_total: total,
        });
    };

    if let Some(size) = selection.size {
        apply(
            format!("Size {}", size.display_name),
            Adjustment::Multiply(size.price_multiplier),
        );
    }
    if let Some(color) = selection.color {
        apply(
            format!("{} finish", color.name),
            Adjustment::Add(color.price_adjustment),
        );
    }
    if let Some(thickness) = selection.thickness {
        apply(
            format!("{} moulding", thickness.name),
            Adjustment::Multiply(thickness.price_multiplier),
        );
    }
    if let Some(matting) = selection.matting {
        apply(
            format!("{} mat", matting.name),
            Adjustment::Add(matting.price_adjustment),
        );
    }
    if selection.size.is_none()
        && let Some(custom) = selection.custom
    {
        let custom = CustomDimensions::new(custom.width_inches, custom.height_inches)?;
        apply(
            format!(
                "Custom size {}x{} in",
                custom.width_inches, custom.height_inches
            ),
            Adjustment::Multiply(custom.price_factor()?),
        );
    }

    let total = round_cents(total);
    if total < Decimal::ZERO {
        return Err(PricingError::NegativeTotal(total));
    }

    Ok(PriceQuote {
        base_price,
        lines,
        total,
    })
}

/// The price of a variant: its override, or the computed option price.
///
/// # Errors
///
/// Returns `PricingError::UnknownOption` if the variant references an option
/// missing from `options`.
pub fn variant_price(
    base_price: Decimal,
    variant: &ProductVariant,
    options: &CatalogOptions,
) -> Result<Decimal, PricingError> {
    if let Some(price) = variant.price_override {
        return Ok(round_cents(price));
    }

    let selection = PriceSelection::resolve(
        options,
        Some(variant.size_id),
        Some(variant.color_id),
        Some(variant.thickness_id),
        variant.matting_id,
        None,
    )?;
    Ok(calculate_total(base_price, &selection)?.total)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::options;
    use crate::types::{AspectRatioId, OrientationId, ProductId, VariantId};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_base_price_only() {
        let quote = calculate_total(dec("45.00"), &PriceSelection::default()).unwrap();
        assert_eq!(quote.total, dec("45.00"));
        assert!(quote.lines.is_empty());
    }

    #[test]
    fn test_full_selection_order_of_operations() {
        let opts = options();
        // ((40 * 1.5) + 5) * 1.2 + 15 = 93
        let selection = PriceSelection::resolve(
            &opts,
            Some(FrameSizeId::new(2)),
            Some(FrameColorId::new(2)),
            Some(FrameThicknessId::new(2)),
            Some(MattingOptionId::new(1)),
            None,
        )
        .unwrap();
        let quote = calculate_total(dec("40"), &selection).unwrap();
        assert_eq!(quote.total, dec("93.00"));
        assert_eq!(quote.lines.len(), 4);
        assert_eq!(quote.lines[0].running_total, dec("60.0"));
    }

    #[test]
    fn test_custom_dimensions_apply_area_factor() {
        // 16x20 custom: 320 / 80 * 1.2 = 4.8
        let selection = PriceSelection {
            custom: Some(CustomDimensions::new(16.0, 20.0).unwrap()),
            ..PriceSelection::default()
        };
        let quote = calculate_total(dec("25"), &selection).unwrap();
        assert_eq!(quote.total, dec("120.00"));
    }

    #[test]
    fn test_custom_dimensions_ignored_with_standard_size() {
        let opts = options();
        let selection = PriceSelection {
            size: opts.size(FrameSizeId::new(1)),
            custom: Some(CustomDimensions::new(30.0, 40.0).unwrap()),
            ..PriceSelection::default()
        };
        let quote = calculate_total(dec("25"), &selection).unwrap();
        assert_eq!(quote.total, dec("25.00"));
    }

    #[test]
    fn test_total_rounds_half_away_from_zero() {
        // 7 x 7: 49 / 80 * 1.2 = 0.735; 1.5 * 0.735 = 1.1025 -> 1.10
        let selection = PriceSelection {
            custom: Some(CustomDimensions::new(7.0, 7.0).unwrap()),
            ..PriceSelection::default()
        };
        assert_eq!(
            calculate_total(dec("1.5"), &selection).unwrap().total,
            dec("1.10")
        );
        let selection = PriceSelection {
            custom: Some(CustomDimensions::new(5.0, 5.0).unwrap()),
            ..PriceSelection::default()
        };
        // 25 / 80 * 1.2 = 0.375; 0.1 * 0.375 = 0.0375 -> 0.04
        assert_eq!(
            calculate_total(dec("0.1"), &selection).unwrap().total,
            dec("0.04")
        );
    }

    #[test]
    fn test_custom_dimensions_bounds() {
        assert!(CustomDimensions::new(0.0, 10.0).is_err());
        assert!(CustomDimensions::new(10.0, -1.0).is_err());
        assert!(CustomDimensions::new(60.5, 10.0).is_err());
        assert!(CustomDimensions::new(f64::NAN, 10.0).is_err());
        assert!(CustomDimensions::new(60.0, 0.5).is_ok());
    }

    #[test]
    fn test_resolve_rejects_unknown_option() {
        let opts = options();
        let err = PriceSelection::resolve(&opts, Some(FrameSizeId::new(99)), None, None, None, None)
            .unwrap_err();
        assert_eq!(err, PricingError::UnknownOption { kind: "size", id: 99 });
    }

    #[test]
    fn test_negative_total_is_rejected() {
        let mut opts = options();
        opts.colors[0].price_adjustment = dec("-50");
        let selection = PriceSelection {
            color: opts.color(FrameColorId::new(1)),
            ..PriceSelection::default()
        };
        assert!(matches!(
            calculate_total(dec("10"), &selection),
            Err(PricingError::NegativeTotal(_))
        ));
    }

    fn variant(price_override: Option<Decimal>) -> ProductVariant {
        ProductVariant {
            id: VariantId::new(1),
            product_id: ProductId::new(1),
            aspect_ratio_id: AspectRatioId::new(1),
            orientation_id: OrientationId::new(1),
            size_id: FrameSizeId::new(2),
            color_id: FrameColorId::new(1),
            thickness_id: FrameThicknessId::new(1),
            matting_id: None,
            sku: None,
            stock_quantity: 50,
            price_override,
            variant_image_url: None,
            is_active: true,
        }
    }

    #[test]
    fn test_variant_price_prefers_override() {
        let opts = options();
        assert_eq!(
            variant_price(dec("40"), &variant(Some(dec("99.999"))), &opts).unwrap(),
            dec("100.00")
        );
        assert_eq!(
            variant_price(dec("40"), &variant(None), &opts).unwrap(),
            dec("60.00")
        );
    }
}
