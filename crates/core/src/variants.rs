//! Bulk variant planning.
//!
//! The generator takes one or more choices per option category and expands
//! them into every combination. Matting is optional: with no mat selected
//! each combination gets a single variant without a mat.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{
    AspectRatioId, FrameColorId, FrameSizeId, FrameThicknessId, MattingOptionId, OrientationId,
    ProductId,
};

/// Stock given to generated variants unless overridden.
pub const DEFAULT_STOCK: i32 = 50;

/// Batches above this size get a warning before generating.
pub const LARGE_BATCH: usize = 1000;

/// Batches above this size are refused.
pub const MAX_BATCH: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VariantPlanError {
    #[error("Please select a product first")]
    NoProduct,
    #[error("Please select at least one option from {}", .0.label())]
    MissingCategory(VariantCategory),
    #[error("stock quantity cannot be negative: {0}")]
    InvalidStock(i32),
    #[error("{0} variants is more than the {max} allowed in one batch", max = MAX_BATCH)]
    TooLarge(usize),
}

/// Option categories of the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantCategory {
    AspectRatios,
    Orientations,
    Sizes,
    Colors,
    Thicknesses,
    Mattings,
}

impl VariantCategory {
    pub const ALL: [Self; 6] = [
        Self::AspectRatios,
        Self::Orientations,
        Self::Sizes,
        Self::Colors,
        Self::Thicknesses,
        Self::Mattings,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AspectRatios => "Aspect Ratios",
            Self::Orientations => "Orientations",
            Self::Sizes => "Sizes",
            Self::Colors => "Colors",
            Self::Thicknesses => "Thicknesses",
            Self::Mattings => "Matting Options",
        }
    }

    /// Form field name.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::AspectRatios => "aspect_ratio_ids",
            Self::Orientations => "orientation_ids",
            Self::Sizes => "size_ids",
            Self::Colors => "color_ids",
            Self::Thicknesses => "thickness_ids",
            Self::Mattings => "matting_ids",
        }
    }

    #[must_use]
    pub const fn is_required(self) -> bool {
        !matches!(self, Self::Mattings)
    }
}

/// The generator's checkbox state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSelection {
    pub product_id: Option<ProductId>,
    aspect_ratios: Vec<i32>,
    orientations: Vec<i32>,
    sizes: Vec<i32>,
    colors: Vec<i32>,
    thicknesses: Vec<i32>,
    mattings: Vec<i32>,
}

impl VariantSelection {
    #[must_use]
    pub fn new(product_id: Option<ProductId>) -> Self {
        Self {
            product_id,
            ..Self::default()
        }
    }

    const fn list(&self, category: VariantCategory) -> &Vec<i32> {
        match category {
            VariantCategory::AspectRatios => &self.aspect_ratios,
            VariantCategory::Orientations => &self.orientations,
            VariantCategory::Sizes => &self.sizes,
            VariantCategory::Colors => &self.colors,
            VariantCategory::Thicknesses => &self.thicknesses,
            VariantCategory::Mattings => &self.mattings,
        }
    }

    const fn list_mut(&mut self, category: VariantCategory) -> &mut Vec<i32> {
        match category {
            VariantCategory::AspectRatios => &mut self.aspect_ratios,
            VariantCategory::Orientations => &mut self.orientations,
            VariantCategory::Sizes => &mut self.sizes,
            VariantCategory::Colors => &mut self.colors,
            VariantCategory::Thicknesses => &mut self.thicknesses,
            VariantCategory::Mattings => &mut self.mattings,
        }
    }

    #[must_use]
    pub fn selected(&self, category: VariantCategory) -> &[i32] {
        self.list(category)
    }

    #[must_use]
    pub fn is_selected(&self, category: VariantCategory, id: i32) -> bool {
        self.list(category).contains(&id)
    }

    /// Add `id` if absent, remove it if present.
    pub fn toggle(&mut self, category: VariantCategory, id: i32) {
        let list = self.list_mut(category);
        if let Some(pos) = list.iter().position(|x| *x == id) {
            list.remove(pos);
        } else {
            list.push(id);
        }
    }

    /// Replace the category's selection, dropping duplicates.
    pub fn select_all(&mut self, category: VariantCategory, ids: impl IntoIterator<Item = i32>) {
        let list = self.list_mut(category);
        list.clear();
        for id in ids {
            if !list.contains(&id) {
                list.push(id);
            }
        }
    }

    pub fn clear(&mut self, category: VariantCategory) {
        self.list_mut(category).clear();
    }

    /// `∏ max(len, 1)` over every category.
    ///
    /// Empty categories count as one so the number shown while the form is
    /// being filled in stays meaningful.
    #[must_use]
    pub fn estimated_count(&self) -> usize {
        VariantCategory::ALL
            .iter()
            .map(|c| self.list(*c).len().max(1))
            .fold(1usize, usize::saturating_mul)
    }

    #[must_use]
    pub fn is_large(&self) -> bool {
        self.estimated_count() > LARGE_BATCH
    }

    /// Expand the selection into concrete variants.
    ///
    /// Combinations are emitted with aspect ratio outermost and matting
    /// innermost, each in selection order.
    ///
    /// # Errors
    ///
    /// Returns `VariantPlanError` if no product is chosen, a required
    /// category is empty, the stock is negative, or the batch exceeds
    /// [`MAX_BATCH`].
    pub fn plan(&self, default_stock: i32) -> Result<VariantPlan, VariantPlanError> {
        let product_id = self.product_id.ok_or(VariantPlanError::NoProduct)?;
        if let Some(missing) = VariantCategory::ALL
            .into_iter()
            .find(|c| c.is_required() && self.list(*c).is_empty())
        {
            return Err(VariantPlanError::MissingCategory(missing));
        }
        if default_stock < 0 {
            return Err(VariantPlanError::InvalidStock(default_stock));
        }
        let count = self.estimated_count();
        if count > MAX_BATCH {
            return Err(VariantPlanError::TooLarge(count));
        }

        let mattings: Vec<Option<MattingOptionId>> = if self.mattings.is_empty() {
            vec![None]
        } else {
            self.mattings
                .iter()
                .map(|m| Some(MattingOptionId::new(*m)))
                .collect()
        };

        let mut variants = Vec::with_capacity(count);
        for &ar in &self.aspect_ratios {
            for &or in &self.orientations {
                for &size in &self.sizes {
                    for &color in &self.colors {
                        for &thickness in &self.thicknesses {
                            for &matting in &mattings {
                                let mut variant = NewVariant {
                                    product_id,
                                    aspect_ratio_id: AspectRatioId::new(ar),
                                    orientation_id: OrientationId::new(or),
                                    size_id: FrameSizeId::new(size),
                                    color_id: FrameColorId::new(color),
                                    thickness_id: FrameThicknessId::new(thickness),
                                    matting_id: matting,
                                    sku: String::new(),
                                    stock_quantity: default_stock,
                                };
                                variant.sku = variant.generate_sku();
                                variants.push(variant);
                            }
                        }
                    }
                }
            }
        }

        Ok(VariantPlan {
            large: variants.len() > LARGE_BATCH,
            variants,
        })
    }
}

/// A variant about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVariant {
    pub product_id: ProductId,
    pub aspect_ratio_id: AspectRatioId,
    pub orientation_id: OrientationId,
    pub size_id: FrameSizeId,
    pub color_id: FrameColorId,
    pub thickness_id: FrameThicknessId,
    pub matting_id: Option<MattingOptionId>,
    pub sku: String,
    pub stock_quantity: i32,
}

impl NewVariant {
    /// `FC-{product}-{ratio}-{orientation}-{size}-{color}-{thickness}[-{mat}]`
    #[must_use]
    pub fn generate_sku(&self) -> String {
        let mut sku = format!(
            "FC-{}-{}-{}-{}-{}-{}",
            self.product_id,
            self.aspect_ratio_id,
            self.orientation_id,
            self.size_id,
            self.color_id,
            self.thickness_id
        );
        if let Some(matting) = self.matting_id {
            sku.push_str(&format!("-{matting}"));
        }
        sku
    }
}

/// Output of [`VariantSelection::plan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantPlan {
    pub variants: Vec<NewVariant>,
    /// More than [`LARGE_BATCH`] variants.
    pub large: bool,
}

/// Result of inserting a plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub requested: usize,
    pub inserted: usize,
    /// Combinations that already existed.
    pub skipped: usize,
}

impl GenerationSummary {
    #[must_use]
    pub fn message(&self) -> String {
        if self.skipped == 0 {
            format!("Created {} variants", self.inserted)
        } else {
            format!(
                "Created {} variants ({} already existed)",
                self.inserted, self.skipped
            )
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn full_selection() -> VariantSelection {
        let mut s = VariantSelection::new(Some(ProductId::new(7)));
        s.select_all(VariantCategory::AspectRatios, [1, 2]);
        s.select_all(VariantCategory::Orientations, [1]);
        s.select_all(VariantCategory::Sizes, [3, 4, 5]);
        s.select_all(VariantCategory::Colors, [1]);
        s.select_all(VariantCategory::Thicknesses, [2]);
        s
    }

    #[test]
    fn test_toggle_select_clear() {
        let mut s = VariantSelection::default();
        s.toggle(VariantCategory::Colors, 4);
        s.toggle(VariantCategory::Colors, 5);
        assert_eq!(s.selected(VariantCategory::Colors), &[4, 5]);
        s.toggle(VariantCategory::Colors, 4);
        assert_eq!(s.selected(VariantCategory::Colors), &[5]);
        s.select_all(VariantCategory::Colors, [1, 1, 2]);
        assert_eq!(s.selected(VariantCategory::Colors), &[1, 2]);
        s.clear(VariantCategory::Colors);
        assert!(s.selected(VariantCategory::Colors).is_empty());
    }

    #[test]
    fn test_estimate_counts_empty_as_one() {
        let mut s = VariantSelection::default();
        assert_eq!(s.estimated_count(), 1);
        s.select_all(VariantCategory::Sizes, [1, 2, 3]);
        s.select_all(VariantCategory::Colors, [1, 2]);
        assert_eq!(s.estimated_count(), 6);
        s.select_all(VariantCategory::Mattings, [1, 2]);
        assert_eq!(s.estimated_count(), 12);
    }

    #[test]
    fn test_plan_expands_in_stable_order() {
        let plan = full_selection().plan(DEFAULT_STOCK).unwrap();
        assert_eq!(plan.variants.len(), 6);
        assert!(!plan.large);

        let first = &plan.variants[0];
        assert_eq!(first.aspect_ratio_id, AspectRatioId::new(1));
        assert_eq!(first.size_id, FrameSizeId::new(3));
        assert_eq!(first.matting_id, None);
        assert_eq!(first.stock_quantity, 50);
        assert_eq!(first.sku, "FC-7-1-1-3-1-2");

        let last = &plan.variants[5];
        assert_eq!(last.aspect_ratio_id, AspectRatioId::new(2));
        assert_eq!(last.size_id, FrameSizeId::new(5));
    }

    #[test]
    fn test_plan_with_mattings() {
        let mut s = full_selection();
        s.select_all(VariantCategory::Mattings, [9, 8]);
        let plan = s.plan(10).unwrap();
        assert_eq!(plan.variants.len(), 12);
        assert_eq!(plan.variants[0].matting_id, Some(MattingOptionId::new(9)));
        assert_eq!(plan.variants[1].matting_id, Some(MattingOptionId::new(8)));
        assert_eq!(plan.variants[1].sku, "FC-7-1-1-3-1-2-8");
    }

    #[test]
    fn test_plan_requires_product_and_categories() {
        let mut s = full_selection();
        s.product_id = None;
        assert_eq!(s.plan(1).unwrap_err(), VariantPlanError::NoProduct);

        let mut s = full_selection();
        s.clear(VariantCategory::Orientations);
        let err = s.plan(1).unwrap_err();
        assert_eq!(
            err,
            VariantPlanError::MissingCategory(VariantCategory::Orientations)
        );
        assert_eq!(
            err.to_string(),
            "Please select at least one option from Orientations"
        );

        assert_eq!(
            full_selection().plan(-1).unwrap_err(),
            VariantPlanError::InvalidStock(-1)
        );
    }

    #[test]
    fn test_batch_limits() {
        let mut s = full_selection();
        s.select_all(VariantCategory::Sizes, 0..20);
        s.select_all(VariantCategory::Colors, 0..30);
        // 2 * 1 * 20 * 30 * 1 = 1200
        let plan = s.plan(0).unwrap();
        assert!(plan.large);
        assert!(s.is_large());

        s.select_all(VariantCategory::Thicknesses, 0..10);
        assert_eq!(s.plan(0).unwrap_err(), VariantPlanError::TooLarge(12_000));
    }

    #[test]
    fn test_summary_message() {
        let summary = GenerationSummary {
            requested: 6,
            inserted: 4,
            skipped: 2,
        };
        assert_eq!(summary.message(), "Created 4 variants (2 already existed)");
    }
}
