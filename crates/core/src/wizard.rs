//! The five-step frame customization flow.
//!
//! A [`WizardDraft`] holds everything chosen so far. Each step has a
//! completion predicate ([`StepValidation`]); moving forward past an
//! incomplete step is refused, moving back is always allowed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::catalog::{AspectRatio, CatalogOptions};
use crate::preview::{FrameLayout, PhotoPosition, PreviewController, canvas_size};
use crate::pricing::{CustomDimensions, PriceQuote, PriceSelection, PricingError, calculate_total};
use crate::types::{
    FrameColorId, FrameSizeId, FrameThicknessId, GlassType, MattingOptionId, OrientationCode,
    PhotoId, ProductId,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WizardError {
    #[error("Please complete the {} step", .0.title())]
    StepIncomplete(WizardStep),
    #[error("The {} step is not available yet", .0.title())]
    StepLocked(WizardStep),
    #[error("Please complete all required steps")]
    Incomplete,
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Wizard stages in order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    Photo,
    Size,
    Frame,
    Style,
    Review,
}

impl WizardStep {
    pub const ALL: [Self; 5] = [
        Self::Photo,
        Self::Size,
        Self::Frame,
        Self::Style,
        Self::Review,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Size => "size",
            Self::Frame => "frame",
            Self::Style => "style",
            Self::Review => "review",
        }
    }

    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.slug() == slug)
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Photo => "Photo",
            Self::Size => "Size",
            Self::Frame => "Frame",
            Self::Style => "Style",
            Self::Review => "Review",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Photo => "Upload your photo",
            Self::Size => "Choose dimensions",
            Self::Frame => "Select style & color",
            Self::Style => "Matting & finishing",
            Self::Review => "Final preview",
        }
    }

    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    #[must_use]
    pub fn prev(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    #[must_use]
    pub const fn is_last(self) -> bool {
        matches!(self, Self::Review)
    }
}

/// The customer's uploaded photo as the wizard sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRef {
    pub id: PhotoId,
    pub url: String,
    pub file_name: String,
    /// Preview-space dimensions (after downscaling).
    pub width: u32,
    pub height: u32,
}

impl PhotoRef {
    #[must_use]
    pub fn size(&self) -> kurbo::Size {
        kurbo::Size::new(f64::from(self.width), f64::from(self.height))
    }
}

/// Which steps are complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StepValidation {
    pub photo: bool,
    pub size: bool,
    pub frame: bool,
    pub style: bool,
    pub review: bool,
}

impl StepValidation {
    #[must_use]
    pub fn for_draft(draft: &WizardDraft) -> Self {
        let photo = draft.photo.is_some();
        let size = draft.size_id.is_some()
            || (draft.custom_width.is_some() && draft.custom_height.is_some());
        let frame = draft.color_id.is_some() && draft.thickness_id.is_some();
        Self {
            photo,
            size,
            frame,
            style: true,
            review: photo && size && frame,
        }
    }

    #[must_use]
    pub const fn is_valid(&self, step: WizardStep) -> bool {
        match step {
            WizardStep::Photo => self.photo,
            WizardStep::Size => self.size,
            WizardStep::Frame => self.frame,
            WizardStep::Style => self.style,
            WizardStep::Review => self.review,
        }
    }

    /// The earliest step that is not complete.
    #[must_use]
    pub fn first_incomplete(&self) -> Option<WizardStep> {
        WizardStep::ALL.into_iter().find(|s| !self.is_valid(*s))
    }
}

/// How the size step was answered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SizeChoice {
    Standard { size_id: FrameSizeId },
    Custom { width_inches: f64, height_inches: f64 },
}

/// A partial update from one wizard form. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WizardUpdate {
    pub photo: Option<PhotoRef>,
    pub size: Option<SizeChoice>,
    pub color_id: Option<FrameColorId>,
    pub thickness_id: Option<FrameThicknessId>,
    /// `Some(None)` removes the mat.
    pub matting: Option<Option<MattingOptionId>>,
    pub glass_type: Option<GlassType>,
    pub special_instructions: Option<String>,
    pub position: Option<PhotoPosition>,
}

/// What `update` changed beyond the fields themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub refitted: bool,
    pub validation: StepValidation,
}

/// Persisted wizard state for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardDraft {
    pub product_id: ProductId,
    pub base_price: Decimal,
    pub photo: Option<PhotoRef>,
    #[serde(default)]
    pub position: PhotoPosition,
    pub size_id: Option<FrameSizeId>,
    pub custom_width: Option<f64>,
    pub custom_height: Option<f64>,
    pub color_id: Option<FrameColorId>,
    pub thickness_id: Option<FrameThicknessId>,
    pub matting_id: Option<MattingOptionId>,
    #[serde(default)]
    pub glass_type: GlassType,
    pub special_instructions: Option<String>,
    #[serde(default)]
    pub current_step: WizardStep,
    pub total_price: Decimal,
}

/// A completed customization ready for the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameCustomization {
    pub product_id: ProductId,
    pub photo: PhotoRef,
    pub position: PhotoPosition,
    pub size_id: Option<FrameSizeId>,
    pub custom: Option<CustomDimensions>,
    pub color_id: FrameColorId,
    pub thickness_id: FrameThicknessId,
    pub matting_id: Option<MattingOptionId>,
    pub glass_type: GlassType,
    pub special_instructions: Option<String>,
    pub unit_price: Decimal,
}

impl WizardDraft {
    #[must_use]
    pub fn new(product_id: ProductId, base_price: Decimal) -> Self {
        Self {
            product_id,
            base_price,
            photo: None,
            position: PhotoPosition::default(),
            size_id: None,
            custom_width: None,
            custom_height: None,
            color_id: None,
            thickness_id: None,
            matting_id: None,
            glass_type: GlassType::default(),
            special_instructions: None,
            current_step: WizardStep::Photo,
            total_price: base_price,
        }
    }

    /// Session key the draft is stored under.
    #[must_use]
    pub fn session_key(product_id: ProductId) -> String {
        format!("frame_wizard:{product_id}")
    }

    #[must_use]
    pub fn validation(&self) -> StepValidation {
        StepValidation::for_draft(self)
    }

    /// Custom dimensions, when both sides are set and no standard size is.
    #[must_use]
    pub fn custom_dimensions(&self) -> Option<CustomDimensions> {
        if self.size_id.is_some() {
            return None;
        }
        match (self.custom_width, self.custom_height) {
            (Some(w), Some(h)) => Some(CustomDimensions {
                width_inches: w,
                height_inches: h,
            }),
            _ => None,
        }
    }

    /// Itemized price of the current selection.
    ///
    /// # Errors
    ///
    /// Returns `PricingError` if a chosen option is unknown or custom
    /// dimensions are out of range.
    pub fn quote(&self, options: &CatalogOptions) -> Result<PriceQuote, PricingError> {
        let selection = PriceSelection::resolve(
            options,
            self.size_id,
            self.color_id,
            self.thickness_id,
            self.matting_id,
            self.custom_dimensions(),
        )?;
        calculate_total(self.base_price, &selection)
    }

    #[must_use]
    pub fn orientation(&self, options: &CatalogOptions) -> OrientationCode {
        if let Some(size) = self.size_id.and_then(|id| options.size(id)) {
            return size.orientation();
        }
        match (self.custom_width, self.custom_height) {
            (Some(w), Some(h)) => OrientationCode::from_dimensions(w, h),
            _ => OrientationCode::Portrait,
        }
    }

    /// Width and height of the chosen print size, in inches. Before a size
    /// is chosen this is the preview canvas, in pixels.
    #[must_use]
    pub fn print_dimensions(&self, options: &CatalogOptions) -> (f64, f64) {
        if let Some(size) = self.size_id.and_then(|id| options.size(id)) {
            return (size.width_inches, size.height_inches);
        }
        if let (Some(w), Some(h)) = (self.custom_width, self.custom_height) {
            return (w, h);
        }
        let canvas = canvas_size(self.orientation(options));
        (canvas.width, canvas.height)
    }

    /// The frame asset aspect ratio nearest to the chosen print size.
    #[must_use]
    pub fn aspect_ratio<'a>(&self, options: &'a CatalogOptions) -> Option<&'a AspectRatio> {
        let (width, height) = self.print_dimensions(options);
        options.closest_aspect_ratio(width, height)
    }

    /// Preview layout for the current selection.
    #[must_use]
    pub fn layout(&self, options: &CatalogOptions) -> FrameLayout {
        FrameLayout::from_inches(
            self.orientation(options),
            self.thickness_id
                .and_then(|id| options.thickness(id))
                .map(|t| t.width_inches),
            self.matting_id
                .and_then(|id| options.matting(id))
                .map(|m| m.thickness_inches),
        )
    }

    /// Preview controller resumed from the draft.
    #[must_use]
    pub fn controller(&self, options: &CatalogOptions) -> PreviewController {
        PreviewController::with_state(
            self.layout(options),
            self.photo.as_ref().map(PhotoRef::size),
            self.position,
        )
    }

    /// Merge a partial update, re-price, and re-fit the photo if the photo
    /// area changed or a new photo arrived.
    ///
    /// The draft is left untouched when the update is rejected.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::Pricing` if the update references an unknown
    /// option or invalid custom dimensions.
    pub fn update(
        &mut self,
        update: WizardUpdate,
        options: &CatalogOptions,
    ) -> Result<UpdateOutcome, WizardError> {
        let mut next = self.clone();
        let layout_before = self.layout(options);

        match update.size {
            Some(SizeChoice::Standard { size_id }) => {
                next.size_id = Some(size_id);
                next.custom_width = None;
                next.custom_height = None;
            }
            Some(SizeChoice::Custom {
                width_inches,
                height_inches,
            }) => {
                CustomDimensions::new(width_inches, height_inches)?;
                next.size_id = None;
                next.custom_width = Some(width_inches);
                next.custom_height = Some(height_inches);
            }
            None => {}
        }
        if let Some(color) = update.color_id {
            next.color_id = Some(color);
        }
        if let Some(thickness) = update.thickness_id {
            next.thickness_id = Some(thickness);
        }
        if let Some(matting) = update.matting {
            next.matting_id = matting;
        }
        if let Some(glass) = update.glass_type {
            next.glass_type = glass;
        }
        if let Some(notes) = update.special_instructions {
            let notes = notes.trim();
            next.special_instructions = (!notes.is_empty()).then(|| notes.to_string());
        }
        if let Some(position) = update.position {
            next.position = position.sanitized();
        }

        next.total_price = next.quote(options)?.total;

        let layout_after = next.layout(options);
        let mut controller = PreviewController::with_state(
            layout_before,
            next.photo.as_ref().map(PhotoRef::size),
            next.position,
        );
        next.position = controller.set_layout(layout_after);
        let mut refitted =
            controller.image().is_some() && layout_before.aperture_differs(&layout_after);
        if let Some(photo) = update.photo {
            next.position = controller.load_image(photo.size());
            next.photo = Some(photo);
            refitted = true;
        }

        *self = next;
        debug!(product_id = %self.product_id, refitted, total = %self.total_price, "Wizard draft updated");
        Ok(UpdateOutcome {
            refitted,
            validation: self.validation(),
        })
    }

    /// Advance one step.
    ///
    /// On the last step this is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::StepIncomplete` if the current step is not done.
    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        let Some(next) = self.current_step.next() else {
            return Ok(self.current_step);
        };
        if !self.validation().is_valid(self.current_step) {
            return Err(WizardError::StepIncomplete(self.current_step));
        }
        self.current_step = next;
        Ok(next)
    }

    pub fn prev(&mut self) -> WizardStep {
        if let Some(prev) = self.current_step.prev() {
            self.current_step = prev;
        }
        self.current_step
    }

    /// Jump to `target` if it is behind the current step or already complete.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::StepLocked` otherwise.
    pub fn go_to(&mut self, target: WizardStep) -> Result<WizardStep, WizardError> {
        if target <= self.current_step || self.validation().is_valid(target) {
            self.current_step = target;
            Ok(target)
        } else {
            Err(WizardError::StepLocked(target))
        }
    }

    /// `(index + 1) / 5 × 100`.
    #[must_use]
    pub const fn progress_percent(&self) -> u8 {
        ((self.current_step.index() + 1) * 100 / WizardStep::ALL.len()) as u8
    }

    /// Bring a stored draft up to date with the current catalog.
    ///
    /// Options that are gone or inactive are dropped, the price is
    /// recomputed, and the current step moves back to the first incomplete
    /// step if one now precedes it. Returns the names of dropped fields.
    pub fn restore(&mut self, options: &CatalogOptions, base_price: Decimal) -> Vec<&'static str> {
        let mut dropped = Vec::new();
        self.base_price = base_price;

        if self.size_id.is_some_and(|id| options.size(id).is_none()) {
            self.size_id = None;
            dropped.push("size");
        }
        if self.color_id.is_some_and(|id| options.color(id).is_none()) {
            self.color_id = None;
            dropped.push("color");
        }
        if self
            .thickness_id
            .is_some_and(|id| options.thickness(id).is_none())
        {
            self.thickness_id = None;
            dropped.push("thickness");
        }
        if self.matting_id.is_some_and(|id| options.matting(id).is_none()) {
            self.matting_id = None;
            dropped.push("matting");
        }
        if let (Some(w), Some(h)) = (self.custom_width, self.custom_height)
            && CustomDimensions::new(w, h).is_err()
        {
            self.custom_width = None;
            self.custom_height = None;
            dropped.push("custom dimensions");
        }

        self.total_price = self
            .quote(options)
            .map_or(self.base_price, |quote| quote.total);

        if let Some(first) = self.validation().first_incomplete()
            && first < self.current_step
        {
            self.current_step = first;
        }
        self.position = self.position.sanitized();

        dropped
    }

    /// Produce the finished customization.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::Incomplete` unless every required step is done,
    /// or `WizardError::Pricing` if the price cannot be computed.
    pub fn finish(&self, options: &CatalogOptions) -> Result<FrameCustomization, WizardError> {
        if !self.validation().review {
            return Err(WizardError::Incomplete);
        }
        let (Some(photo), Some(color_id), Some(thickness_id)) =
            (self.photo.clone(), self.color_id, self.thickness_id)
        else {
            return Err(WizardError::Incomplete);
        };
        let unit_price = self.quote(options)?.total;

        Ok(FrameCustomization {
            product_id: self.product_id,
            photo,
            position: self.position,
            size_id: self.size_id,
            custom: self.custom_dimensions(),
            color_id,
            thickness_id,
            matting_id: self.matting_id,
            glass_type: self.glass_type,
            special_instructions: self.special_instructions.clone(),
            unit_price,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::options;
    use crate::types::AspectRatioId;

    fn photo() -> PhotoRef {
        PhotoRef {
            id: PhotoId::new(1),
            url: "/media/uploads/s/p.jpg".to_string(),
            file_name: "p.jpg".to_string(),
            width: 720,
            height: 920,
        }
    }

    fn draft() -> WizardDraft {
        WizardDraft::new(ProductId::new(1), Decimal::new(40, 0))
    }

    fn complete(d: &mut WizardDraft) {
        d.update(
            WizardUpdate {
                photo: Some(photo()),
                size: Some(SizeChoice::Standard {
                    size_id: FrameSizeId::new(1),
                }),
                color_id: Some(FrameColorId::new(1)),
                thickness_id: Some(FrameThicknessId::new(1)),
                ..WizardUpdate::default()
            },
            &options(),
        )
        .unwrap();
    }

    #[test]
    fn test_step_metadata() {
        assert_eq!(WizardStep::Frame.title(), "Frame");
        assert_eq!(WizardStep::Style.description(), "Matting & finishing");
        assert_eq!(WizardStep::Review.next(), None);
        assert_eq!(WizardStep::Photo.prev(), None);
        assert_eq!(WizardStep::from_slug("size"), Some(WizardStep::Size));
    }

    #[test]
    fn test_session_key() {
        assert_eq!(
            WizardDraft::session_key(ProductId::new(12)),
            "frame_wizard:12"
        );
    }

    #[test]
    fn test_validation_predicates() {
        let mut d = draft();
        let v = d.validation();
        assert!(!v.photo && !v.size && !v.frame && v.style && !v.review);

        d.custom_width = Some(10.0);
        assert!(!d.validation().size);
        d.custom_height = Some(12.0);
        assert!(d.validation().size);

        d.color_id = Some(FrameColorId::new(1));
        assert!(!d.validation().frame);
        d.thickness_id = Some(FrameThicknessId::new(1));
        assert!(d.validation().frame);
        assert!(!d.validation().review);
        d.photo = Some(photo());
        assert!(d.validation().review);
    }

    #[test]
    fn test_next_blocks_on_incomplete_step() {
        let mut d = draft();
        let err = d.next().unwrap_err();
        assert_eq!(err.to_string(), "Please complete the Photo step");
        assert_eq!(d.current_step, WizardStep::Photo);

        complete(&mut d);
        assert_eq!(d.next().unwrap(), WizardStep::Size);
        assert_eq!(d.next().unwrap(), WizardStep::Frame);
        assert_eq!(d.next().unwrap(), WizardStep::Style);
        assert_eq!(d.next().unwrap(), WizardStep::Review);
        assert_eq!(d.next().unwrap(), WizardStep::Review);
        assert_eq!(d.progress_percent(), 100);
    }

    #[test]
    fn test_prev_and_go_to() {
        let mut d = draft();
        assert_eq!(d.prev(), WizardStep::Photo);
        assert!(matches!(
            d.go_to(WizardStep::Frame),
            Err(WizardError::StepLocked(WizardStep::Frame))
        ));
        // Style is always valid, so it can be jumped to
        assert_eq!(d.go_to(WizardStep::Style).unwrap(), WizardStep::Style);
        assert_eq!(d.go_to(WizardStep::Size).unwrap(), WizardStep::Size);
        assert_eq!(d.progress_percent(), 40);
    }

    #[test]
    fn test_update_prices_and_fits_photo() {
        let mut d = draft();
        let outcome = d
            .update(
                WizardUpdate {
                    photo: Some(photo()),
                    ..WizardUpdate::default()
                },
                &options(),
            )
            .unwrap();
        assert!(outcome.refitted);
        assert!(outcome.validation.photo);
        // Default photo area is 360x460; 720 wide fits at 0.5
        assert!((d.position.scale - 0.5).abs() < 1e-9);

        d.update(
            WizardUpdate {
                size: Some(SizeChoice::Standard {
                    size_id: FrameSizeId::new(2),
                }),
                color_id: Some(FrameColorId::new(2)),
                ..WizardUpdate::default()
            },
            &options(),
        )
        .unwrap();
        // 40 * 1.5 + 5
        assert_eq!(d.total_price, Decimal::new(65, 0));
    }

    #[test]
    fn test_mat_change_refits_photo() {
        let mut d = draft();
        complete(&mut d);
        let outcome = d
            .update(
                WizardUpdate {
                    matting: Some(Some(MattingOptionId::new(1))),
                    ..WizardUpdate::default()
                },
                &options(),
            )
            .unwrap();
        assert!(outcome.refitted);
        // Photo area with a 2" mat: 280 wide
        assert!((d.position.scale - 280.0 / 720.0).abs() < 1e-9);

        let outcome = d
            .update(
                WizardUpdate {
                    glass_type: Some(GlassType::AntiGlare),
                    ..WizardUpdate::default()
                },
                &options(),
            )
            .unwrap();
        assert!(!outcome.refitted);
    }

    #[test]
    fn test_aspect_ratio_follows_print_size_not_photo() {
        let mut opts = options();
        opts.aspect_ratios.push(AspectRatio {
            id: AspectRatioId::new(2),
            name: "1:1".to_string(),
            width_ratio: 1.0,
            height_ratio: 1.0,
            ratio_value: 1.0,
            sort_order: 1,
        });
        let mut d = draft();
        d.photo = Some(PhotoRef {
            width: 800,
            height: 800,
            ..photo()
        });
        d.size_id = Some(FrameSizeId::new(1));
        assert_eq!(d.print_dimensions(&opts), (8.0, 10.0));
        assert_eq!(d.aspect_ratio(&opts).map(|a| a.id), Some(AspectRatioId::new(1)));

        d.size_id = None;
        d.custom_width = Some(12.0);
        d.custom_height = Some(12.0);
        assert_eq!(d.aspect_ratio(&opts).map(|a| a.id), Some(AspectRatioId::new(2)));

        // No size yet: the portrait canvas
        d.photo = None;
        d.custom_width = None;
        d.custom_height = None;
        assert_eq!(d.aspect_ratio(&opts).map(|a| a.id), Some(AspectRatioId::new(1)));
    }

    #[test]
    fn test_custom_size_replaces_standard() {
        let mut d = draft();
        complete(&mut d);
        d.update(
            WizardUpdate {
                size: Some(SizeChoice::Custom {
                    width_inches: 16.0,
                    height_inches: 20.0,
                }),
                ..WizardUpdate::default()
            },
            &options(),
        )
        .unwrap();
        assert_eq!(d.size_id, None);
        // 40 * 4.8
        assert_eq!(d.total_price, Decimal::new(192, 0));
    }

    #[test]
    fn test_rejected_update_leaves_draft_untouched() {
        let mut d = draft();
        let before = d.clone();
        let err = d
            .update(
                WizardUpdate {
                    size: Some(SizeChoice::Custom {
                        width_inches: 100.0,
                        height_inches: 20.0,
                    }),
                    ..WizardUpdate::default()
                },
                &options(),
            )
            .unwrap_err();
        assert!(matches!(err, WizardError::Pricing(_)));
        assert_eq!(d, before);
        assert!(
            d.update(
                WizardUpdate {
                    color_id: Some(FrameColorId::new(42)),
                    ..WizardUpdate::default()
                },
                &options(),
            )
            .is_err()
        );
    }

    #[test]
    fn test_restore_drops_inactive_options() {
        let mut d = draft();
        complete(&mut d);
        d.current_step = WizardStep::Review;

        let mut opts = options();
        opts.thicknesses.retain(|t| t.id != FrameThicknessId::new(1));
        let dropped = d.restore(&opts, Decimal::new(50, 0));

        assert_eq!(dropped, vec!["thickness"]);
        assert_eq!(d.thickness_id, None);
        assert_eq!(d.current_step, WizardStep::Frame);
        assert_eq!(d.total_price, Decimal::new(50, 0));
    }

    #[test]
    fn test_finish_requires_review() {
        let mut d = draft();
        assert!(matches!(d.finish(&options()), Err(WizardError::Incomplete)));
        complete(&mut d);
        let done = d.finish(&options()).unwrap();
        assert_eq!(done.unit_price, Decimal::new(40, 0));
        assert_eq!(done.custom, None);
        assert_eq!(done.photo.id, PhotoId::new(1));
    }

    #[test]
    fn test_non_finite_position_survives_session_round_trip() {
        let mut d = draft();
        complete(&mut d);
        d.update(
            WizardUpdate {
                position: Some(PhotoPosition {
                    x: f64::NEG_INFINITY,
                    y: 12.0,
                    scale: f64::NAN,
                    rotation: f64::INFINITY,
                }),
                ..WizardUpdate::default()
            },
            &options(),
        )
        .unwrap();
        assert!(d.position.x.abs() < 1e-9);
        assert!((d.position.y - 12.0).abs() < 1e-9);

        let json = serde_json::to_string(&d).unwrap();
        let back: WizardDraft = serde_json::from_str(&json).unwrap();
        assert_eq!(back.position, d.position);
    }

    #[test]
    fn test_draft_serializes_for_session() {
        let mut d = draft();
        complete(&mut d);
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["current_step"], "photo");
        let back: WizardDraft = serde_json::from_value(json).unwrap();
        assert_eq!(back, d);
    }
}
