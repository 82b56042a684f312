//! Catalog and gallery filtering.
//!
//! Filters are parsed from query strings, so every field has a "match all"
//! state and unknown codes fall back to it.

use std::cmp::Reverse;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{GalleryItem, Product};
use crate::types::FrameStyle;

/// Occasion codes offered on the gallery page, with labels.
pub const OCCASIONS: &[(&str, &str)] = &[
    ("wedding", "Wedding"),
    ("family", "Family"),
    ("baby", "Baby"),
    ("graduation", "Graduation"),
    ("pet", "Pet"),
];

/// Room codes offered on the gallery page, with labels.
pub const ROOMS: &[(&str, &str)] = &[
    ("living", "Living Room"),
    ("bedroom", "Bedroom"),
    ("office", "Office"),
    ("nursery", "Nursery"),
    ("hallway", "Hallway"),
];

/// Price bands used by both gallery and catalog filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceBand {
    #[serde(rename = "under50")]
    Under50,
    #[serde(rename = "50to100")]
    From50To100,
    #[serde(rename = "100to200")]
    From100To200,
    #[serde(rename = "over200")]
    Over200,
}

impl PriceBand {
    pub const ALL: [Self; 4] = [
        Self::Under50,
        Self::From50To100,
        Self::From100To200,
        Self::Over200,
    ];

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Under50 => "under50",
            Self::From50To100 => "50to100",
            Self::From100To200 => "100to200",
            Self::Over200 => "over200",
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.code() == code)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Under50 => "Under $50",
            Self::From50To100 => "$50-$100",
            Self::From100To200 => "$100-$200",
            Self::Over200 => "Over $200",
        }
    }

    /// Bands are half-open on the left: `[0, 50)`, `[50, 100]`, `(100, 200]`, `(200, ∞)`.
    #[must_use]
    pub fn contains(self, price: Decimal) -> bool {
        let fifty = Decimal::from(50);
        let hundred = Decimal::from(100);
        let two_hundred = Decimal::from(200);
        match self {
            Self::Under50 => price < fifty,
            Self::From50To100 => price >= fifty && price <= hundred,
            Self::From100To200 => price > hundred && price <= two_hundred,
            Self::Over200 => price > two_hundred,
        }
    }
}

/// Style keyword groups on the gallery page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GalleryStyle {
    #[default]
    All,
    Wood,
    Metal,
    Ornate,
    Modern,
}

impl GalleryStyle {
    pub const ALL: [Self; 5] = [Self::All, Self::Wood, Self::Metal, Self::Ornate, Self::Modern];

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Wood => "wood",
            Self::Metal => "metal",
            Self::Ornate => "ornate",
            Self::Modern => "modern",
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|s| s.code() == code)
            .unwrap_or_default()
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Styles",
            Self::Wood => "Wood Frames",
            Self::Metal => "Metal Frames",
            Self::Ornate => "Ornate Frames",
            Self::Modern => "Modern Frames",
        }
    }

    fn matches(self, item: &GalleryItem) -> bool {
        let material = item.material.to_lowercase();
        let style = item.frame_style.to_lowercase();
        let any = |haystack: &str, needles: &[&str]| needles.iter().any(|n| haystack.contains(n));
        match self {
            Self::All => true,
            Self::Wood => any(&material, &["wood", "oak", "pine", "barnwood"]),
            Self::Metal => any(&material, &["metal", "silver"]),
            Self::Ornate => style.contains("ornate") || material.contains("gold"),
            Self::Modern => style.contains("modern"),
        }
    }
}

/// Lowercased search text; blank means no search.
fn search_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

/// A filter code where blank and `"all"` mean no filter.
fn filter_code(value: Option<&str>) -> Option<String> {
    search_text(value).filter(|v| v != "all")
}

/// Gallery page filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryFilter {
    pub style: GalleryStyle,
    pub occasion: Option<String>,
    pub room: Option<String>,
    pub price_band: Option<PriceBand>,
    /// Lowercased search text.
    pub search: Option<String>,
}

impl GalleryFilter {
    /// Build from raw query values. Blanks mean no filter, as does `"all"`
    /// for every field except the search text.
    #[must_use]
    pub fn from_query(
        style: Option<&str>,
        occasion: Option<&str>,
        room: Option<&str>,
        price: Option<&str>,
        search: Option<&str>,
    ) -> Self {
        Self {
            style: style.map(GalleryStyle::from_code).unwrap_or_default(),
            occasion: filter_code(occasion),
            room: filter_code(room),
            price_band: price.and_then(PriceBand::from_code),
            search: search_text(search),
        }
    }

    #[must_use]
    pub fn matches(&self, item: &GalleryItem) -> bool {
        if !self.style.matches(item) {
            return false;
        }
        if let Some(occasion) = &self.occasion
            && item.occasion.as_deref() != Some(occasion.as_str())
        {
            return false;
        }
        if let Some(room) = &self.room
            && item.room_type.as_deref() != Some(room.as_str())
        {
            return false;
        }
        if let Some(band) = self.price_band
            && item.price_range.as_deref() != Some(band.code())
        {
            return false;
        }
        if let Some(query) = &self.search {
            let hit = |field: &str| field.to_lowercase().contains(query.as_str());
            return hit(&item.title)
                || hit(&item.description)
                || hit(&item.frame_style)
                || hit(&item.material)
                || item.customer_name.as_deref().is_some_and(hit);
        }
        true
    }

    #[must_use]
    pub fn apply<'a>(&self, items: &'a [GalleryItem]) -> Vec<&'a GalleryItem> {
        items.iter().filter(|item| self.matches(item)).collect()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        *self != Self::default()
    }
}

/// Catalog sort orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    #[default]
    Featured,
    Newest,
    PriceLow,
    PriceHigh,
    Name,
}

impl ProductSort {
    pub const ALL: [Self; 5] = [
        Self::Featured,
        Self::Newest,
        Self::PriceLow,
        Self::PriceHigh,
        Self::Name,
    ];

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::Newest => "newest",
            Self::PriceLow => "price_low",
            Self::PriceHigh => "price_high",
            Self::Name => "name",
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|s| s.code() == code)
            .unwrap_or_default()
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Featured => "Featured",
            Self::Newest => "Newest",
            Self::PriceLow => "Price: Low to High",
            Self::PriceHigh => "Price: High to Low",
            Self::Name => "Name",
        }
    }
}

/// Product grid filter, used by both the storefront and the admin list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFilter {
    /// Lowercased name search.
    pub search: Option<String>,
    pub style: Option<FrameStyle>,
    pub price_band: Option<PriceBand>,
    pub active_only: bool,
    pub sort: ProductSort,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            search: None,
            style: None,
            price_band: None,
            active_only: true,
            sort: ProductSort::default(),
        }
    }
}

impl ProductFilter {
    #[must_use]
    pub fn from_query(
        search: Option<&str>,
        style: Option<&str>,
        price: Option<&str>,
        sort: Option<&str>,
    ) -> Self {
        Self {
            search: search_text(search),
            style: style.and_then(|s| s.parse().ok()),
            price_band: price.and_then(PriceBand::from_code),
            sort: sort.map(ProductSort::from_code).unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Include inactive products (admin list).
    #[must_use]
    pub const fn including_inactive(mut self) -> Self {
        self.active_only = false;
        self
    }

    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if self.active_only && !product.is_active {
            return false;
        }
        if let Some(query) = &self.search
            && !product.name.to_lowercase().contains(query.as_str())
        {
            return false;
        }
        if self.style.is_some_and(|s| s != product.style) {
            return false;
        }
        if self
            .price_band
            .is_some_and(|band| !band.contains(product.base_price))
        {
            return false;
        }
        true
    }

    /// Filter and sort.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let mut out: Vec<&Product> = products.iter().filter(|p| self.matches(p)).collect();
        match self.sort {
            ProductSort::Featured => {
                out.sort_by_key(|p| (Reverse(p.is_featured), Reverse(p.popularity_score)));
            }
            ProductSort::Newest => out.sort_by_key(|p| Reverse(p.created_at)),
            ProductSort::PriceLow => out.sort_by_key(|p| p.base_price),
            ProductSort::PriceHigh => out.sort_by_key(|p| Reverse(p.base_price)),
            ProductSort::Name => out.sort_by_key(|p| p.name.to_lowercase()),
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::types::{FrameMaterial, GalleryItemId, ProductId};

    fn item(id: i32, title: &str, style: &str, material: &str) -> GalleryItem {
        GalleryItem {
            id: GalleryItemId::new(id),
            title: title.to_string(),
            description: String::new(),
            image_url: "/placeholder.svg".to_string(),
            frame_style: style.to_string(),
            material: material.to_string(),
            customer_name: None,
            rating: Some(5),
            product_id: None,
            occasion: Some("family".to_string()),
            room_type: Some("living".to_string()),
            price_range: Some("50to100".to_string()),
            testimonial: None,
            size_label: None,
        }
    }

    fn gallery() -> Vec<GalleryItem> {
        vec![
            item(1, "Family Portrait", "Classic Wood", "Oak"),
            item(2, "Wedding Photo", "Elegant Silver", "Silver Metal"),
            item(3, "Pet Portrait", "Baroque", "Gold Leaf"),
            item(4, "Landscape", "Modern Black", "Aluminum"),
            item(5, "Barn", "Rustic", "Reclaimed Barnwood"),
        ]
    }

    fn ids(items: &[&GalleryItem]) -> Vec<i32> {
        items.iter().map(|i| i.id.as_i32()).collect()
    }

    #[test]
    fn test_gallery_style_keywords() {
        let items = gallery();
        let by_style = |code| GalleryFilter::from_query(Some(code), None, None, None, None);
        assert_eq!(ids(&by_style("wood").apply(&items)), vec![1, 5]);
        assert_eq!(ids(&by_style("metal").apply(&items)), vec![2]);
        assert_eq!(ids(&by_style("ornate").apply(&items)), vec![3]);
        assert_eq!(ids(&by_style("modern").apply(&items)), vec![4]);
        assert_eq!(by_style("all").apply(&items).len(), 5);
        assert_eq!(by_style("bogus").apply(&items).len(), 5);
    }

    #[test]
    fn test_gallery_search_is_case_insensitive() {
        let mut items = gallery();
        items[0].customer_name = Some("Sarah M.".to_string());
        let filter = GalleryFilter::from_query(None, None, None, None, Some("SARAH"));
        assert_eq!(ids(&filter.apply(&items)), vec![1]);
        let filter = GalleryFilter::from_query(None, None, None, None, Some("silver"));
        assert_eq!(ids(&filter.apply(&items)), vec![2]);
    }

    #[test]
    fn test_search_for_all_is_literal_text() {
        let mut items = gallery();
        let filter = GalleryFilter::from_query(None, None, None, None, Some("All"));
        assert!(filter.is_active());
        assert!(filter.apply(&items).is_empty());

        items[4].title = "Small Gallery Wall".to_string();
        assert_eq!(ids(&filter.apply(&items)), vec![5]);

        let products = vec![
            product(1, "Oak Classic", 45, FrameStyle::Classic, 3),
            product(2, "Tall Walnut", 80, FrameStyle::Classic, 1),
        ];
        let f = ProductFilter::from_query(Some("all"), None, None, None);
        assert_eq!(f.apply(&products).len(), 1);
        assert_eq!(f.apply(&products)[0].id, ProductId::new(2));
    }

    #[test]
    fn test_gallery_occasion_room_price() {
        let mut items = gallery();
        items[1].occasion = Some("wedding".to_string());
        items[2].room_type = Some("office".to_string());
        items[3].price_range = Some("over200".to_string());

        let f = GalleryFilter::from_query(None, Some("wedding"), None, None, None);
        assert_eq!(ids(&f.apply(&items)), vec![2]);
        let f = GalleryFilter::from_query(None, None, Some("office"), None, None);
        assert_eq!(ids(&f.apply(&items)), vec![3]);
        let f = GalleryFilter::from_query(None, None, None, Some("over200"), None);
        assert_eq!(ids(&f.apply(&items)), vec![4]);
        assert!(f.is_active());
        assert!(!GalleryFilter::from_query(Some("all"), Some("all"), None, None, Some(" ")).is_active());
    }

    #[test]
    fn test_price_band_edges() {
        assert!(PriceBand::Under50.contains(Decimal::new(4999, 2)));
        assert!(!PriceBand::Under50.contains(Decimal::from(50)));
        assert!(PriceBand::From50To100.contains(Decimal::from(100)));
        assert!(PriceBand::From100To200.contains(Decimal::new(10001, 2)));
        assert!(PriceBand::Over200.contains(Decimal::new(20001, 2)));
        assert_eq!(PriceBand::from_code("50to100"), Some(PriceBand::From50To100));
    }

    fn product(id: i32, name: &str, price: i64, style: FrameStyle, age_days: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            description: None,
            base_price: Decimal::from(price),
            image_url: None,
            style,
            material: FrameMaterial::Wood,
            is_active: true,
            is_featured: id == 3,
            popularity_score: id,
            stock_quantity: 10,
            created_at: Utc::now() - Duration::days(age_days),
        }
    }

    #[test]
    fn test_product_filter_and_sort() {
        let mut products = vec![
            product(1, "Oak Classic", 45, FrameStyle::Classic, 3),
            product(2, "Slim Black", 120, FrameStyle::Modern, 1),
            product(3, "Gilded Baroque", 250, FrameStyle::Ornate, 2),
        ];

        let f = ProductFilter::from_query(Some("oak"), None, None, None);
        assert_eq!(f.apply(&products).len(), 1);

        let f = ProductFilter::from_query(None, Some("modern"), None, None);
        assert_eq!(f.apply(&products)[0].id, ProductId::new(2));

        let f = ProductFilter::from_query(None, None, Some("under50"), None);
        assert_eq!(f.apply(&products)[0].id, ProductId::new(1));

        let order = |sort| {
            ProductFilter::from_query(None, None, None, Some(sort))
                .apply(&products)
                .iter()
                .map(|p| p.id.as_i32())
                .collect::<Vec<_>>()
        };
        assert_eq!(order("featured"), vec![3, 2, 1]);
        assert_eq!(order("newest"), vec![2, 3, 1]);
        assert_eq!(order("price_high"), vec![3, 2, 1]);
        assert_eq!(order("name"), vec![3, 1, 2]);

        products[0].is_active = false;
        let f = ProductFilter::default();
        assert_eq!(f.apply(&products).len(), 2);
        assert_eq!(f.including_inactive().apply(&products).len(), 3);
    }
}
