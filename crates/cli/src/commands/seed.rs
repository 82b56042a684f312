//! Seed the catalog from a YAML file.
//!
//! Loads option sets (sizes, colors, thicknesses, mattings, aspect ratios),
//! products, and gallery items. Option sets are upserted on their unique
//! names; products and gallery items are matched by name and title. Running
//! the same file twice leaves the database unchanged.
//!
//! The whole file is validated before connecting, and everything is written
//! in one transaction.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use framecraft_core::filter::{OCCASIONS, PriceBand, ROOMS};
use framecraft_core::{FrameMaterial, FrameStyle, HexColor};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{Postgres, Transaction};
use tracing::{error, info};

use framecraft_admin::db;

const fn yes() -> bool {
    true
}

const fn one() -> Decimal {
    Decimal::ONE
}

/// Contents of a catalog seed file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogSeed {
    #[serde(default)]
    pub aspect_ratios: Vec<AspectRatioSeed>,
    #[serde(default)]
    pub sizes: Vec<SizeSeed>,
    #[serde(default)]
    pub colors: Vec<ColorSeed>,
    #[serde(default)]
    pub thicknesses: Vec<ThicknessSeed>,
    #[serde(default)]
    pub mattings: Vec<MattingSeed>,
    #[serde(default)]
    pub products: Vec<ProductSeed>,
    #[serde(default)]
    pub gallery: Vec<GallerySeed>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AspectRatioSeed {
    pub name: String,
    pub width_ratio: f64,
    pub height_ratio: f64,
    #[serde(default)]
    pub sort_order: i32,
}

impl AspectRatioSeed {
    /// Long side over short side, so portrait and landscape share a value.
    #[must_use]
    pub fn ratio_value(&self) -> f64 {
        self.width_ratio.max(self.height_ratio) / self.width_ratio.min(self.height_ratio)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SizeSeed {
    pub display_name: String,
    pub width_inches: f64,
    pub height_inches: f64,
    #[serde(default = "one")]
    pub price_multiplier: Decimal,
    #[serde(default = "yes")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColorSeed {
    pub name: String,
    pub hex_code: String,
    #[serde(default)]
    pub price_adjustment: Decimal,
    #[serde(default = "yes")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThicknessSeed {
    pub name: String,
    pub width_inches: f64,
    #[serde(default = "one")]
    pub price_multiplier: Decimal,
    #[serde(default = "yes")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MattingSeed {
    pub name: String,
    pub color_hex: String,
    pub thickness_inches: f64,
    #[serde(default)]
    pub price_adjustment: Decimal,
    #[serde(default)]
    pub is_double_mat: bool,
    #[serde(default = "yes")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductSeed {
    pub name: String,
    pub description: Option<String>,
    pub base_price: Decimal,
    pub style: String,
    pub material: String,
    pub image_url: Option<String>,
    #[serde(default = "yes")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub popularity_score: i32,
    #[serde(default)]
    pub stock_quantity: i32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GallerySeed {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub image_url: String,
    pub frame_style: String,
    pub material: String,
    pub customer_name: Option<String>,
    pub rating: Option<i16>,
    /// Name of a product in the same file.
    pub product: Option<String>,
    pub occasion: Option<String>,
    pub room_type: Option<String>,
    pub price_range: Option<String>,
    pub testimonial: Option<String>,
    pub size_label: Option<String>,
}

/// Records names seen in one section and reports blanks and repeats.
fn check_names<'a>(
    section: &str,
    names: impl Iterator<Item = &'a str>,
    errors: &mut Vec<String>,
) {
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            errors.push(format!("{section}: blank name"));
        } else if !seen.insert(name) {
            errors.push(format!("{section}: duplicate name '{name}'"));
        }
    }
}

fn check_hex(section: &str, name: &str, code: &str, errors: &mut Vec<String>) {
    if let Err(e) = HexColor::parse(code) {
        errors.push(format!("{section} '{name}': {e}"));
    }
}

fn check_positive(section: &str, name: &str, field: &str, value: f64, errors: &mut Vec<String>) {
    if !(value.is_finite() && value > 0.0) {
        errors.push(format!("{section} '{name}': {field} must be positive"));
    }
}

fn check_code(
    name: &str,
    field: &str,
    value: Option<&str>,
    codes: &[(&str, &str)],
    errors: &mut Vec<String>,
) {
    if let Some(value) = value
        && !codes.iter().any(|(code, _)| *code == value)
    {
        errors.push(format!("gallery '{name}': unknown {field} '{value}'"));
    }
}

/// Check a seed file, returning every problem found.
#[must_use]
pub fn validate(seed: &CatalogSeed) -> Vec<String> {
    let mut errors = Vec::new();

    check_names(
        "aspect_ratios",
        seed.aspect_ratios.iter().map(|a| a.name.as_str()),
        &mut errors,
    );
    for ratio in &seed.aspect_ratios {
        check_positive("aspect ratio", &ratio.name, "width_ratio", ratio.width_ratio, &mut errors);
        check_positive("aspect ratio", &ratio.name, "height_ratio", ratio.height_ratio, &mut errors);
    }

    check_names(
        "sizes",
        seed.sizes.iter().map(|s| s.display_name.as_str()),
        &mut errors,
    );
    for size in &seed.sizes {
        check_positive("size", &size.display_name, "width_inches", size.width_inches, &mut errors);
        check_positive("size", &size.display_name, "height_inches", size.height_inches, &mut errors);
        if size.price_multiplier <= Decimal::ZERO {
            errors.push(format!("size '{}': price_multiplier must be positive", size.display_name));
        }
    }

    check_names("colors", seed.colors.iter().map(|c| c.name.as_str()), &mut errors);
    for color in &seed.colors {
        check_hex("color", &color.name, &color.hex_code, &mut errors);
    }

    check_names(
        "thicknesses",
        seed.thicknesses.iter().map(|t| t.name.as_str()),
        &mut errors,
    );
    for thickness in &seed.thicknesses {
        check_positive("thickness", &thickness.name, "width_inches", thickness.width_inches, &mut errors);
        if thickness.price_multiplier <= Decimal::ZERO {
            errors.push(format!("thickness '{}': price_multiplier must be positive", thickness.name));
        }
    }

    check_names("mattings", seed.mattings.iter().map(|m| m.name.as_str()), &mut errors);
    for matting in &seed.mattings {
        check_hex("matting", &matting.name, &matting.color_hex, &mut errors);
        if !(matting.thickness_inches.is_finite() && matting.thickness_inches >= 0.0) {
            errors.push(format!("matting '{}': thickness_inches must not be negative", matting.name));
        }
    }

    check_names("products", seed.products.iter().map(|p| p.name.as_str()), &mut errors);
    for product in &seed.products {
        if let Err(e) = product.style.parse::<FrameStyle>() {
            errors.push(format!("product '{}': {e}", product.name));
        }
        if let Err(e) = product.material.parse::<FrameMaterial>() {
            errors.push(format!("product '{}': {e}", product.name));
        }
        if product.base_price < Decimal::ZERO {
            errors.push(format!("product '{}': base_price must not be negative", product.name));
        }
        if product.stock_quantity < 0 {
            errors.push(format!("product '{}': stock_quantity must not be negative", product.name));
        }
    }

    let products: HashSet<&str> = seed.products.iter().map(|p| p.name.as_str()).collect();
    check_names("gallery", seed.gallery.iter().map(|g| g.title.as_str()), &mut errors);
    for item in &seed.gallery {
        if let Some(rating) = item.rating
            && !(1..=5).contains(&rating)
        {
            errors.push(format!("gallery '{}': rating must be 1-5, got {rating}", item.title));
        }
        if let Some(product) = &item.product
            && !products.contains(product.as_str())
        {
            errors.push(format!("gallery '{}': unknown product '{product}'", item.title));
        }
        if let Some(range) = &item.price_range
            && PriceBand::from_code(range).is_none()
        {
            errors.push(format!("gallery '{}': unknown price_range '{range}'", item.title));
        }
        check_code(&item.title, "occasion", item.occasion.as_deref(), OCCASIONS, &mut errors);
        check_code(&item.title, "room_type", item.room_type.as_deref(), ROOMS, &mut errors);
    }

    errors
}

/// Inserted and updated row counts for one table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub inserted: usize,
    pub updated: usize,
}

impl Tally {
    fn record(&mut self, inserted: bool) {
        if inserted {
            self.inserted += 1;
        } else {
            self.updated += 1;
        }
    }
}

/// Per-table results of a seed run.
#[derive(Debug, Default)]
pub struct SeedResult {
    pub aspect_ratios: Tally,
    pub sizes: Tally,
    pub colors: Tally,
    pub thicknesses: Tally,
    pub mattings: Tally,
    pub products: Tally,
    pub gallery: Tally,
}

impl SeedResult {
    fn log(&self) {
        for (table, tally) in [
            ("aspect_ratios", self.aspect_ratios),
            ("frame_sizes", self.sizes),
            ("frame_colors", self.colors),
            ("frame_thicknesses", self.thicknesses),
            ("matting_options", self.mattings),
            ("products", self.products),
            ("gallery_items", self.gallery),
        ] {
            info!(table, inserted = tally.inserted, updated = tally.updated, "Seeded");
        }
    }
}

/// Read and parse a seed file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid seed file.
pub async fn load(path: &Path) -> Result<CatalogSeed, Box<dyn std::error::Error>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    Ok(serde_yaml::from_str(&content)?)
}

/// Seed the catalog from a YAML file.
///
/// # Arguments
///
/// * `file_path` - Path to the catalog YAML file
/// * `dry_run` - If true, validate the file and stop before connecting
///
/// # Errors
///
/// Returns an error if the file is invalid, the database URL is missing,
/// or any write fails. A failed run writes nothing.
pub async fn catalog(file_path: &str, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading catalog from file");
    let seed = load(path).await?;
    info!(
        sizes = seed.sizes.len(),
        colors = seed.colors.len(),
        products = seed.products.len(),
        gallery = seed.gallery.len(),
        "Parsed catalog"
    );

    let errors = validate(&seed);
    if !errors.is_empty() {
        error!("Catalog validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }
    info!("Catalog validated successfully");

    if dry_run {
        info!("Dry run, nothing written");
        return Ok(());
    }

    let database_url = super::database_url()?;
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let mut tx = pool.begin().await?;
    let result = write(&mut tx, &seed).await?;
    tx.commit().await?;

    info!("Seeding complete");
    result.log();
    Ok(())
}

async fn write(
    tx: &mut Transaction<'_, Postgres>,
    seed: &CatalogSeed,
) -> Result<SeedResult, sqlx::Error> {
    let mut result = SeedResult::default();

    for ratio in &seed.aspect_ratios {
        let inserted: bool = sqlx::query_scalar(
            r"
            INSERT INTO aspect_ratios (name, width_ratio, height_ratio, ratio_value, sort_order)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (name) DO UPDATE SET
                width_ratio = EXCLUDED.width_ratio,
                height_ratio = EXCLUDED.height_ratio,
                ratio_value = EXCLUDED.ratio_value,
                sort_order = EXCLUDED.sort_order
            RETURNING (xmax = 0)
            ",
        )
        .bind(&ratio.name)
        .bind(ratio.width_ratio)
        .bind(ratio.height_ratio)
        .bind(ratio.ratio_value())
        .bind(ratio.sort_order)
        .fetch_one(&mut **tx)
        .await?;
        result.aspect_ratios.record(inserted);
    }

    for size in &seed.sizes {
        let inserted: bool = sqlx::query_scalar(
            r"
            INSERT INTO frame_sizes
                (display_name, width_inches, height_inches, price_multiplier, is_active, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (display_name) DO UPDATE SET
                width_inches = EXCLUDED.width_inches,
                height_inches = EXCLUDED.height_inches,
                price_multiplier = EXCLUDED.price_multiplier,
                is_active = EXCLUDED.is_active,
                sort_order = EXCLUDED.sort_order
            RETURNING (xmax = 0)
            ",
        )
        .bind(&size.display_name)
        .bind(size.width_inches)
        .bind(size.height_inches)
        .bind(size.price_multiplier)
        .bind(size.is_active)
        .bind(size.sort_order)
        .fetch_one(&mut **tx)
        .await?;
        result.sizes.record(inserted);
    }

    for color in &seed.colors {
        let inserted: bool = sqlx::query_scalar(
            r"
            INSERT INTO frame_colors (name, hex_code, price_adjustment, is_active, sort_order)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (name) DO UPDATE SET
                hex_code = EXCLUDED.hex_code,
                price_adjustment = EXCLUDED.price_adjustment,
                is_active = EXCLUDED.is_active,
                sort_order = EXCLUDED.sort_order
            RETURNING (xmax = 0)
            ",
        )
        .bind(&color.name)
        .bind(&color.hex_code)
        .bind(color.price_adjustment)
        .bind(color.is_active)
        .bind(color.sort_order)
        .fetch_one(&mut **tx)
        .await?;
        result.colors.record(inserted);
    }

    for thickness in &seed.thicknesses {
        let inserted: bool = sqlx::query_scalar(
            r"
            INSERT INTO frame_thicknesses
                (name, width_inches, price_multiplier, is_active, sort_order)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (name) DO UPDATE SET
                width_inches = EXCLUDED.width_inches,
                price_multiplier = EXCLUDED.price_multiplier,
                is_active = EXCLUDED.is_active,
                sort_order = EXCLUDED.sort_order
            RETURNING (xmax = 0)
            ",
        )
        .bind(&thickness.name)
        .bind(thickness.width_inches)
        .bind(thickness.price_multiplier)
        .bind(thickness.is_active)
        .bind(thickness.sort_order)
        .fetch_one(&mut **tx)
        .await?;
        result.thicknesses.record(inserted);
    }

    for matting in &seed.mattings {
        let inserted: bool = sqlx::query_scalar(
            r"
            INSERT INTO matting_options
                (name, color_hex, thickness_inches, price_adjustment, is_double_mat,
                 is_active, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (name) DO UPDATE SET
                color_hex = EXCLUDED.color_hex,
                thickness_inches = EXCLUDED.thickness_inches,
                price_adjustment = EXCLUDED.price_adjustment,
                is_double_mat = EXCLUDED.is_double_mat,
                is_active = EXCLUDED.is_active,
                sort_order = EXCLUDED.sort_order
            RETURNING (xmax = 0)
            ",
        )
        .bind(&matting.name)
        .bind(&matting.color_hex)
        .bind(matting.thickness_inches)
        .bind(matting.price_adjustment)
        .bind(matting.is_double_mat)
        .bind(matting.is_active)
        .bind(matting.sort_order)
        .fetch_one(&mut **tx)
        .await?;
        result.mattings.record(inserted);
    }

    let mut product_ids = HashMap::new();
    for product in &seed.products {
        let (id, inserted) = upsert_product(tx, product).await?;
        product_ids.insert(product.name.as_str(), id);
        result.products.record(inserted);
    }

    for item in &seed.gallery {
        let product_id = item
            .product
            .as_deref()
            .and_then(|name| product_ids.get(name).copied());
        let inserted = upsert_gallery_item(tx, item, product_id).await?;
        result.gallery.record(inserted);
    }

    Ok(result)
}

/// Update the first product with this name, or insert a new one.
async fn upsert_product(
    tx: &mut Transaction<'_, Postgres>,
    product: &ProductSeed,
) -> Result<(i32, bool), sqlx::Error> {
    // Validated before any write
    let style: FrameStyle = product.style.parse().unwrap_or_default();
    let material: FrameMaterial = product.material.parse().unwrap_or_default();

    let updated: Option<i32> = sqlx::query_scalar(
        r"
        UPDATE products SET
            description = $2,
            base_price = $3,
            style = $4,
            material = $5,
            image_url = COALESCE($6, image_url),
            is_active = $7,
            is_featured = $8,
            popularity_score = $9,
            stock_quantity = $10,
            updated_at = now()
        WHERE id = (SELECT id FROM products WHERE name = $1 ORDER BY id LIMIT 1)
        RETURNING id
        ",
    )
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.base_price)
    .bind(style)
    .bind(material)
    .bind(&product.image_url)
    .bind(product.is_active)
    .bind(product.is_featured)
    .bind(product.popularity_score)
    .bind(product.stock_quantity)
    .fetch_optional(&mut **tx)
    .await?;

    if let Some(id) = updated {
        return Ok((id, false));
    }

    let id: i32 = sqlx::query_scalar(
        r"
        INSERT INTO products
            (name, description, base_price, style, material, image_url,
             is_active, is_featured, popularity_score, stock_quantity)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING id
        ",
    )
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.base_price)
    .bind(style)
    .bind(material)
    .bind(&product.image_url)
    .bind(product.is_active)
    .bind(product.is_featured)
    .bind(product.popularity_score)
    .bind(product.stock_quantity)
    .fetch_one(&mut **tx)
    .await?;
    Ok((id, true))
}

/// Update the first gallery item with this title, or insert a new one.
async fn upsert_gallery_item(
    tx: &mut Transaction<'_, Postgres>,
    item: &GallerySeed,
    product_id: Option<i32>,
) -> Result<bool, sqlx::Error> {
    let updated = sqlx::query(
        r"
        UPDATE gallery_items SET
            description = $2,
            image_url = $3,
            frame_style = $4,
            material = $5,
            customer_name = $6,
            rating = $7,
            product_id = $8,
            occasion = $9,
            room_type = $10,
            price_range = $11,
            testimonial = $12,
            size_label = $13
        WHERE id = (SELECT id FROM gallery_items WHERE title = $1 ORDER BY id LIMIT 1)
        ",
    )
    .bind(&item.title)
    .bind(&item.description)
    .bind(&item.image_url)
    .bind(&item.frame_style)
    .bind(&item.material)
    .bind(&item.customer_name)
    .bind(item.rating)
    .bind(product_id)
    .bind(&item.occasion)
    .bind(&item.room_type)
    .bind(&item.price_range)
    .bind(&item.testimonial)
    .bind(&item.size_label)
    .execute(&mut **tx)
    .await?;

    if updated.rows_affected() > 0 {
        return Ok(false);
    }

    sqlx::query(
        r"
        INSERT INTO gallery_items
            (title, description, image_url, frame_style, material, customer_name, rating,
             product_id, occasion, room_type, price_range, testimonial, size_label)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        ",
    )
    .bind(&item.title)
    .bind(&item.description)
    .bind(&item.image_url)
    .bind(&item.frame_style)
    .bind(&item.material)
    .bind(&item.customer_name)
    .bind(item.rating)
    .bind(product_id)
    .bind(&item.occasion)
    .bind(&item.room_type)
    .bind(&item.price_range)
    .bind(&item.testimonial)
    .bind(&item.size_label)
    .execute(&mut **tx)
    .await?;
    Ok(true)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SAMPLE: &str = include_str!("../../data/catalog.yaml");

    #[test]
    fn test_sample_catalog_is_valid() {
        let seed: CatalogSeed = serde_yaml::from_str(SAMPLE).unwrap();
        assert!(!seed.sizes.is_empty());
        assert!(!seed.products.is_empty());
        assert_eq!(validate(&seed), Vec::<String>::new());
    }

    #[test]
    fn test_defaults() {
        let yaml = r##"
sizes:
  - display_name: 8" x 10"
    width_inches: 8
    height_inches: 10
colors:
  - name: Black
    hex_code: "#000000"
"##;
        let seed: CatalogSeed = serde_yaml::from_str(yaml).unwrap();
        let size = seed.sizes.first().unwrap();
        assert_eq!(size.price_multiplier, Decimal::ONE);
        assert!(size.is_active);
        assert_eq!(size.sort_order, 0);
        assert_eq!(seed.colors.first().unwrap().price_adjustment, Decimal::ZERO);
        assert!(seed.products.is_empty());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let yaml = "colors:\n  - name: Black\n    hex: \"#000\"\n";
        assert!(serde_yaml::from_str::<CatalogSeed>(yaml).is_err());
    }

    #[test]
    fn test_ratio_value_is_orientation_independent() {
        let landscape = AspectRatioSeed {
            name: "3:2".to_string(),
            width_ratio: 3.0,
            height_ratio: 2.0,
            sort_order: 0,
        };
        let portrait = AspectRatioSeed {
            name: "2:3".to_string(),
            width_ratio: 2.0,
            height_ratio: 3.0,
            sort_order: 0,
        };
        assert!((landscape.ratio_value() - 1.5).abs() < f64::EPSILON);
        assert!((portrait.ratio_value() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let yaml = r##"
colors:
  - name: Walnut
    hex_code: "brown"
  - name: Walnut
    hex_code: "#5C4033"
products:
  - name: Gallery Frame
    base_price: "-1.00"
    style: baroque
    material: wood
gallery:
  - title: Wedding wall
    image_url: /media/wall.jpg
    frame_style: Classic
    material: Oak
    rating: 6
    product: Missing Frame
    price_range: cheap
    occasion: birthday
"##;
        let seed: CatalogSeed = serde_yaml::from_str(yaml).unwrap();
        let errors = validate(&seed);

        let has = |needle: &str| errors.iter().any(|e| e.contains(needle));
        assert!(has("color 'Walnut'"));
        assert!(has("duplicate name 'Walnut'"));
        assert!(has("invalid frame style: baroque"));
        assert!(has("base_price must not be negative"));
        assert!(has("rating must be 1-5, got 6"));
        assert!(has("unknown product 'Missing Frame'"));
        assert!(has("unknown price_range 'cheap'"));
        assert!(has("unknown occasion 'birthday'"));
        assert_eq!(errors.len(), 8);
    }

    #[test]
    fn test_tally() {
        let mut tally = Tally::default();
        tally.record(true);
        tally.record(false);
        tally.record(true);
        assert_eq!(
            tally,
            Tally {
                inserted: 2,
                updated: 1
            }
        );
    }
}
