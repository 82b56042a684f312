//! Object paths and upload validation.

use thiserror::Error;
use uuid::Uuid;

use crate::catalog::FrameAsset;
use crate::types::{AspectRatioId, FrameColorId};

/// Bucket holding product images, frame assets, and customer photos.
pub const DEFAULT_BUCKET: &str = "customer-photos";

/// Accepted image extensions (lowercase).
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("Please choose a file to upload")]
    Empty,
    #[error("File name has no extension: {0}")]
    MissingExtension(String),
    #[error("Unsupported file type .{0}; use JPG, PNG, WebP, or GIF")]
    UnsupportedExtension(String),
    #[error("File is too large ({size}); the limit is {limit}")]
    TooLarge { size: String, limit: String },
}

/// Lowercased extension of a file name, without the dot.
#[must_use]
pub fn extension(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Check an upload's name and size, returning its normalized extension.
///
/// # Errors
///
/// Returns `UploadError` if the file is empty, too large, or not an
/// accepted image type.
pub fn validate_upload(
    file_name: &str,
    size: usize,
    max_bytes: usize,
) -> Result<String, UploadError> {
    if size == 0 {
        return Err(UploadError::Empty);
    }
    if size > max_bytes {
        return Err(UploadError::TooLarge {
            size: format_file_size(Some(size as u64)),
            limit: format_file_size(Some(max_bytes as u64)),
        });
    }
    let ext = extension(file_name)
        .ok_or_else(|| UploadError::MissingExtension(file_name.to_string()))?;
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(UploadError::UnsupportedExtension(ext));
    }
    Ok(ext)
}

/// MIME type for an accepted extension.
#[must_use]
pub fn content_type(ext: &str) -> &'static str {
    match ext {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Lowercase, with each run of whitespace replaced by one `-`.
#[must_use]
pub fn slug(value: &str) -> String {
    value
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// `frame-assets/{ratio}/{color}/{thickness}/frame-{millis}.{ext}`, with the
/// ratio's `:` written as `x`.
#[must_use]
pub fn frame_asset_path(
    ratio_name: &str,
    color_name: &str,
    thickness_name: &str,
    millis: i64,
    ext: &str,
) -> String {
    format!(
        "frame-assets/{}/{}/{}/frame-{millis}.{ext}",
        ratio_name.replace(':', "x"),
        slug(color_name),
        slug(thickness_name),
    )
}

/// `products/product-{millis}.{ext}`
#[must_use]
pub fn product_image_path(millis: i64, ext: &str) -> String {
    format!("products/product-{millis}.{ext}")
}

/// `uploads/{session}/{uuid}.{ext}`
#[must_use]
pub fn customer_photo_path(session: &str, id: Uuid, ext: &str) -> String {
    format!("uploads/{}/{id}.{ext}", slug(session))
}

/// `Unknown` or megabytes with two decimals.
#[must_use]
pub fn format_file_size(bytes: Option<u64>) -> String {
    match bytes {
        None => "Unknown".to_string(),
        Some(bytes) => format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0),
    }
}

/// Asset list filter by aspect ratio and color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssetFilter {
    pub aspect_ratio_id: Option<AspectRatioId>,
    pub color_id: Option<FrameColorId>,
}

impl AssetFilter {
    #[must_use]
    pub fn matches(&self, asset: &FrameAsset) -> bool {
        self.aspect_ratio_id.is_none_or(|id| asset.aspect_ratio_id == id)
            && self.color_id.is_none_or(|id| asset.color_id == id)
    }

    #[must_use]
    pub fn apply<'a>(&self, assets: &'a [FrameAsset]) -> Vec<&'a FrameAsset> {
        assets.iter().filter(|a| self.matches(a)).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::types::{FrameAssetId, FrameThicknessId};

    #[test]
    fn test_extension() {
        assert_eq!(extension("Photo.JPG").as_deref(), Some("jpg"));
        assert_eq!(extension("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(extension("noext"), None);
        assert_eq!(extension(".hidden"), None);
    }

    #[test]
    fn test_validate_upload() {
        assert_eq!(validate_upload("a.PNG", 10, 100).unwrap(), "png");
        assert_eq!(validate_upload("a.png", 0, 100), Err(UploadError::Empty));
        assert!(matches!(
            validate_upload("a.png", 101, 100),
            Err(UploadError::TooLarge { .. })
        ));
        assert_eq!(
            validate_upload("a.exe", 10, 100),
            Err(UploadError::UnsupportedExtension("exe".to_string()))
        );
    }

    #[test]
    fn test_frame_asset_path() {
        assert_eq!(
            frame_asset_path("16:9", "Antique  Gold", "Extra Wide", 1_700_000_000_000, "png"),
            "frame-assets/16x9/antique-gold/extra-wide/frame-1700000000000.png"
        );
    }

    #[test]
    fn test_other_paths() {
        assert_eq!(product_image_path(42, "jpg"), "products/product-42.jpg");
        let id = Uuid::nil();
        assert_eq!(
            customer_photo_path("abc", id, "webp"),
            "uploads/abc/00000000-0000-0000-0000-000000000000.webp"
        );
        assert_eq!(content_type("jpeg"), "image/jpeg");
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(None), "Unknown");
        assert_eq!(format_file_size(Some(1_572_864)), "1.50 MB");
        assert_eq!(format_file_size(Some(0)), "0.00 MB");
    }

    #[test]
    fn test_asset_filter() {
        let asset = |id, ratio, color| FrameAsset {
            id: FrameAssetId::new(id),
            aspect_ratio_id: AspectRatioId::new(ratio),
            color_id: FrameColorId::new(color),
            thickness_id: FrameThicknessId::new(1),
            storage_path: String::new(),
            image_url: String::new(),
            file_size: None,
            created_at: Utc::now(),
        };
        let assets = vec![asset(1, 1, 1), asset(2, 1, 2), asset(3, 2, 2)];

        assert_eq!(AssetFilter::default().apply(&assets).len(), 3);
        let f = AssetFilter {
            aspect_ratio_id: Some(AspectRatioId::new(1)),
            color_id: None,
        };
        assert_eq!(f.apply(&assets).len(), 2);
        let f = AssetFilter {
            aspect_ratio_id: Some(AspectRatioId::new(1)),
            color_id: Some(FrameColorId::new(2)),
        };
        assert_eq!(f.apply(&assets)[0].id, FrameAssetId::new(2));
    }
}
