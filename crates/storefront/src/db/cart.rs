//! Cart lines keyed by the visitor's cart token.

use framecraft_core::catalog::CartItem;
use framecraft_core::wizard::FrameCustomization;
use framecraft_core::{CartItemId, Price};
use sqlx::PgPool;

use super::RepositoryError;

/// Largest quantity a single cart line accepts.
pub const MAX_LINE_QUANTITY: i32 = 99;

/// A cart item with the names needed to display it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartLine {
    #[sqlx(flatten)]
    pub item: CartItem,
    pub product_name: String,
    pub size_name: Option<String>,
    pub color_name: Option<String>,
    pub thickness_name: Option<String>,
    pub matting_name: Option<String>,
}

impl CartLine {
    /// `16x20` style size label for either a standard or custom size.
    #[must_use]
    pub fn size_label(&self) -> String {
        match (
            &self.size_name,
            self.item.custom_width_inches,
            self.item.custom_height_inches,
        ) {
            (Some(name), _, _) => name.clone(),
            (None, Some(w), Some(h)) => format!("Custom {w}\" x {h}\""),
            _ => "Unsized".to_string(),
        }
    }

    #[must_use]
    pub fn unit_price(&self) -> String {
        Price::usd(self.item.unit_price).display()
    }

    #[must_use]
    pub fn line_total(&self) -> String {
        Price::usd(self.item.line_total()).display()
    }
}

pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add a finished customization as a new line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn add(
        &self,
        session_id: &str,
        customization: &FrameCustomization,
    ) -> Result<CartItemId, RepositoryError> {
        let position = serde_json::to_value(customization.position)
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;
        let id: i32 = sqlx::query_scalar(
            r"
            INSERT INTO cart_items
                (session_id, product_id, photo_id, size_id, custom_width_inches,
                 custom_height_inches, color_id, thickness_id, matting_id, glass_type,
                 photo_position, custom_image_url, special_instructions, quantity, unit_price)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, 1, $14)
            RETURNING id
            ",
        )
        .bind(session_id)
        .bind(customization.product_id)
        .bind(customization.photo.id)
        .bind(customization.size_id)
        .bind(customization.custom.map(|c| c.width_inches))
        .bind(customization.custom.map(|c| c.height_inches))
        .bind(customization.color_id)
        .bind(customization.thickness_id)
        .bind(customization.matting_id)
        .bind(customization.glass_type)
        .bind(position)
        .bind(&customization.photo.url)
        .bind(customization.special_instructions.as_deref())
        .bind(customization.unit_price)
        .fetch_one(self.pool)
        .await?;
        Ok(CartItemId::new(id))
    }

    /// Lines in the cart, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines(&self, session_id: &str) -> Result<Vec<CartLine>, RepositoryError> {
        let lines = sqlx::query_as::<_, CartLine>(
            r"
            SELECT c.id, c.session_id, c.product_id, c.photo_id, c.size_id,
                   c.custom_width_inches, c.custom_height_inches, c.color_id, c.thickness_id,
                   c.matting_id, c.glass_type, c.custom_image_url, c.special_instructions,
                   c.quantity, c.unit_price, c.created_at,
                   p.name AS product_name,
                   s.display_name AS size_name,
                   fc.name AS color_name,
                   ft.name AS thickness_name,
                   m.name AS matting_name
            FROM cart_items c
            JOIN products p ON p.id = c.product_id
            LEFT JOIN frame_sizes s ON s.id = c.size_id
            LEFT JOIN frame_colors fc ON fc.id = c.color_id
            LEFT JOIN frame_thicknesses ft ON ft.id = c.thickness_id
            LEFT JOIN matting_options m ON m.id = c.matting_id
            WHERE c.session_id = $1
            ORDER BY c.created_at, c.id
            ",
        )
        .bind(session_id)
        .fetch_all(self.pool)
        .await?;
        Ok(lines)
    }

    /// Set a line's quantity, clamped to `1..=MAX_LINE_QUANTITY`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line is not in this cart.
    pub async fn update_quantity(
        &self,
        session_id: &str,
        id: CartItemId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE cart_items SET quantity = $3 WHERE id = $1 AND session_id = $2")
                .bind(id)
                .bind(session_id)
                .bind(quantity.clamp(1, MAX_LINE_QUANTITY))
                .execute(self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line is not in this cart.
    pub async fn remove(&self, session_id: &str, id: CartItemId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND session_id = $2")
            .bind(id)
            .bind(session_id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Total quantity across all lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self, session_id: &str) -> Result<i64, RepositoryError> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT SUM(quantity)::BIGINT FROM cart_items WHERE session_id = $1",
        )
        .bind(session_id)
        .fetch_one(self.pool)
        .await?;
        Ok(count.unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use framecraft_core::{GlassType, ProductId};
    use rust_decimal::Decimal;

    use super::*;

    fn line(size_name: Option<&str>, custom: Option<(f64, f64)>) -> CartLine {
        CartLine {
            item: CartItem {
                id: CartItemId::new(1),
                session_id: "token".to_string(),
                product_id: ProductId::new(1),
                photo_id: None,
                size_id: None,
                custom_width_inches: custom.map(|c| c.0),
                custom_height_inches: custom.map(|c| c.1),
                color_id: None,
                thickness_id: None,
                matting_id: None,
                glass_type: GlassType::Standard,
                custom_image_url: None,
                special_instructions: None,
                quantity: 3,
                unit_price: Decimal::new(4550, 2),
                created_at: Utc::now(),
            },
            product_name: "Gallery Frame".to_string(),
            size_name: size_name.map(String::from),
            color_name: None,
            thickness_name: None,
            matting_name: None,
        }
    }

    #[test]
    fn test_size_label() {
        assert_eq!(line(Some("16x20"), None).size_label(), "16x20");
        assert_eq!(
            line(None, Some((12.5, 30.0))).size_label(),
            "Custom 12.5\" x 30\""
        );
        assert_eq!(line(None, None).size_label(), "Unsized");
    }

    #[test]
    fn test_prices() {
        let line = line(None, None);
        assert_eq!(line.unit_price(), "$45.50");
        assert_eq!(line.line_total(), "$136.50");
    }
}
