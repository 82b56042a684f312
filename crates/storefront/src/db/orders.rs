//! Orders created at checkout.

use chrono::{DateTime, Utc};
use framecraft_core::catalog::{Order, ShippingAddress};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use super::RepositoryError;

const ORDER_COLUMNS: &str =
    "id, order_number, email, shipping_address, status, total_amount, created_at";

/// `FC-YYYYMMDD-XXXXXXXX`, the suffix taken from a random UUID.
#[must_use]
pub fn order_number(now: DateTime<Utc>, nonce: Uuid) -> String {
    let simple = nonce.simple().to_string().to_uppercase();
    format!(
        "FC-{}-{}",
        now.format("%Y%m%d"),
        simple.get(..8).unwrap_or(&simple)
    )
}

pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Turn the cart into a pending order and empty the cart.
    ///
    /// Runs in one transaction: the order, its items, and the cart deletion
    /// commit together.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the cart is empty, or
    /// `RepositoryError::Database` if any statement fails.
    pub async fn create_from_cart(
        &self,
        session_id: &str,
        email: &str,
        address: &ShippingAddress,
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let total: Option<Decimal> = sqlx::query_scalar(
            "SELECT SUM(unit_price * quantity) FROM cart_items WHERE session_id = $1",
        )
        .bind(session_id)
        .fetch_one(&mut *tx)
        .await?;
        let Some(total) = total else {
            return Err(RepositoryError::NotFound);
        };

        let order = sqlx::query_as::<_, Order>(&format!(
            r"
            INSERT INTO orders (order_number, session_id, email, shipping_address, total_amount)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(order_number(Utc::now(), Uuid::new_v4()))
        .bind(session_id)
        .bind(email)
        .bind(Json(address))
        .bind(total)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r"
            INSERT INTO order_items
                (order_id, product_id, photo_id, size_id, custom_width_inches,
                 custom_height_inches, color_id, thickness_id, matting_id, glass_type,
                 photo_position, special_instructions, quantity, unit_price)
            SELECT $1, product_id, photo_id, size_id, custom_width_inches,
                   custom_height_inches, color_id, thickness_id, matting_id, glass_type,
                   photo_position, special_instructions, quantity, unit_price
            FROM cart_items
            WHERE session_id = $2
            ORDER BY id
            ",
        )
        .bind(order.id)
        .bind(session_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM cart_items WHERE session_id = $1")
            .bind(session_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(order)
    }

    /// An order placed from this session.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_session(
        &self,
        order_number: &str,
        session_id: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_number = $1 AND session_id = $2"
        ))
        .bind(order_number)
        .bind(session_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(order)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_order_number() {
        let now = Utc.with_ymd_and_hms(2026, 3, 9, 12, 0, 0).unwrap();
        let nonce = Uuid::parse_str("a1b2c3d4-0000-0000-0000-000000000000").unwrap();
        assert_eq!(order_number(now, nonce), "FC-20260309-A1B2C3D4");
    }
}
