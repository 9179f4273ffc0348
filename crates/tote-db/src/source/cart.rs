//! # Cart Source
//!
//! Cart lines with a quantity bounded to `1..=10`.
//!
//! ## Quantity Bounds
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Bounded Quantity Updates                             │
//! │                                                                         │
//! │  increment(id)                                                         │
//! │    UPDATE cart SET quantity = quantity + 1                              │
//! │     WHERE product_id = ? AND quantity < 10                              │
//! │                                                                         │
//! │  decrement(id)                                                         │
//! │    UPDATE cart SET quantity = quantity - 1                              │
//! │     WHERE product_id = ? AND quantity > 1                               │
//! │                                                                         │
//! │  The guard lives in the WHERE clause, so the read-modify-write is a    │
//! │  single statement. A line already at a bound is left unchanged and     │
//! │  the call still succeeds; an absent line is a no-op too.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use tote_core::validation::validate_quantity;
use tote_core::{
    guard, guard_sync, CartLine, CartSummary, CoreError, Response, MAX_CART_QUANTITY,
    MIN_CART_QUANTITY,
};

use crate::error::DbResult;

const CART_COLUMNS: &str = "product_id, title, price_cents, image_url, quantity";

/// Data source for the `cart` table.
#[derive(Debug, Clone)]
pub struct CartSource {
    pool: SqlitePool,
}

impl CartSource {
    pub fn new(pool: SqlitePool) -> Self {
        CartSource { pool }
    }

    /// Adds a new line.
    ///
    /// A line for the same product already in the cart is `Failure(Unknown)`;
    /// a quantity outside `1..=10` is `Failure(QuantityOutOfRange)` and
    /// nothing is written.
    pub async fn add(&self, line: &CartLine) -> Response<()> {
        debug!(product_id = line.product_id, quantity = line.quantity, "Adding cart line");
        guard(self.try_add(line)).await
    }

    /// All lines, ordered by product id.
    pub async fn get_all(&self) -> Response<Vec<CartLine>> {
        guard(self.try_get_all()).await
    }

    pub async fn find(&self, product_id: i64) -> Response<Option<CartLine>> {
        guard(self.try_find(product_id)).await
    }

    /// Deletes a line. An absent line is a no-op.
    pub async fn remove(&self, product_id: i64) -> Response<()> {
        debug!(product_id = product_id, "Removing cart line");
        guard(self.try_remove(product_id)).await
    }

    /// Raises a line's quantity by one, stopping at 10.
    pub async fn increment(&self, product_id: i64) -> Response<()> {
        debug!(product_id = product_id, "Incrementing cart line");
        guard(self.try_increment(product_id)).await
    }

    /// Lowers a line's quantity by one, stopping at 1.
    pub async fn decrement(&self, product_id: i64) -> Response<()> {
        debug!(product_id = product_id, "Decrementing cart line");
        guard(self.try_decrement(product_id)).await
    }

    /// Empties the cart.
    pub async fn delete_all(&self) -> Response<()> {
        debug!("Clearing cart");
        guard(self.try_delete_all()).await
    }

    /// Totals over the current lines. An overflowing total is `Unknown`.
    pub async fn summary(&self) -> Response<CartSummary> {
        self.get_all()
            .await
            .and_then(|lines| guard_sync(CartSummary::from_lines(&lines)))
    }

    async fn try_add(&self, line: &CartLine) -> DbResult<()> {
        validate_quantity(line.quantity).map_err(CoreError::from)?;

        let sql = format!("INSERT INTO cart ({CART_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5)");
        sqlx::query(&sql)
            .bind(line.product_id)
            .bind(line.title.as_str())
            .bind(line.price.cents())
            .bind(line.image_url.as_str())
            .bind(line.quantity)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn try_get_all(&self) -> DbResult<Vec<CartLine>> {
        let sql = format!("SELECT {CART_COLUMNS} FROM cart ORDER BY product_id");
        let lines = sqlx::query_as::<_, CartLine>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(lines)
    }

    async fn try_find(&self, product_id: i64) -> DbResult<Option<CartLine>> {
        let sql = format!("SELECT {CART_COLUMNS} FROM cart WHERE product_id = ?1");
        let line = sqlx::query_as::<_, CartLine>(&sql)
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(line)
    }

    async fn try_remove(&self, product_id: i64) -> DbResult<()> {
        sqlx::query("DELETE FROM cart WHERE product_id = ?1")
            .bind(product_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn try_increment(&self, product_id: i64) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE cart SET quantity = quantity + 1 WHERE product_id = ?1 AND quantity < ?2",
        )
        .bind(product_id)
        .bind(MAX_CART_QUANTITY)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            debug!(product_id = product_id, "Cart line absent or at maximum");
        }
        Ok(())
    }

    async fn try_decrement(&self, product_id: i64) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE cart SET quantity = quantity - 1 WHERE product_id = ?1 AND quantity > ?2",
        )
        .bind(product_id)
        .bind(MIN_CART_QUANTITY)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            debug!(product_id = product_id, "Cart line absent or at minimum");
        }
        Ok(())
    }

    async fn try_delete_all(&self) -> DbResult<()> {
        sqlx::query("DELETE FROM cart").execute(&self.pool).await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::source::fixtures::product;
    use tote_core::{ErrorKind, Money};

    async fn cart() -> CartSource {
        Database::new(DbConfig::in_memory()).await.unwrap().cart()
    }

    fn line(id: i64, quantity: i64) -> CartLine {
        CartLine {
            quantity,
            ..CartLine::from_product(&product(id, "electronics"))
        }
    }

    async fn quantity_of(cart: &CartSource, id: i64) -> i64 {
        cart.find(id).await.success().flatten().unwrap().quantity
    }

    #[tokio::test]
    async fn test_add_then_find() {
        let cart = cart().await;
        let item = line(3, 1);

        assert_eq!(cart.add(&item).await, Response::Success(()));
        assert_eq!(cart.find(3).await, Response::Success(Some(item)));
        assert_eq!(cart.find(4).await, Response::Success(None));
    }

    #[tokio::test]
    async fn test_duplicate_line_fails_with_unknown() {
        let cart = cart().await;
        cart.add(&line(3, 1)).await;

        assert_eq!(cart.add(&line(3, 2)).await, Response::Failure(ErrorKind::Unknown));
        assert_eq!(quantity_of(&cart, 3).await, 1);
    }

    #[tokio::test]
    async fn test_add_rejects_out_of_range_quantity() {
        let cart = cart().await;

        assert_eq!(
            cart.add(&line(1, 0)).await,
            Response::Failure(ErrorKind::QuantityOutOfRange)
        );
        assert_eq!(
            cart.add(&line(1, 11)).await,
            Response::Failure(ErrorKind::QuantityOutOfRange)
        );
        assert_eq!(cart.get_all().await, Response::Success(vec![]));
    }

    #[tokio::test]
    async fn test_increment_and_decrement() {
        let cart = cart().await;
        cart.add(&line(3, 1)).await;

        assert!(cart.increment(3).await.is_success());
        assert_eq!(quantity_of(&cart, 3).await, 2);

        assert!(cart.decrement(3).await.is_success());
        assert_eq!(quantity_of(&cart, 3).await, 1);
    }

    #[tokio::test]
    async fn test_decrement_stops_at_one() {
        let cart = cart().await;
        cart.add(&line(3, 1)).await;

        assert_eq!(cart.decrement(3).await, Response::Success(()));
        assert_eq!(quantity_of(&cart, 3).await, 1);
    }

    #[tokio::test]
    async fn test_increment_stops_at_ten() {
        let cart = cart().await;
        cart.add(&line(3, 9)).await;

        cart.increment(3).await;
        assert_eq!(cart.increment(3).await, Response::Success(()));
        assert_eq!(quantity_of(&cart, 3).await, 10);
    }

    #[tokio::test]
    async fn test_bounded_updates_on_absent_line_are_noops() {
        let cart = cart().await;

        assert_eq!(cart.increment(42).await, Response::Success(()));
        assert_eq!(cart.decrement(42).await, Response::Success(()));
        assert_eq!(cart.find(42).await, Response::Success(None));
    }

    #[tokio::test]
    async fn test_remove_and_delete_all() {
        let cart = cart().await;
        cart.add(&line(1, 1)).await;
        cart.add(&line(2, 1)).await;

        assert!(cart.remove(1).await.is_success());
        assert_eq!(cart.find(1).await, Response::Success(None));
        assert!(cart.remove(1).await.is_success());

        assert!(cart.delete_all().await.is_success());
        assert_eq!(cart.get_all().await, Response::Success(vec![]));
    }

    #[tokio::test]
    async fn test_get_all_is_idempotent() {
        let cart = cart().await;
        cart.add(&line(2, 4)).await;
        cart.add(&line(1, 1)).await;

        let first = cart.get_all().await;
        assert_eq!(first, cart.get_all().await);
        assert_eq!(
            first.success().unwrap().iter().map(|l| l.product_id).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[tokio::test]
    async fn test_summary_totals_lines() {
        let cart = cart().await;
        cart.add(&line(1, 2)).await; // 10.01 × 2
        cart.add(&line(2, 1)).await; // 10.02

        let summary = cart.summary().await.success().unwrap();
        assert_eq!(summary.line_count, 2);
        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.subtotal, Money::from_cents(3004));
    }

    #[tokio::test]
    async fn test_summary_overflow_is_unknown() {
        let cart = cart().await;
        let huge = CartLine {
            price: Money::parse_decimal("92233720368547758.07").unwrap(),
            ..line(1, 2)
        };

        assert_eq!(cart.add(&huge).await, Response::Success(()));
        assert_eq!(cart.summary().await, Response::Failure(ErrorKind::Unknown));
    }
}
