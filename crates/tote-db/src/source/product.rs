//! # Product Cache Source
//!
//! Local copy of the remote catalog.
//!
//! ## Cache Population
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How the Cache Is Filled                              │
//! │                                                                         │
//! │  CatalogSource::products()  ──►  [Product; n]                          │
//! │                                       │                                 │
//! │                                       ▼                                 │
//! │  ProductCacheSource::cache_all()  BEGIN                                │
//! │                                   INSERT .. ON CONFLICT(id) DO UPDATE   │
//! │                                   × n                                   │
//! │                                   COMMIT  ──► Response<()>              │
//! │                                                                         │
//! │  All-or-nothing: a failed row rolls the whole refresh back, and the    │
//! │  caller sees the cache outcome separately from the fetch outcome.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;

use tote_core::{guard, Product, Response};

use super::{bind_product, ProductRow, PRODUCT_COLUMNS};
use crate::error::DbResult;

/// Data source for the `products` cache table.
#[derive(Debug, Clone)]
pub struct ProductCacheSource {
    pool: SqlitePool,
}

impl ProductCacheSource {
    pub fn new(pool: SqlitePool) -> Self {
        ProductCacheSource { pool }
    }

    /// Inserts or replaces a single product.
    pub async fn add(&self, product: &Product) -> Response<()> {
        debug!(id = product.id, "Caching product");
        guard(upsert(&self.pool, product)).await
    }

    /// Upserts a whole catalog in one transaction.
    pub async fn cache_all(&self, products: &[Product]) -> Response<()> {
        debug!(count = products.len(), "Caching catalog");
        guard(self.try_cache_all(products)).await
    }

    /// Every cached product, in no particular order.
    pub async fn get_all(&self) -> Response<Vec<Product>> {
        guard(self.try_get_all()).await
    }

    /// Cached products of one category.
    pub async fn by_category(&self, category: &str) -> Response<Vec<Product>> {
        debug!(category = %category, "Listing cached products by category");
        guard(self.try_by_category(category)).await
    }

    /// Looks a product up by id. Absence is `Success(None)`.
    pub async fn find(&self, id: i64) -> Response<Option<Product>> {
        guard(self.try_find(id)).await
    }

    /// Deletes a product. Deleting an absent id is a no-op.
    pub async fn remove(&self, id: i64) -> Response<()> {
        debug!(id = id, "Removing cached product");
        guard(self.try_remove(id)).await
    }

    /// Number of cached products (for diagnostics).
    pub async fn count(&self) -> Response<i64> {
        guard(self.try_count()).await
    }

    async fn try_cache_all(&self, products: &[Product]) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;
        for product in products {
            upsert(&mut *tx, product).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn try_get_all(&self) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products");
        let rows: Vec<ProductRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn try_by_category(&self, category: &str) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE category = ?1 ORDER BY id");
        let rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .bind(category)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn try_find(&self, id: i64) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Product::from))
    }

    async fn try_remove(&self, id: i64) -> DbResult<()> {
        sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn try_count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

async fn upsert<'c, E>(executor: E, product: &Product) -> DbResult<()>
where
    E: Executor<'c, Database = Sqlite>,
{
    let sql = format!(
        "INSERT INTO products ({PRODUCT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(id) DO UPDATE SET
             title = excluded.title,
             price_cents = excluded.price_cents,
             description = excluded.description,
             category = excluded.category,
             image_url = excluded.image_url,
             rating_rate = excluded.rating_rate,
             rating_count = excluded.rating_count"
    );
    bind_product(sqlx::query(&sql), product)
        .execute(executor)
        .await?;
    Ok(())
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

    async fn source() -> (Database, ProductCacheSource) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let source = db.products();
        (db, source)
    }

    #[tokio::test]
    async fn test_add_then_find_returns_same_product() {
        let (_db, products) = source().await;
        let backpack = product(1, "men's clothing");

        assert_eq!(products.add(&backpack).await, Response::Success(()));
        assert_eq!(products.find(1).await, Response::Success(Some(backpack)));
    }

    #[tokio::test]
    async fn test_add_upserts_existing_row() {
        let (_db, products) = source().await;
        let mut item = product(3, "electronics");
        products.add(&item).await;

        item.price = Money::from_cents(59);
        item.rating = None;
        assert!(products.add(&item).await.is_success());

        assert_eq!(products.find(3).await, Response::Success(Some(item)));
        assert_eq!(products.count().await, Response::Success(1));
    }

    #[tokio::test]
    async fn test_find_absent_is_success_none() {
        let (_db, products) = source().await;
        assert_eq!(products.find(404).await, Response::Success(None));
    }

    #[tokio::test]
    async fn test_remove_absent_is_success() {
        let (_db, products) = source().await;
        assert_eq!(products.remove(404).await, Response::Success(()));
    }

    #[tokio::test]
    async fn test_cache_all_and_filter_by_category() {
        let (_db, products) = source().await;
        let catalog = vec![
            product(1, "jewelery"),
            product(2, "electronics"),
            product(3, "jewelery"),
        ];

        assert!(products.cache_all(&catalog).await.is_success());

        let jewelery = products.by_category("jewelery").await.success().unwrap();
        assert_eq!(jewelery.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(products.by_category("books").await, Response::Success(vec![]));
    }

    #[tokio::test]
    async fn test_get_all_is_stable_without_writes() {
        let (_db, products) = source().await;
        products
            .cache_all(&[product(5, "a"), product(6, "b")])
            .await;

        let mut first = products.get_all().await.success().unwrap();
        let mut second = products.get_all().await.success().unwrap();
        first.sort_by_key(|p| p.id);
        second.sort_by_key(|p| p.id);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[tokio::test]
    async fn test_cache_all_is_all_or_nothing() {
        let (_db, products) = source().await;
        let mut broken = product(2, "electronics");
        broken.price = Money::from_cents(-1); // violates CHECK (price_cents >= 0)

        let response = products.cache_all(&[product(1, "electronics"), broken]).await;

        assert_eq!(response, Response::Failure(ErrorKind::Unknown));
        assert_eq!(products.count().await, Response::Success(0));
    }

    #[tokio::test]
    async fn test_closed_store_fails_with_unknown() {
        let (db, products) = source().await;
        db.close().await;

        assert_eq!(products.get_all().await, Response::Failure(ErrorKind::Unknown));
    }
}
