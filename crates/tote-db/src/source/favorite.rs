//! # Favorite Source
//!
//! The favorites list. A product is favorited exactly when its row exists.

use sqlx::SqlitePool;
use tracing::debug;

use tote_core::{guard, FavoriteProduct, Response};

use super::{bind_product, ProductRow, PRODUCT_COLUMNS};
use crate::error::DbResult;

/// Data source for the `favorites` table.
///
/// Unlike the product cache, `add` never overwrites: favoriting the same
/// product twice fails.
#[derive(Debug, Clone)]
pub struct FavoriteSource {
    pool: SqlitePool,
}

impl FavoriteSource {
    pub fn new(pool: SqlitePool) -> Self {
        FavoriteSource { pool }
    }

    /// Marks a product as favorite. A duplicate id is `Failure(Unknown)`.
    pub async fn add(&self, product: &FavoriteProduct) -> Response<()> {
        debug!(id = product.id, "Adding favorite");
        guard(self.try_add(product)).await
    }

    pub async fn get_all(&self) -> Response<Vec<FavoriteProduct>> {
        guard(self.try_get_all()).await
    }

    /// `Success(Some(_))` when favorited, `Success(None)` otherwise.
    pub async fn find(&self, id: i64) -> Response<Option<FavoriteProduct>> {
        guard(self.try_find(id)).await
    }

    /// Un-favorites a product. An absent id is a no-op.
    pub async fn remove(&self, id: i64) -> Response<()> {
        debug!(id = id, "Removing favorite");
        guard(self.try_remove(id)).await
    }

    async fn try_add(&self, product: &FavoriteProduct) -> DbResult<()> {
        let sql = format!(
            "INSERT INTO favorites ({PRODUCT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
        );
        bind_product(sqlx::query(&sql), product)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn try_get_all(&self) -> DbResult<Vec<FavoriteProduct>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM favorites");
        let rows: Vec<ProductRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(FavoriteProduct::from).collect())
    }

    async fn try_find(&self, id: i64) -> DbResult<Option<FavoriteProduct>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM favorites WHERE id = ?1");
        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(FavoriteProduct::from))
    }

    async fn try_remove(&self, id: i64) -> DbResult<()> {
        sqlx::query("DELETE FROM favorites WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
