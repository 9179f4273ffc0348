//! # Local Data Sources
//!
//! One data source per table. Each is the only code that touches its table.
//!
//! ## Data Source Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Local Data Sources                                   │
//! │                                                                         │
//! │  ShoppingRepository                                                    │
//! │       │                                                                 │
//! │       │  cart.increment(7)                                             │
//! │       ▼                                                                 │
//! │  CartSource                                                            │
//! │  ├── pub async fn increment(&self, id) -> Response<()>                 │
//! │  │        └── guard(self.try_increment(id))                            │
//! │  └── async fn try_increment(&self, id) -> DbResult<()>  (SQL + ?)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite `cart` table                                                   │
//! │                                                                         │
//! │  Public methods never return DbError; private ones never log.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Sources
//!
//! - [`ProductCacheSource`](product::ProductCacheSource) - catalog cache, upsert semantics
//! - [`FavoriteSource`](favorite::FavoriteSource) - favorites, insert-or-fail
//! - [`CartSource`](cart::CartSource) - cart lines with bounded quantity

pub mod cart;
pub mod favorite;
pub mod product;

use sqlx::sqlite::SqliteArguments;
use sqlx::{FromRow, Sqlite};
use tote_core::{Money, Product, Rating};

/// Column list shared by the `products` and `favorites` tables.
pub(crate) const PRODUCT_COLUMNS: &str =
    "id, title, price_cents, description, category, image_url, rating_rate, rating_count";

/// Flattened product row as stored in `products` and `favorites`.
#[derive(Debug, FromRow)]
pub(crate) struct ProductRow {
    id: i64,
    title: String,
    price_cents: i64,
    description: String,
    category: String,
    image_url: String,
    rating_rate: Option<f64>,
    rating_count: Option<i64>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        let rating = match (row.rating_rate, row.rating_count) {
            (Some(rate), Some(count)) => Some(Rating { rate, count }),
            _ => None,
        };

        Product {
            id: row.id,
            title: row.title,
            price: Money::from_cents(row.price_cents),
            description: row.description,
            category: row.category,
            image_url: row.image_url,
            rating,
        }
    }
}

/// Binds a product's columns in `PRODUCT_COLUMNS` order.
pub(crate) fn bind_product<'q>(
    query: sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>,
    product: &'q Product,
) -> sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>> {
    query
        .bind(product.id)
        .bind(product.title.as_str())
        .bind(product.price.cents())
        .bind(product.description.as_str())
        .bind(product.category.as_str())
        .bind(product.image_url.as_str())
        .bind(product.rating.map(|r| r.rate))
        .bind(product.rating.map(|r| r.count))
}
