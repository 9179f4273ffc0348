//! # Shopping Repository
//!
//! Catalog, product cache, favorites and cart behind one handle.
//!
//! ## Catalog Refresh
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      refresh_catalog()                                  │
//! │                                                                         │
//! │  CatalogSource::products()                                             │
//! │       │                                                                 │
//! │       ├── Failure(kind) ─────────────► CatalogRefresh::FetchFailed     │
//! │       │                                (cache untouched)               │
//! │       ▼                                                                 │
//! │  ProductCacheSource::cache_all(products)                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CatalogRefresh::Fetched { products, cache: Response<()> }             │
//! │                                                                         │
//! │  A failed cache write still hands back the fresh products; the caller  │
//! │  can show them and retry with cache_products().                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{info, warn};

use tote_core::{CartLine, CartSummary, ErrorKind, FavoriteProduct, Product, Response};
use tote_db::{CartSource, Database, FavoriteSource, ProductCacheSource};
use tote_remote::CatalogSource;

/// Outcome of [`ShoppingRepository::refresh_catalog`].
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogRefresh {
    /// The catalog could not be fetched; the cache was not touched.
    FetchFailed(ErrorKind),

    /// The catalog was fetched. `cache` reports whether it was stored.
    Fetched {
        products: Vec<Product>,
        cache: Response<()>,
    },
}

impl CatalogRefresh {
    /// Freshly fetched products, if any.
    pub fn products(&self) -> Option<&[Product]> {
        match self {
            CatalogRefresh::FetchFailed(_) => None,
            CatalogRefresh::Fetched { products, .. } => Some(products),
        }
    }

    /// True when the fetch succeeded and the cache now matches it.
    pub fn is_fully_cached(&self) -> bool {
        matches!(
            self,
            CatalogRefresh::Fetched {
                cache: Response::Success(()),
                ..
            }
        )
    }
}

#[derive(Debug, Clone)]
pub struct ShoppingRepository {
    catalog: CatalogSource,
    products: ProductCacheSource,
    favorites: FavoriteSource,
    cart: CartSource,
}

impl ShoppingRepository {
    pub fn new(catalog: CatalogSource, db: &Database) -> Self {
        Self::from_sources(catalog, db.products(), db.favorites(), db.cart())
    }

    pub fn from_sources(
        catalog: CatalogSource,
        products: ProductCacheSource,
        favorites: FavoriteSource,
        cart: CartSource,
    ) -> Self {
        ShoppingRepository {
            catalog,
            products,
            favorites,
            cart,
        }
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    pub async fn categories(&self) -> Response<Vec<String>> {
        self.catalog.categories().await
    }

    /// Fetches the catalog without touching the cache.
    pub async fn remote_products(&self) -> Response<Vec<Product>> {
        self.catalog.products().await
    }

    /// Fetches the catalog and writes it through to the cache.
    pub async fn refresh_catalog(&self) -> CatalogRefresh {
        let products = match self.catalog.products().await {
            Response::Success(products) => products,
            Response::Failure(kind) => return CatalogRefresh::FetchFailed(kind),
        };

        let cache = self.products.cache_all(&products).await;
        match &cache {
            Response::Success(()) => info!(count = products.len(), "Catalog refreshed"),
            Response::Failure(kind) => warn!(kind = %kind, "Catalog fetched but not cached"),
        }

        CatalogRefresh::Fetched { products, cache }
    }

    /// Writes products to the cache; used to retry a failed refresh write.
    pub async fn cache_products(&self, products: &[Product]) -> Response<()> {
        self.products.cache_all(products).await
    }

    pub async fn cached_products(&self) -> Response<Vec<Product>> {
        self.products.get_all().await
    }

    pub async fn cached_products_in(&self, category: &str) -> Response<Vec<Product>> {
        self.products.by_category(category).await
    }

    pub async fn cached_product(&self, id: i64) -> Response<Option<Product>> {
        self.products.find(id).await
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    pub async fn add_favorite(&self, product: &FavoriteProduct) -> Response<()> {
        self.favorites.add(product).await
    }

    pub async fn favorites(&self) -> Response<Vec<FavoriteProduct>> {
        self.favorites.get_all().await
    }

    pub async fn find_favorite(&self, id: i64) -> Response<Option<FavoriteProduct>> {
        self.favorites.find(id).await
    }

    pub async fn remove_favorite(&self, id: i64) -> Response<()> {
        self.favorites.remove(id).await
    }

    // =========================================================================
    // Cart
    // =========================================================================

    pub async fn add_to_cart(&self, line: &CartLine) -> Response<()> {
        self.cart.add(line).await
    }

    pub async fn cart_lines(&self) -> Response<Vec<CartLine>> {
        self.cart.get_all().await
    }

    pub async fn find_cart_line(&self, product_id: i64) -> Response<Option<CartLine>> {
        self.cart.find(product_id).await
    }

    pub async fn remove_from_cart(&self, product_id: i64) -> Response<()> {
        self.cart.remove(product_id).await
    }

    pub async fn increment_quantity(&self, product_id: i64) -> Response<()> {
        self.cart.increment(product_id).await
    }

    pub async fn decrement_quantity(&self, product_id: i64) -> Response<()> {
        self.cart.decrement(product_id).await
    }

    pub async fn clear_cart(&self) -> Response<()> {
        self.cart.delete_all().await
    }

    pub async fn cart_summary(&self) -> Response<CartSummary> {
        self.cart.summary().await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
