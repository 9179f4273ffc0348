//! # Catalog State
//!
//! Product list screen: what to show and where it came from.
//!
//! ## Load Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       CatalogState::load()                              │
//! │                                                                         │
//! │  refresh_catalog()                                                      │
//! │     │                                                                   │
//! │     ├── FetchFailed(kind) ──► message(kind)                            │
//! │     │                         products = cached_products()             │
//! │     │                         from_cache = true                        │
//! │     │                                                                   │
//! │     └── Fetched { products, cache }                                    │
//! │              │                products = fetched                       │
//! │              │                from_cache = false                       │
//! │              └── cache = Failure(kind) ──► message(kind)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;

use tote_core::{ErrorKind, Locale, Product, Response};
use tote_repo::{CatalogRefresh, ShoppingRepository};

use super::UserMessage;

#[derive(Debug)]
pub struct CatalogState {
    repo: ShoppingRepository,
    locale: Locale,
    products: Vec<Product>,
    categories: Vec<String>,
    selected: Option<String>,
    from_cache: bool,
    message: Option<UserMessage>,
}

impl CatalogState {
    pub fn new(repo: ShoppingRepository, locale: Locale) -> Self {
        CatalogState {
            repo,
            locale,
            products: Vec::new(),
            categories: Vec::new(),
            selected: None,
            from_cache: false,
            message: None,
        }
    }

    /// Refreshes from the catalog, falling back to the local cache.
    pub async fn load(&mut self) {
        match self.repo.refresh_catalog().await {
            CatalogRefresh::FetchFailed(kind) => {
                self.show(kind);
                // A failed cache read keeps the fetch message.
                if let Response::Success(products) = self.repo.cached_products().await {
                    self.products = products;
                }
                self.from_cache = true;
            }
            CatalogRefresh::Fetched { products, cache } => {
                if let Response::Failure(kind) = cache {
                    self.show(kind);
                }
                self.products = products;
                self.from_cache = false;
            }
        }
        debug!(
            count = self.products.len(),
            from_cache = self.from_cache,
            "Catalog loaded"
        );
    }

    /// Shows only what the cache holds; no network.
    pub async fn load_cached(&mut self) {
        match self.repo.cached_products().await {
            Response::Success(products) => {
                self.products = products;
                self.from_cache = true;
            }
            Response::Failure(kind) => self.show(kind),
        }
    }

    pub async fn load_categories(&mut self) {
        match self.repo.categories().await {
            Response::Success(categories) => self.categories = categories,
            Response::Failure(kind) => self.show(kind),
        }
    }

    /// `None` shows every category.
    pub fn select_category(&mut self, category: Option<String>) {
        self.selected = category;
    }

    pub fn visible_products(&self) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| self.selected.as_ref().map_or(true, |c| &p.category == c))
            .collect()
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn selected_category(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// True when the shown products came from the local cache.
    pub fn is_from_cache(&self) -> bool {
        self.from_cache
    }

    pub fn take_message(&mut self) -> Option<UserMessage> {
        self.message.take()
    }

    fn show(&mut self, kind: ErrorKind) {
        self.message = Some(UserMessage::new(kind, self.locale));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::{serve_catalog, shopping, OFFLINE_URL};

    #[tokio::test]
    async fn test_load_shows_fresh_catalog() {
        let (_db, repo) = shopping(&serve_catalog().await).await;
        let mut state = CatalogState::new(repo, Locale::En);

        state.load().await;

        assert_eq!(state.visible_products().len(), 2);
        assert!(!state.is_from_cache());
        assert_eq!(state.take_message(), None);
    }

    #[tokio::test]
    async fn test_load_offline_falls_back_to_cache() {
        let (db, online) = shopping(&serve_catalog().await).await;
        online.refresh_catalog().await;

        // Same database, unreachable catalog.
        let catalog = tote_remote::CatalogSource::new(&tote_remote::CatalogSettings {
            base_url: OFFLINE_URL.to_string(),
            timeout_secs: 5,
        })
        .unwrap();
        let offline = ShoppingRepository::new(catalog, &db);
        let mut state = CatalogState::new(offline, Locale::Es);

        state.load().await;

        assert_eq!(state.visible_products().len(), 2);
        assert!(state.is_from_cache());
        assert_eq!(
            state.take_message(),
            Some(UserMessage::new(ErrorKind::Network, Locale::Es))
        );
        assert_eq!(state.take_message(), None);
    }

    #[tokio::test]
    async fn test_load_keeps_products_when_cache_write_fails() {
        let (db, repo) = shopping(&serve_catalog().await).await;
        db.close().await;
        let mut state = CatalogState::new(repo, Locale::En);

        state.load().await;

        assert_eq!(state.visible_products().len(), 2);
        assert!(!state.is_from_cache());
        assert_eq!(state.take_message().map(|m| m.kind), Some(ErrorKind::Unknown));
    }

    #[tokio::test]
    async fn test_category_filter() {
        let (_db, repo) = shopping(&serve_catalog().await).await;
        let mut state = CatalogState::new(repo, Locale::En);
        state.load().await;
        state.load_categories().await;

        assert_eq!(state.categories(), ["jewelery", "men's clothing"]);

        state.select_category(Some("jewelery".to_string()));
        let visible: Vec<i64> = state.visible_products().iter().map(|p| p.id).collect();
        assert_eq!(visible, vec![7]);
        assert_eq!(state.selected_category(), Some("jewelery"));

        state.select_category(None);
        assert_eq!(state.visible_products().len(), 2);
    }

    #[tokio::test]
    async fn test_categories_offline_sets_message() {
        let (_db, repo) = shopping(OFFLINE_URL).await;
        let mut state = CatalogState::new(repo, Locale::En);

        state.load_categories().await;

        assert!(state.categories().is_empty());
        assert_eq!(state.take_message().map(|m| m.kind), Some(ErrorKind::Network));
    }
}
