//! Favorites screen state.

use tote_core::{ErrorKind, FavoriteProduct, Locale, Product, Response};
use tote_repo::ShoppingRepository;

use super::UserMessage;

#[derive(Debug)]
pub struct FavoritesState {
    repo: ShoppingRepository,
    locale: Locale,
    favorites: Vec<FavoriteProduct>,
    message: Option<UserMessage>,
}

impl FavoritesState {
    pub fn new(repo: ShoppingRepository, locale: Locale) -> Self {
        FavoritesState {
            repo,
            locale,
            favorites: Vec::new(),
            message: None,
        }
    }

    pub async fn refresh(&mut self) {
        match self.repo.favorites().await {
            Response::Success(favorites) => self.favorites = favorites,
            Response::Failure(kind) => self.show(kind),
        }
    }

    /// Flips the favorite flag of `product` and returns the new flag.
    ///
    /// On failure the flag is unchanged and a message is set.
    pub async fn toggle(&mut self, product: &Product) -> bool {
        let response = match self.repo.find_favorite(product.id).await {
            Response::Success(Some(_)) => self.repo.remove_favorite(product.id).await,
            Response::Success(None) => self.repo.add_favorite(product).await,
            Response::Failure(kind) => Response::Failure(kind),
        };
        if let Response::Failure(kind) = response {
            self.show(kind);
        }

        self.refresh().await;
        self.is_favorite(product.id)
    }

    pub fn is_favorite(&self, product_id: i64) -> bool {
        self.favorites.iter().any(|f| f.id == product_id)
    }

    pub fn favorites(&self) -> &[FavoriteProduct] {
        &self.favorites
    }

    pub fn take_message(&mut self) -> Option<UserMessage> {
        self.message.take()
    }

    fn show(&mut self, kind: ErrorKind) {
        self.message = Some(UserMessage::new(kind, self.locale));
    }
}
