//! # Commands Module
//!
//! One handler per subcommand. Handlers drive a state holder and print.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── Shared output helpers
//! ├── catalog.rs    ◄─── refresh, list, categories
//! ├── cart.rs       ◄─── add, list, inc, dec, remove, checkout
//! ├── favorites.rs  ◄─── toggle, list
//! └── account.rs    ◄─── register
//! ```
//!
//! ## Output
//! ```text
//! stdout   results (product rows, cart lines, receipt JSON)
//! stderr   localized messages
//! exit 1   the command could not do what was asked
//! ```

pub mod account;
pub mod cart;
pub mod catalog;
pub mod favorites;

use tote_core::{Product, Response};
use tote_repo::ShoppingRepository;

use crate::error::{AppError, AppResult};
use crate::state::UserMessage;

/// Turns a pending message into a command failure.
pub(crate) fn fail_on(message: Option<UserMessage>) -> AppResult<()> {
    match message {
        Some(message) => Err(AppError::Failed(message)),
        None => Ok(()),
    }
}

/// Shows a message without failing the command.
pub(crate) fn warn_user(message: Option<UserMessage>) {
    if let Some(message) = message {
        eprintln!("{message}");
    }
}

pub(crate) fn print_product(product: &Product) {
    println!(
        "{:>5}  {:<48}  {:>10}  {}",
        product.id, product.title, product.price.to_string(), product.category
    );
}

/// Looks a product up in the local cache.
pub(crate) async fn cached_product(
    repo: &ShoppingRepository,
    product_id: i64,
    locale: tote_core::Locale,
) -> AppResult<Product> {
    match repo.cached_product(product_id).await {
        Response::Success(Some(product)) => Ok(product),
        Response::Success(None) => Err(AppError::ProductNotCached(product_id)),
        Response::Failure(kind) => Err(AppError::Failed(UserMessage::new(kind, locale))),
    }
}
