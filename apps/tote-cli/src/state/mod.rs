//! # State Module
//!
//! Screen state for the front end, one holder per screen.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │          ShoppingRepository                 AccountRepository           │
//! │                 │                                  │                    │
//! │     ┌───────────┼─────────────┐                    │                    │
//! │     ▼           ▼             ▼                    ▼                    │
//! │ CatalogState  CartState  FavoritesState       AccountState              │
//! │                                                                         │
//! │  Each holder:                                                           │
//! │  • owns a repository clone (repositories are cheap to clone)           │
//! │  • keeps what the screen shows (products, lines, profile, ...)         │
//! │  • turns Response::Failure into a one-shot UserMessage                 │
//! │  • never retries on its own                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod account;
mod cart;
mod catalog;
mod favorites;
mod message;

#[cfg(test)]
mod testing;

pub use account::AccountState;
pub use cart::CartState;
pub use catalog::CatalogState;
pub use favorites::FavoritesState;
pub use message::UserMessage;
