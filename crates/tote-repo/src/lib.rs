//! # tote-repo: Repositories for Tote
//!
//! The two entry points the app talks to.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Repositories                                   │
//! │                                                                         │
//! │  State holders (apps/tote-cli)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────────────────┐      ┌──────────────────────────────┐    │
//! │  │   ShoppingRepository     │      │     AccountRepository        │    │
//! │  │                          │      │                              │    │
//! │  │  CatalogSource  (remote) │      │  IdentitySource              │    │
//! │  │  ProductCacheSource      │      │  ProfileImageSource          │    │
//! │  │  FavoriteSource          │      │  UserDocumentSource          │    │
//! │  │  CartSource     (local)  │      │  PushTokenSource   (remote)  │    │
//! │  └──────────────────────────┘      └──────────────────────────────┘    │
//! │                                                                         │
//! │  Repositories forward; they never retry, fall back or cache results.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod account;
pub mod shopping;

pub use account::AccountRepository;
pub use shopping::{CatalogRefresh, ShoppingRepository};
