//! # tote-db: Local Data Sources for Tote
//!
//! The embedded SQLite store: product cache, favorites and cart.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tote Data Flow                                   │
//! │                                                                         │
//! │  ShoppingRepository (tote-repo)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     tote-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌────────────┐  │   │
//! │  │   │   Database    │    │   Data Sources     │  │ Migrations │  │   │
//! │  │   │   (pool.rs)   │    │   (source/)        │  │ (embedded) │  │   │
//! │  │   │               │    │                    │  │            │  │   │
//! │  │   │ SqlitePool    │◄───│ ProductCacheSource │  │ 001_init   │  │   │
//! │  │   │               │    │ FavoriteSource     │  │            │  │   │
//! │  │   │               │    │ CartSource         │  │            │  │   │
//! │  │   └───────────────┘    └────────────────────┘  └────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file in the platform data directory                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every public data-source method returns [`tote_core::Response`]; storage
//! errors are logged and classified at the method boundary and never reach
//! the caller as `DbError`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tote_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/tote.db")).await?;
//!
//! let response = db.cart().increment(7).await;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod source;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use source::cart::CartSource;
pub use source::favorite::FavoriteSource;
pub use source::product::ProductCacheSource;
