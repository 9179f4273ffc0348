//! # tote-core: Shared Domain Types for Tote
//!
//! This crate holds everything the data-access layer agrees on: the
//! outcome type, the error taxonomy, money, and the domain records. It has
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tote Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              State holders (apps/tote-cli)                      │   │
//! │  │    Catalog ──► Cart ──► Favorites ──► Account                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Response<T>                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │       tote-repo: ShoppingRepository, AccountRepository          │   │
//! │  └──────────────┬──────────────────────────────────┬───────────────┘   │
//! │                 │                                  │                    │
//! │  ┌──────────────▼──────────────┐  ┌────────────────▼────────────────┐  │
//! │  │  tote-db (SQLite sources)   │  │  tote-remote (REST + vendor)    │  │
//! │  └──────────────┬──────────────┘  └────────────────┬────────────────┘  │
//! │                 └─────────────────┬────────────────┘                    │
//! │  ┌────────────────────────────────▼────────────────────────────────┐   │
//! │  │               ★ tote-core (THIS CRATE) ★                        │   │
//! │  │   Response · ErrorKind · guard · Money · Product · CartLine     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`response`] - `Response<T>` and the `guard` boundary
//! - [`error`] - `ErrorKind`, `Locale`, `FailureCause`, domain errors
//! - [`money`] - Money type with integer arithmetic
//! - [`types`] - Domain records (Product, CartLine, UserDetail, ...)
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use tote_core::{guard_sync, ErrorKind, Money, Response};
//!
//! let parsed: Response<Money> = guard_sync("12.50".parse::<Money>());
//! assert_eq!(parsed.success().map(|m| m.cents()), Some(1250));
//!
//! let rejected: Response<Money> = guard_sync("twelve".parse::<Money>());
//! assert_eq!(rejected.failure(), Some(ErrorKind::Unknown));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod response;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ErrorKind, FailureCause, Locale, ValidationError};
pub use money::Money;
pub use response::{guard, guard_sync, Response};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Smallest quantity a cart line may hold.
pub const MIN_CART_QUANTITY: i64 = 1;

/// Largest quantity a cart line may hold.
///
/// ## Business Reason
/// Keeps a mis-tap on "+" from turning into a bulk order.
pub const MAX_CART_QUANTITY: i64 = 10;
