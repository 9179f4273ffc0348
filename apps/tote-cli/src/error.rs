//! # App Error Type
//!
//! Start-up and command failures for the `tote` binary.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Where Errors Surface                                 │
//! │                                                                         │
//! │  Start-up (config, data dir, database)  ──► AppError ──► exit 1        │
//! │                                                                         │
//! │  Commands                                                              │
//! │    state holder sets a UserMessage   ──► printed to stderr             │
//! │    nothing could be done at all      ──► AppError::Failed ──► exit 1   │
//! │                                                                         │
//! │  Data-source failures never reach this type directly: they arrive      │
//! │  as ErrorKind through Response and are shown as localized messages.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use tote_core::ValidationError;
use tote_db::DbError;
use tote_remote::RemoteError;

use crate::state::UserMessage;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] RemoteError),

    #[error("Unsupported locale: {0}")]
    Locale(#[from] ValidationError),

    #[error("Could not determine app data directory")]
    NoDataDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Output encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// A product id that is not in the local cache.
    #[error("Product {0} is not cached; run `tote catalog refresh` first")]
    ProductNotCached(i64),

    /// The command could not do anything; the message was already shown.
    #[error("{0}")]
    Failed(UserMessage),
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use tote_core::{ErrorKind, Locale};

    #[test]
    fn test_failed_displays_localized_message() {
        let err = AppError::Failed(UserMessage::new(ErrorKind::Network, Locale::En));
        assert_eq!(err.to_string(), ErrorKind::Network.message(Locale::En));
    }

    #[test]
    fn test_product_not_cached_hint() {
        let err = AppError::ProductNotCached(7);
        assert!(err.to_string().contains("tote catalog refresh"));
    }
}
