//! # tote-remote: Remote Data Sources for Tote
//!
//! Everything that talks to a service off the device.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Remote Data Sources                              │
//! │                                                                         │
//! │  ShoppingRepository              AccountRepository                     │
//! │       │                               │                                 │
//! │       ▼                               ▼                                 │
//! │  ┌──────────────┐   ┌─────────────────────────────────────────────┐   │
//! │  │CatalogSource │   │ IdentitySource  ProfileImageSource           │   │
//! │  │  (reqwest)   │   │ UserDocumentSource  PushTokenSource          │   │
//! │  └──────┬───────┘   └──────────────────┬──────────────────────────┘   │
//! │         │                              │ bridge() / pending()          │
//! │         ▼                              ▼                                │
//! │   REST catalog              dyn IdentityBackend / StorageBackend /     │
//! │                             DocumentBackend / MessagingBackend         │
//! │                             (vendor SDK or InMemoryBackend)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both paths end in the same place: an `async fn` returning
//! [`tote_core::Response`], with failures classified into
//! [`tote_core::ErrorKind`].
//!
//! ## Module Organization
//!
//! - [`catalog`] - REST catalog client
//! - [`callback`] - completion-callback to `async` bridge
//! - [`backend`] - vendor backend traits and `VendorError`
//! - [`identity`], [`storage`], [`document`], [`messaging`] - vendor-backed sources
//! - [`memory`] - process-local backend
//! - [`config`] - `RemoteConfig` (TOML + environment)
//! - [`error`] - `RemoteError`

pub mod backend;
pub mod callback;
pub mod catalog;
pub mod config;
pub mod document;
pub mod error;
pub mod identity;
pub mod memory;
pub mod messaging;
pub mod storage;

pub use backend::{
    Document, DocumentBackend, IdentityBackend, MessagingBackend, ProfileUpdate, StorageBackend,
    VendorError, VendorErrorCode,
};
pub use callback::{bridge, pending, Completer};
pub use catalog::CatalogSource;
pub use config::{BackendSettings, CatalogSettings, RemoteConfig};
pub use document::UserDocumentSource;
pub use error::{RemoteError, RemoteResult};
pub use identity::IdentitySource;
pub use memory::InMemoryBackend;
pub use messaging::PushTokenSource;
pub use storage::ProfileImageSource;
