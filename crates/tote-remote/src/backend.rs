//! # Vendor Backend Traits
//!
//! The hosted identity, file storage, document store and push messaging
//! services, as seen by this crate.
//!
//! ## Calling Convention
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Callback-Style Backend Calls                          │
//! │                                                                         │
//! │  IdentitySource::sign_in(email, pw)            (async fn)              │
//! │       │                                                                 │
//! │       │  bridge("sign_in", |done| backend.sign_in(email, pw, done))    │
//! │       ▼                                                                 │
//! │  IdentityBackend::sign_in(email, pw, done)     (returns immediately)   │
//! │       │                                                                 │
//! │       │  ... vendor thread ...                                          │
//! │       ▼                                                                 │
//! │  done.succeed(profile)  or  done.fail(VendorError)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  awaiting task resumes with Response<UserProfile>                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Implementations must complete every `Completer` they receive, on any
//! thread. A completer that is dropped instead surfaces as `Unknown`.

use serde_json::{Map, Value};
use std::fmt;

use tote_core::{ErrorKind, FailureCause, UserProfile};

use crate::callback::Completer;

/// A stored document: top-level field names to JSON values.
pub type Document = Map<String, Value>;

// =============================================================================
// Vendor Errors
// =============================================================================

/// Failure codes reported by vendor backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VendorErrorCode {
    Network,
    InvalidCredential,
    EmailAlreadyInUse,
    WeakPassword,
    InvalidEmail,
    InvalidPhoneNumber,
    RequiresRecentLogin,
    InvalidVerificationCode,
    NoCurrentUser,
    TooManyRequests,
    /// The addressed object or document does not exist.
    NotFound,
    Internal,
    /// The backend dropped the callback without completing it.
    Abandoned,
}

impl fmt::Display for VendorErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            VendorErrorCode::Network => "network-request-failed",
            VendorErrorCode::InvalidCredential => "invalid-credential",
            VendorErrorCode::EmailAlreadyInUse => "email-already-in-use",
            VendorErrorCode::WeakPassword => "weak-password",
            VendorErrorCode::InvalidEmail => "invalid-email",
            VendorErrorCode::InvalidPhoneNumber => "invalid-phone-number",
            VendorErrorCode::RequiresRecentLogin => "requires-recent-login",
            VendorErrorCode::InvalidVerificationCode => "invalid-verification-code",
            VendorErrorCode::NoCurrentUser => "no-current-user",
            VendorErrorCode::TooManyRequests => "too-many-requests",
            VendorErrorCode::NotFound => "not-found",
            VendorErrorCode::Internal => "internal",
            VendorErrorCode::Abandoned => "abandoned",
        };
        f.write_str(code)
    }
}

/// An error reported through a `Completer`.
///
/// The vendor message is for logs only; users see the `ErrorKind` template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorError {
    pub code: VendorErrorCode,
    pub message: Option<String>,
}

impl VendorError {
    pub fn new(code: VendorErrorCode) -> Self {
        VendorError { code, message: None }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn is_not_found(&self) -> bool {
        self.code == VendorErrorCode::NotFound
    }
}

impl fmt::Display for VendorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.code, message),
            None => write!(f, "{}", self.code),
        }
    }
}

impl std::error::Error for VendorError {}

impl From<VendorErrorCode> for VendorError {
    fn from(code: VendorErrorCode) -> Self {
        VendorError::new(code)
    }
}

impl FailureCause for VendorError {
    fn error_kind(&self) -> ErrorKind {
        match self.code {
            VendorErrorCode::Network => ErrorKind::Network,
            VendorErrorCode::InvalidCredential => ErrorKind::InvalidCredentials,
            VendorErrorCode::EmailAlreadyInUse => ErrorKind::AccountExists,
            VendorErrorCode::WeakPassword => ErrorKind::WeakPassword,
            VendorErrorCode::InvalidEmail => ErrorKind::InvalidEmail,
            VendorErrorCode::InvalidPhoneNumber => ErrorKind::InvalidPhoneNumber,
            VendorErrorCode::RequiresRecentLogin => ErrorKind::RecentLoginRequired,
            VendorErrorCode::InvalidVerificationCode => ErrorKind::InvalidVerificationCode,
            VendorErrorCode::NoCurrentUser => ErrorKind::NotSignedIn,
            VendorErrorCode::TooManyRequests => ErrorKind::TooManyRequests,
            VendorErrorCode::NotFound | VendorErrorCode::Internal | VendorErrorCode::Abandoned => {
                ErrorKind::Unknown
            }
        }
    }
}

// =============================================================================
// Backend Traits
// =============================================================================

/// Fields to change on the signed-in user's profile. `None` leaves a field
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

/// Hosted identity service.
pub trait IdentityBackend: Send + Sync {
    fn create_user(&self, email: String, password: String, done: Completer<UserProfile>);

    fn sign_in(&self, email: String, password: String, done: Completer<UserProfile>);

    fn sign_out(&self, done: Completer<()>);

    fn current_user(&self, done: Completer<Option<UserProfile>>);

    fn update_profile(&self, update: ProfileUpdate, done: Completer<UserProfile>);

    fn send_email_verification(&self, done: Completer<()>);

    fn send_password_reset(&self, email: String, done: Completer<()>);

    /// Fails with `RequiresRecentLogin` when the session is stale.
    fn update_password(&self, new_password: String, done: Completer<()>);

    /// Fails with `RequiresRecentLogin` when the session is stale.
    fn delete_user(&self, done: Completer<()>);

    fn reauthenticate(&self, email: String, password: String, done: Completer<()>);

    /// Sends an SMS code; completes with the verification id.
    fn send_phone_code(&self, phone_number: String, done: Completer<String>);

    fn update_phone_number(
        &self,
        verification_id: String,
        code: String,
        done: Completer<UserProfile>,
    );
}

/// Hosted object storage.
pub trait StorageBackend: Send + Sync {
    /// Stores `bytes` at `path`; completes with the download URL.
    fn put(&self, path: String, bytes: Vec<u8>, done: Completer<String>);

    /// Fails with `NotFound` when nothing is stored at `path`.
    fn download_url(&self, path: String, done: Completer<String>);

    /// Fails with `NotFound` when nothing is stored at `path`.
    fn delete(&self, path: String, done: Completer<()>);
}

/// Hosted document store.
pub trait DocumentBackend: Send + Sync {
    /// Writes `fields` into `collection/id`, keeping fields not mentioned.
    fn set_merge(&self, collection: String, id: String, fields: Document, done: Completer<()>);

    fn get(&self, collection: String, id: String, done: Completer<Option<Document>>);

    /// Deleting an absent document succeeds.
    fn delete(&self, collection: String, id: String, done: Completer<()>);
}

/// Push messaging registration.
pub trait MessagingBackend: Send + Sync {
    fn token(&self, done: Completer<String>);
}
