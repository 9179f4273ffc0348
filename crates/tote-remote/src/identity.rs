//! # Identity Source
//!
//! Account and session operations against the hosted identity service.
//!
//! ## Local Validation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Validate, Then Call                                 │
//! │                                                                         │
//! │  create_account("ada@", "123")                                         │
//! │       │                                                                 │
//! │       ├── validate_email     ✗  ──► Failure(InvalidEmail)              │
//! │       │                           (backend never called)               │
//! │       ├── validate_password                                            │
//! │       ▼                                                                 │
//! │  bridge("create_user", ..)  ──► Response<UserProfile>                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::sync::Arc;
use tracing::debug;
use url::Url;

use tote_core::validation::{
    validate_display_name, validate_email, validate_password, validate_phone_number,
    validate_verification_code, ValidationResult,
};
use tote_core::{ErrorKind, FailureCause, Response, UserProfile};

use crate::backend::{IdentityBackend, ProfileUpdate};
use crate::callback::bridge;

/// Short-circuits with the validation failure, without touching the backend.
macro_rules! validated {
    ($check:expr) => {
        if let Err(e) = $check {
            return rejected(e);
        }
    };
}

fn rejected<T>(cause: impl FailureCause) -> Response<T> {
    debug!(reason = %cause, "Rejected before reaching the identity service");
    Response::Failure(cause.error_kind())
}

fn validate_photo_url(url: &str) -> ValidationResult<()> {
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        Ok(_) => Err(tote_core::ValidationError::NotAllowed {
            field: "photo_url".to_string(),
            allowed: vec!["http".to_string(), "https".to_string()],
        }),
        Err(e) => Err(tote_core::ValidationError::InvalidFormat {
            field: "photo_url".to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Identity operations over any [`IdentityBackend`].
#[derive(Clone)]
pub struct IdentitySource {
    backend: Arc<dyn IdentityBackend>,
}

impl fmt::Debug for IdentitySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentitySource").finish_non_exhaustive()
    }
}

impl IdentitySource {
    pub fn new(backend: Arc<dyn IdentityBackend>) -> Self {
        IdentitySource { backend }
    }

    /// Creates an account and signs it in.
    pub async fn create_account(&self, email: &str, password: &str) -> Response<UserProfile> {
        validated!(validate_email(email));
        validated!(validate_password(password));

        bridge("create_user", |done| {
            self.backend
                .create_user(email.trim().to_string(), password.to_string(), done)
        })
        .await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Response<UserProfile> {
        validated!(validate_email(email));
        if password.is_empty() {
            return Response::Failure(ErrorKind::InvalidCredentials);
        }

        bridge("sign_in", |done| {
            self.backend
                .sign_in(email.trim().to_string(), password.to_string(), done)
        })
        .await
    }

    pub async fn sign_out(&self) -> Response<()> {
        bridge("sign_out", |done| self.backend.sign_out(done)).await
    }

    /// The signed-in user, or `None`.
    pub async fn current_user(&self) -> Response<Option<UserProfile>> {
        bridge("current_user", |done| self.backend.current_user(done)).await
    }

    pub async fn update_display_name(&self, name: &str) -> Response<UserProfile> {
        validated!(validate_display_name(name));

        let update = ProfileUpdate {
            display_name: Some(name.trim().to_string()),
            ..ProfileUpdate::default()
        };
        bridge("update_profile", |done| self.backend.update_profile(update, done)).await
    }

    pub async fn update_photo_url(&self, url: &str) -> Response<UserProfile> {
        validated!(validate_photo_url(url));

        let update = ProfileUpdate {
            photo_url: Some(url.to_string()),
            ..ProfileUpdate::default()
        };
        bridge("update_profile", |done| self.backend.update_profile(update, done)).await
    }

    pub async fn send_email_verification(&self) -> Response<()> {
        bridge("send_email_verification", |done| {
            self.backend.send_email_verification(done)
        })
        .await
    }

    pub async fn send_password_reset(&self, email: &str) -> Response<()> {
        validated!(validate_email(email));

        bridge("send_password_reset", |done| {
            self.backend
                .send_password_reset(email.trim().to_string(), done)
        })
        .await
    }

    /// Requires a recent sign-in; see [`reauthenticate`](Self::reauthenticate).
    pub async fn change_password(&self, new_password: &str) -> Response<()> {
        validated!(validate_password(new_password));

        bridge("update_password", |done| {
            self.backend.update_password(new_password.to_string(), done)
        })
        .await
    }

    /// Requires a recent sign-in; see [`reauthenticate`](Self::reauthenticate).
    pub async fn delete_account(&self) -> Response<()> {
        bridge("delete_user", |done| self.backend.delete_user(done)).await
    }

    pub async fn reauthenticate(&self, email: &str, password: &str) -> Response<()> {
        validated!(validate_email(email));
        if password.is_empty() {
            return Response::Failure(ErrorKind::InvalidCredentials);
        }

        bridge("reauthenticate", |done| {
            self.backend
                .reauthenticate(email.trim().to_string(), password.to_string(), done)
        })
        .await
    }

    /// Sends an SMS code and returns the verification id to confirm it with.
    pub async fn send_phone_code(&self, phone_number: &str) -> Response<String> {
        validated!(validate_phone_number(phone_number));

        bridge("send_phone_code", |done| {
            self.backend
                .send_phone_code(phone_number.trim().to_string(), done)
        })
        .await
    }

    pub async fn verify_phone_code(
        &self,
        verification_id: &str,
        code: &str,
    ) -> Response<UserProfile> {
        validated!(validate_verification_code(code));
        if verification_id.is_empty() {
            return Response::Failure(ErrorKind::InvalidVerificationCode);
        }

        bridge("update_phone_number", |done| {
            self.backend
                .update_phone_number(verification_id.to_string(), code.trim().to_string(), done)
        })
        .await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::VendorErrorCode;
    use crate::memory::InMemoryBackend;

    fn source() -> (InMemoryBackend, IdentitySource) {
        let backend = InMemoryBackend::new();
        let source = IdentitySource::new(Arc::new(backend.clone()));
        (backend, source)
    }

    #[tokio::test]
    async fn test_create_account_signs_in() {
        let (_backend, identity) = source();

        let profile = identity
            .create_account("ada@example.com", "secret1")
            .await
            .success()
            .unwrap();

        assert_eq!(profile.email.as_deref(), Some("ada@example.com"));
        assert_eq!(identity.current_user().await, Response::Success(Some(profile)));
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_backend() {
        let (backend, identity) = source();
        backend.set_offline(true); // any backend call would fail with Network

        assert_eq!(
            identity.create_account("not-an-email", "secret1").await,
            Response::Failure(ErrorKind::InvalidEmail)
        );
        assert_eq!(
            identity.create_account("ada@example.com", "123").await,
            Response::Failure(ErrorKind::WeakPassword)
        );
        assert_eq!(
            identity.send_phone_code("555-1234").await,
            Response::Failure(ErrorKind::InvalidPhoneNumber)
        );
        assert_eq!(
            identity.verify_phone_code("vid", "12ab").await,
            Response::Failure(ErrorKind::InvalidVerificationCode)
        );
        assert_eq!(
            identity.update_display_name("").await,
            Response::Failure(ErrorKind::InvalidInput)
        );
        assert_eq!(backend.account_count(), 0);
    }

    #[tokio::test]
    async fn test_wrong_password_is_invalid_credentials() {
        let (_backend, identity) = source();
        identity.create_account("ada@example.com", "secret1").await;
        identity.sign_out().await;

        assert_eq!(
            identity.sign_in("ada@example.com", "wrong-pw").await,
            Response::Failure(ErrorKind::InvalidCredentials)
        );
        assert_eq!(identity.current_user().await, Response::Success(None));
    }

    #[tokio::test]
    async fn test_duplicate_account_is_account_exists() {
        let (_backend, identity) = source();
        identity.create_account("ada@example.com", "secret1").await;

        assert_eq!(
            identity.create_account("ada@example.com", "secret2").await,
            Response::Failure(ErrorKind::AccountExists)
        );
    }

    #[tokio::test]
    async fn test_change_password_needs_recent_login() {
        let (backend, identity) = source();
        identity.create_account("ada@example.com", "secret1").await;
        backend.expire_recent_login();

        assert_eq!(
            identity.change_password("secret2").await,
            Response::Failure(ErrorKind::RecentLoginRequired)
        );

        assert!(identity.reauthenticate("ada@example.com", "secret1").await.is_success());
        assert!(identity.change_password("secret2").await.is_success());

        identity.sign_out().await;
        assert!(identity.sign_in("ada@example.com", "secret2").await.is_success());
    }

    #[tokio::test]
    async fn test_phone_verification() {
        let (backend, identity) = source();
        identity.create_account("ada@example.com", "secret1").await;

        let verification_id = identity.send_phone_code("+15551234567").await.success().unwrap();
        let code = backend.last_verification_code().unwrap();
        let wrong = if code == "000000" { "111111" } else { "000000" };

        assert_eq!(
            identity.verify_phone_code(&verification_id, wrong).await,
            Response::Failure(ErrorKind::InvalidVerificationCode)
        );

        let profile = identity
            .verify_phone_code(&verification_id, &code)
            .await
            .success()
            .unwrap();
        assert_eq!(profile.phone_number.as_deref(), Some("+15551234567"));
    }

    #[tokio::test]
    async fn test_profile_updates() {
        let (_backend, identity) = source();
        identity.create_account("ada@example.com", "secret1").await;

        let named = identity.update_display_name("Ada").await.success().unwrap();
        assert_eq!(named.display_name.as_deref(), Some("Ada"));

        let pictured = identity
            .update_photo_url("https://cdn.example.com/ada.png")
            .await
            .success()
            .unwrap();
        assert_eq!(pictured.display_name.as_deref(), Some("Ada"));
        assert_eq!(pictured.photo_url.as_deref(), Some("https://cdn.example.com/ada.png"));
    }

    #[tokio::test]
    async fn test_photo_url_must_be_http() {
        let (_backend, identity) = source();
        identity.create_account("ada@example.com", "secret1").await;

        for url in ["memory://x", "file:///etc/passwd", "javascript:alert(1)", "not a url"] {
            assert_eq!(
                identity.update_photo_url(url).await,
                Response::Failure(ErrorKind::InvalidInput),
                "{url}"
            );
        }
        let profile = identity.current_user().await.success().flatten().unwrap();
        assert_eq!(profile.photo_url, None);
    }

    #[tokio::test]
    async fn test_signed_out_mutations_are_not_signed_in() {
        let (backend, identity) = source();

        assert_eq!(
            identity.send_email_verification().await,
            Response::Failure(ErrorKind::NotSignedIn)
        );

        backend.fail_next(VendorErrorCode::Network);
        assert_eq!(identity.sign_out().await, Response::Failure(ErrorKind::Network));
    }
}
