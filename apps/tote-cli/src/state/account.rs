//! # Account State
//!
//! Signed-in profile, user document and the multi-step account flows.
//!
//! ## Flows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Account Flows                                        │
//! │                                                                         │
//! │  sign_up          create_account ─► send_email_verification            │
//! │                                  ─► push_token ─► save_push_token      │
//! │                   (verification and token failures do not undo the    │
//! │                    new account)                                        │
//! │                                                                         │
//! │  change_password  reauthenticate(email, current) ─► change_password    │
//! │                                                                         │
//! │  delete_account   reauthenticate ─► delete_detail                      │
//! │                                  ─► delete_profile_image               │
//! │                                  ─► delete_account                     │
//! │                   (stops at the first failure)                         │
//! │                                                                         │
//! │  phone            start_phone_verification(number) ─► verification id  │
//! │                   confirm_phone_code(code)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{info, warn};

use tote_core::{ErrorKind, Locale, Response, UserDetail, UserProfile};
use tote_repo::AccountRepository;

use super::UserMessage;

#[derive(Debug)]
pub struct AccountState {
    repo: AccountRepository,
    locale: Locale,
    profile: Option<UserProfile>,
    detail: Option<UserDetail>,
    verification_id: Option<String>,
    message: Option<UserMessage>,
}

impl AccountState {
    pub fn new(repo: AccountRepository, locale: Locale) -> Self {
        AccountState {
            repo,
            locale,
            profile: None,
            detail: None,
            verification_id: None,
            message: None,
        }
    }

    /// Creates the account and signs it in. Returns true if it was created.
    pub async fn sign_up(&mut self, email: &str, password: &str) -> bool {
        let response = self.repo.create_account(email, password).await;
        let Some(profile) = self.accept(response) else {
            return false;
        };
        let uid = profile.uid.clone();
        self.profile = Some(profile);
        info!(uid = %uid, "Account created");

        let verification = self.repo.send_email_verification().await;
        self.accept(verification);
        self.register_push_token(&uid).await;
        true
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> bool {
        let response = self.repo.sign_in(email, password).await;
        let Some(profile) = self.accept(response) else {
            return false;
        };
        let uid = profile.uid.clone();
        self.profile = Some(profile);
        self.register_push_token(&uid).await;
        true
    }

    pub async fn sign_out(&mut self) {
        let response = self.repo.sign_out().await;
        if self.accept(response).is_some() {
            self.profile = None;
            self.detail = None;
            self.verification_id = None;
        }
    }

    /// Re-reads the signed-in user from the identity service.
    pub async fn refresh_profile(&mut self) {
        let response = self.repo.current_user().await;
        if let Some(profile) = self.accept(response) {
            self.profile = profile;
        }
    }

    pub async fn update_display_name(&mut self, name: &str) -> bool {
        let response = self.repo.update_display_name(name).await;
        self.set_profile(response)
    }

    /// Uploads the profile image and points the profile at it.
    pub async fn upload_photo(&mut self, bytes: Vec<u8>) -> bool {
        let Some(uid) = self.signed_in_uid() else {
            return false;
        };
        let response = self.repo.upload_profile_image(&uid, bytes).await;
        let Some(url) = self.accept(response) else {
            return false;
        };
        let response = self.repo.update_photo_url(&url).await;
        self.set_profile(response)
    }

    /// Merges `detail` into the user document, then reloads it.
    pub async fn save_detail(&mut self, detail: &UserDetail) -> bool {
        let Some(uid) = self.signed_in_uid() else {
            return false;
        };
        let response = self.repo.merge_detail(&uid, detail).await;
        if self.accept(response).is_none() {
            return false;
        }
        self.load_detail().await;
        true
    }

    pub async fn load_detail(&mut self) {
        let Some(uid) = self.signed_in_uid() else {
            return;
        };
        let response = self.repo.fetch_detail(&uid).await;
        if let Some(detail) = self.accept(response) {
            self.detail = detail;
        }
    }

    pub async fn change_password(&mut self, current: &str, new_password: &str) -> bool {
        if !self.reauthenticate(current).await {
            return false;
        }
        let response = self.repo.change_password(new_password).await;
        self.accept(response).is_some()
    }

    /// Removes the user document, the profile image and the account.
    pub async fn delete_account(&mut self, password: &str) -> bool {
        let Some(uid) = self.signed_in_uid() else {
            return false;
        };
        if !self.reauthenticate(password).await {
            return false;
        }

        let response = self.repo.delete_detail(&uid).await;
        if self.accept(response).is_none() {
            return false;
        }
        let response = self.repo.delete_profile_image(&uid).await;
        if self.accept(response).is_none() {
            return false;
        }
        let response = self.repo.delete_account().await;
        if self.accept(response).is_none() {
            return false;
        }

        info!(uid = %uid, "Account deleted");
        self.profile = None;
        self.detail = None;
        true
    }

    /// Sends a code to `phone_number` and remembers the verification id.
    pub async fn start_phone_verification(&mut self, phone_number: &str) -> bool {
        let response = self.repo.send_phone_code(phone_number).await;
        match self.accept(response) {
            Some(verification_id) => {
                self.verification_id = Some(verification_id);
                true
            }
            None => false,
        }
    }

    pub async fn confirm_phone_code(&mut self, code: &str) -> bool {
        let Some(verification_id) = self.verification_id.clone() else {
            self.show(ErrorKind::InvalidVerificationCode);
            return false;
        };
        let response = self.repo.verify_phone_code(&verification_id, code).await;
        let confirmed = self.set_profile(response);
        if confirmed {
            self.verification_id = None;
        }
        confirmed
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn detail(&self) -> Option<&UserDetail> {
        self.detail.as_ref()
    }

    pub fn take_message(&mut self) -> Option<UserMessage> {
        self.message.take()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn reauthenticate(&mut self, password: &str) -> bool {
        let Some(email) = self.profile.as_ref().and_then(|p| p.email.clone()) else {
            self.show(ErrorKind::NotSignedIn);
            return false;
        };
        let response = self.repo.reauthenticate(&email, password).await;
        self.accept(response).is_some()
    }

    /// Token registration is best effort; failures are only logged.
    async fn register_push_token(&mut self, uid: &str) {
        let saved = match self.repo.push_token().await {
            Response::Success(token) => self.repo.save_push_token(uid, &token).await,
            Response::Failure(kind) => Response::Failure(kind),
        };
        if let Response::Failure(kind) = saved {
            warn!(uid = %uid, kind = %kind, "Push token not registered");
        }
    }

    fn signed_in_uid(&mut self) -> Option<String> {
        let uid = self.profile.as_ref().map(|p| p.uid.clone());
        if uid.is_none() {
            self.show(ErrorKind::NotSignedIn);
        }
        uid
    }

    fn set_profile(&mut self, response: Response<UserProfile>) -> bool {
        match self.accept(response) {
            Some(profile) => {
                self.profile = Some(profile);
                true
            }
            None => false,
        }
    }

    /// Unwraps a success, or shows the failure.
    fn accept<T>(&mut self, response: Response<T>) -> Option<T> {
        match response {
            Response::Success(value) => Some(value),
            Response::Failure(kind) => {
                self.show(kind);
                None
            }
        }
    }

    fn show(&mut self, kind: ErrorKind) {
        self.message = Some(UserMessage::new(kind, self.locale));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tote_remote::{InMemoryBackend, VendorErrorCode};

    const EMAIL: &str = "ada@example.com";
    const PASSWORD: &str = "secret1";

    fn account() -> (InMemoryBackend, AccountState) {
        let backend = InMemoryBackend::new();
        let repo = AccountRepository::in_memory(backend.clone());
        (backend, AccountState::new(repo, Locale::En))
    }

    async fn signed_up() -> (InMemoryBackend, AccountState) {
        let (backend, mut state) = account();
        assert!(state.sign_up(EMAIL, PASSWORD).await);
        (backend, state)
    }

    #[tokio::test]
    async fn test_sign_up_runs_every_step() {
        let (backend, state) = signed_up().await;

        let uid = state.profile().unwrap().uid.clone();
        assert_eq!(backend.verification_emails_sent(), 1);
        assert!(backend.document("push_tokens", &uid).is_some());
    }

    #[tokio::test]
    async fn test_sign_up_duplicate_shows_account_exists() {
        let (backend, mut state) = signed_up().await;

        assert!(!state.sign_up(EMAIL, PASSWORD).await);
        assert_eq!(
            state.take_message().map(|m| m.kind),
            Some(ErrorKind::AccountExists)
        );
        assert_eq!(backend.account_count(), 1);
    }

    #[tokio::test]
    async fn test_sign_up_offline_shows_network() {
        let (backend, mut state) = account();
        backend.set_offline(true);

        assert!(!state.sign_up(EMAIL, PASSWORD).await);
        assert_eq!(state.take_message().map(|m| m.kind), Some(ErrorKind::Network));
        assert!(state.profile().is_none());
        assert_eq!(backend.account_count(), 0);
    }

    #[tokio::test]
    async fn test_sign_out_failure_keeps_profile() {
        let (backend, mut state) = signed_up().await;
        backend.fail_next(VendorErrorCode::TooManyRequests);

        state.sign_out().await;

        assert_eq!(
            state.take_message().map(|m| m.kind),
            Some(ErrorKind::TooManyRequests)
        );
        assert!(state.profile().is_some());
    }

    #[tokio::test]
    async fn test_sign_out_then_sign_in() {
        let (_backend, mut state) = signed_up().await;

        state.sign_out().await;
        assert!(state.profile().is_none());

        assert!(!state.sign_in(EMAIL, "wrong-password").await);
        assert_eq!(
            state.take_message().map(|m| m.kind),
            Some(ErrorKind::InvalidCredentials)
        );

        assert!(state.sign_in(EMAIL, PASSWORD).await);
        assert_eq!(
            state.profile().and_then(|p| p.email.as_deref()),
            Some(EMAIL)
        );
    }

    #[tokio::test]
    async fn test_detail_round_trip() {
        let (_backend, mut state) = signed_up().await;

        assert!(state.save_detail(&UserDetail::default().with_address("1 Main St")).await);

        assert_eq!(
            state.detail().and_then(|d| d.address.as_deref()),
            Some("1 Main St")
        );
    }

    #[tokio::test]
    async fn test_detail_requires_sign_in() {
        let (_backend, mut state) = account();

        assert!(!state.save_detail(&UserDetail::default().with_address("x")).await);
        assert_eq!(state.take_message().map(|m| m.kind), Some(ErrorKind::NotSignedIn));
    }

    #[tokio::test]
    async fn test_change_password_reauthenticates_first() {
        let (backend, mut state) = signed_up().await;
        backend.expire_recent_login();

        assert!(!state.change_password("not-it", "secret2").await);
        assert_eq!(
            state.take_message().map(|m| m.kind),
            Some(ErrorKind::InvalidCredentials)
        );

        assert!(state.change_password(PASSWORD, "secret2").await);
        state.sign_out().await;
        assert!(state.sign_in(EMAIL, "secret2").await);
    }

    #[tokio::test]
    async fn test_delete_account_removes_everything() {
        let (backend, mut state) = signed_up().await;
        let uid = state.profile().unwrap().uid.clone();
        assert!(state.upload_photo(vec![1, 2, 3]).await);
        assert!(state.save_detail(&UserDetail::default().with_address("x")).await);
        backend.expire_recent_login();

        assert!(state.delete_account(PASSWORD).await);

        assert!(state.profile().is_none());
        assert_eq!(backend.account_count(), 0);
        assert!(backend.document("users", &uid).is_none());
        assert!(backend.object(&format!("profile_images/{uid}")).is_none());
    }

    #[tokio::test]
    async fn test_delete_account_without_image() {
        let (backend, mut state) = signed_up().await;

        assert!(state.delete_account(PASSWORD).await);
        assert_eq!(backend.account_count(), 0);
    }

    #[tokio::test]
    async fn test_upload_photo_updates_profile() {
        let (_backend, mut state) = signed_up().await;

        assert!(state.upload_photo(vec![9]).await);

        let photo = state.profile().and_then(|p| p.photo_url.clone()).unwrap();
        assert!(photo.starts_with("https://"));
    }

    #[tokio::test]
    async fn test_phone_verification() {
        let (backend, mut state) = signed_up().await;

        assert!(!state.confirm_phone_code("123456").await);
        assert_eq!(
            state.take_message().map(|m| m.kind),
            Some(ErrorKind::InvalidVerificationCode)
        );

        assert!(state.start_phone_verification("+15555550123").await);
        let code = backend.last_verification_code().unwrap();
        assert!(state.confirm_phone_code(&code).await);
        assert_eq!(
            state.profile().and_then(|p| p.phone_number.as_deref()),
            Some("+15555550123")
        );
    }

    #[tokio::test]
    async fn test_refresh_profile() {
        let (_backend, mut state) = signed_up().await;
        assert!(state.update_display_name("Ada").await);

        state.refresh_profile().await;

        assert_eq!(
            state.profile().and_then(|p| p.display_name.as_deref()),
            Some("Ada")
        );
    }
}
