//! # In-Memory Backend
//!
//! A process-local stand-in for the hosted identity, storage, document and
//! messaging services. Used by the CLI when no hosted backend is wired in,
//! and by tests.
//!
//! ## Behaviour
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       InMemoryBackend                                   │
//! │                                                                         │
//! │  backend.sign_in(email, pw, done)                                      │
//! │       │                                                                 │
//! │       └── std::thread::spawn ──► lock state ──► done.complete(result)  │
//! │                                                                         │
//! │  Every call completes on its own thread, like a vendor SDK would.      │
//! │                                                                         │
//! │  Failure injection (checked before every call):                        │
//! │    set_offline(true)   every call fails with Network                   │
//! │    fail_next(code)     the next call fails with `code`                 │
//! │                                                                         │
//! │  Test hooks:                                                           │
//! │    last_verification_code()   the SMS code that would have been sent   │
//! │    expire_recent_login()      sensitive calls now need reauthenticate  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;
use uuid::Uuid;

use tote_core::validation::MIN_PASSWORD_LENGTH;
use tote_core::UserProfile;

use crate::backend::{
    Document, DocumentBackend, IdentityBackend, MessagingBackend, ProfileUpdate, StorageBackend,
    VendorError, VendorErrorCode,
};
use crate::callback::Completer;

#[derive(Debug)]
struct Account {
    email: String,
    password: String,
    profile: UserProfile,
}

#[derive(Debug)]
struct PhoneVerification {
    phone_number: String,
    code: String,
}

#[derive(Debug, Default)]
struct State {
    /// Keyed by uid.
    accounts: HashMap<String, Account>,
    current_uid: Option<String>,
    recent_login: bool,
    verification_emails: usize,
    verifications: HashMap<String, PhoneVerification>,
    last_verification_code: Option<String>,
    objects: HashMap<String, Vec<u8>>,
    documents: HashMap<(String, String), Document>,
    push_token: String,
    offline: bool,
    fail_next: Option<VendorErrorCode>,
}

type Outcome<T> = Result<T, VendorError>;

impl State {
    fn current_account(&mut self) -> Outcome<&mut Account> {
        let uid = self
            .current_uid
            .clone()
            .ok_or(VendorErrorCode::NoCurrentUser)?;
        self.accounts
            .get_mut(&uid)
            .ok_or_else(|| VendorErrorCode::NoCurrentUser.into())
    }

    fn require_recent_login(&self) -> Outcome<()> {
        if self.recent_login {
            Ok(())
        } else {
            Err(VendorError::new(VendorErrorCode::RequiresRecentLogin)
                .with_message("This operation is sensitive and requires recent authentication"))
        }
    }

    fn uid_for_email(&self, email: &str) -> Option<String> {
        self.accounts
            .iter()
            .find(|(_, account)| account.email.eq_ignore_ascii_case(email))
            .map(|(uid, _)| uid.clone())
    }
}

fn check_password(password: &str) -> Outcome<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(VendorError::new(VendorErrorCode::WeakPassword)
            .with_message(format!("Password should be at least {MIN_PASSWORD_LENGTH} characters")));
    }
    Ok(())
}

/// Download URLs point at a reserved host so they pass photo URL checks.
pub const OBJECT_BASE_URL: &str = "https://objects.tote.invalid";

fn object_url(path: &str) -> String {
    format!("{OBJECT_BASE_URL}/{path}")
}

/// Process-local backend implementing every vendor trait.
#[derive(Debug, Clone)]
pub struct InMemoryBackend {
    state: Arc<Mutex<State>>,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    pub fn new() -> Self {
        let state = State {
            push_token: format!("memory-push-{}", Uuid::new_v4().simple()),
            ..State::default()
        };
        InMemoryBackend {
            state: Arc::new(Mutex::new(state)),
        }
    }

    // =========================================================================
    // Failure Injection & Test Hooks
    // =========================================================================

    /// The next backend call fails with `code`.
    pub fn fail_next(&self, code: VendorErrorCode) {
        self.lock().fail_next = Some(code);
    }

    /// While offline every call fails with `Network`.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// The code sent by the most recent `send_phone_code`.
    pub fn last_verification_code(&self) -> Option<String> {
        self.lock().last_verification_code.clone()
    }

    /// Makes password change and account deletion demand reauthentication.
    pub fn expire_recent_login(&self) {
        self.lock().recent_login = false;
    }

    pub fn verification_emails_sent(&self) -> usize {
        self.lock().verification_emails
    }

    pub fn account_count(&self) -> usize {
        self.lock().accounts.len()
    }

    pub fn object(&self, path: &str) -> Option<Vec<u8>> {
        self.lock().objects.get(path).cloned()
    }

    pub fn document(&self, collection: &str, id: &str) -> Option<Document> {
        self.lock()
            .documents
            .get(&(collection.to_string(), id.to_string()))
            .cloned()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panicked completion thread must not wedge every later call.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Runs `op` against the state on a fresh thread and completes `done`.
    fn respond<T, F>(&self, done: Completer<T>, op: F)
    where
        T: Send + 'static,
        F: FnOnce(&mut State) -> Outcome<T> + Send + 'static,
    {
        let state = Arc::clone(&self.state);
        std::thread::spawn(move || {
            let result = {
                let mut state = state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                if state.offline {
                    Err(VendorError::new(VendorErrorCode::Network).with_message("offline"))
                } else if let Some(code) = state.fail_next.take() {
                    Err(VendorError::new(code).with_message("injected failure"))
                } else {
                    op(&mut state)
                }
            };
            debug!(op = done.op(), ok = result.is_ok(), "In-memory backend completed");
            done.complete(result);
        });
    }
}

// =============================================================================
// Identity
// =============================================================================

impl IdentityBackend for InMemoryBackend {
    fn create_user(&self, email: String, password: String, done: Completer<UserProfile>) {
        self.respond(done, move |state| {
            if state.uid_for_email(&email).is_some() {
                return Err(VendorError::new(VendorErrorCode::EmailAlreadyInUse));
            }
            check_password(&password)?;

            let uid = Uuid::new_v4().simple().to_string();
            let profile = UserProfile {
                uid: uid.clone(),
                email: Some(email.clone()),
                ..UserProfile::default()
            };
            state.accounts.insert(
                uid.clone(),
                Account {
                    email,
                    password,
                    profile: profile.clone(),
                },
            );
            state.current_uid = Some(uid);
            state.recent_login = true;
            Ok(profile)
        });
    }

    fn sign_in(&self, email: String, password: String, done: Completer<UserProfile>) {
        self.respond(done, move |state| {
            let uid = state
                .uid_for_email(&email)
                .filter(|uid| state.accounts.get(uid).is_some_and(|a| a.password == password))
                .ok_or(VendorErrorCode::InvalidCredential)?;

            state.current_uid = Some(uid);
            state.recent_login = true;
            Ok(state.current_account()?.profile.clone())
        });
    }

    fn sign_out(&self, done: Completer<()>) {
        self.respond(done, |state| {
            state.current_uid = None;
            state.recent_login = false;
            Ok(())
        });
    }

    fn current_user(&self, done: Completer<Option<UserProfile>>) {
        self.respond(done, |state| {
            Ok(state.current_account().ok().map(|a| a.profile.clone()))
        });
    }

    fn update_profile(&self, update: ProfileUpdate, done: Completer<UserProfile>) {
        self.respond(done, move |state| {
            let account = state.current_account()?;
            if let Some(name) = update.display_name {
                account.profile.display_name = Some(name);
            }
            if let Some(url) = update.photo_url {
                account.profile.photo_url = Some(url);
            }
            Ok(account.profile.clone())
        });
    }

    fn send_email_verification(&self, done: Completer<()>) {
        self.respond(done, |state| {
            state.current_account()?;
            state.verification_emails += 1;
            Ok(())
        });
    }

    fn send_password_reset(&self, email: String, done: Completer<()>) {
        // Succeeds for unknown addresses too, so accounts can't be probed.
        self.respond(done, move |_state| {
            debug!(email = %email, "Password reset requested");
            Ok(())
        });
    }

    fn update_password(&self, new_password: String, done: Completer<()>) {
        self.respond(done, move |state| {
            state.require_recent_login()?;
            check_password(&new_password)?;
            state.current_account()?.password = new_password;
            Ok(())
        });
    }

    fn delete_user(&self, done: Completer<()>) {
        self.respond(done, |state| {
            let uid = state.current_account()?.profile.uid.clone();
            state.require_recent_login()?;
            state.accounts.remove(&uid);
            state.current_uid = None;
            state.recent_login = false;
            Ok(())
        });
    }

    fn reauthenticate(&self, email: String, password: String, done: Completer<()>) {
        self.respond(done, move |state| {
            let account = state.current_account()?;
            if !account.email.eq_ignore_ascii_case(&email) || account.password != password {
                return Err(VendorErrorCode::InvalidCredential.into());
            }
            state.recent_login = true;
            Ok(())
        });
    }

    fn send_phone_code(&self, phone_number: String, done: Completer<String>) {
        self.respond(done, move |state| {
            let verification_id = Uuid::new_v4().simple().to_string();
            let code = format!("{:06}", Uuid::new_v4().as_u128() % 1_000_000);
            state.last_verification_code = Some(code.clone());
            state
                .verifications
                .insert(verification_id.clone(), PhoneVerification { phone_number, code });
            Ok(verification_id)
        });
    }

    fn update_phone_number(
        &self,
        verification_id: String,
        code: String,
        done: Completer<UserProfile>,
    ) {
        self.respond(done, move |state| {
            let matches = state
                .verifications
                .get(&verification_id)
                .is_some_and(|v| v.code == code);
            if !matches {
                return Err(VendorErrorCode::InvalidVerificationCode.into());
            }

            state.current_account()?;
            let verification = state
                .verifications
                .remove(&verification_id)
                .ok_or(VendorErrorCode::InvalidVerificationCode)?;
            let account = state.current_account()?;
            account.profile.phone_number = Some(verification.phone_number);
            Ok(account.profile.clone())
        });
    }
}

// =============================================================================
// Storage / Documents / Messaging
// =============================================================================

impl StorageBackend for InMemoryBackend {
    fn put(&self, path: String, bytes: Vec<u8>, done: Completer<String>) {
        self.respond(done, move |state| {
            let url = object_url(&path);
            state.objects.insert(path, bytes);
            Ok(url)
        });
    }

    fn download_url(&self, path: String, done: Completer<String>) {
        self.respond(done, move |state| {
            if state.objects.contains_key(&path) {
                Ok(object_url(&path))
            } else {
                Err(VendorError::new(VendorErrorCode::NotFound).with_message(path))
            }
        });
    }

    fn delete(&self, path: String, done: Completer<()>) {
        self.respond(done, move |state| match state.objects.remove(&path) {
            Some(_) => Ok(()),
            None => Err(VendorError::new(VendorErrorCode::NotFound).with_message(path)),
        });
    }
}

impl DocumentBackend for InMemoryBackend {
    fn set_merge(&self, collection: String, id: String, fields: Document, done: Completer<()>) {
        self.respond(done, move |state| {
            state
                .documents
                .entry((collection, id))
                .or_default()
                .extend(fields);
            Ok(())
        });
    }

    fn get(&self, collection: String, id: String, done: Completer<Option<Document>>) {
        self.respond(done, move |state| Ok(state.documents.get(&(collection, id)).cloned()));
    }

    fn delete(&self, collection: String, id: String, done: Completer<()>) {
        self.respond(done, move |state| {
            state.documents.remove(&(collection, id));
            Ok(())
        });
    }
}

impl MessagingBackend for InMemoryBackend {
    fn token(&self, done: Completer<String>) {
        self.respond(done, |state| Ok(state.push_token.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::pending;
    use serde_json::json;

    #[tokio::test]
    async fn test_fail_next_applies_once() {
        let backend = InMemoryBackend::new();
        backend.fail_next(VendorErrorCode::TooManyRequests);

        let first = pending("token", |done| backend.token(done)).await;
        assert_eq!(first.unwrap_err().code, VendorErrorCode::TooManyRequests);

        let second = pending("token", |done| backend.token(done)).await;
        assert!(second.unwrap().starts_with("memory-push-"));
    }

    #[tokio::test]
    async fn test_offline_fails_every_call() {
        let backend = InMemoryBackend::new();
        backend.set_offline(true);

        let result = pending("put", |done| {
            StorageBackend::put(&backend, "a".to_string(), vec![1], done)
        })
        .await;
        assert_eq!(result.unwrap_err().code, VendorErrorCode::Network);
        assert!(backend.object("a").is_none());
    }

    #[tokio::test]
    async fn test_set_merge_keeps_other_fields() {
        let backend = InMemoryBackend::new();
        let write = |fields: serde_json::Value| {
            let backend = backend.clone();
            let fields = fields.as_object().cloned().unwrap_or_default();
            pending("set_merge", move |done| {
                backend.set_merge("users".into(), "u1".into(), fields, done)
            })
        };

        write(json!({ "address": "1 Main St" })).await.unwrap();
        write(json!({ "birthdate": 0 })).await.unwrap();

        let doc = backend.document("users", "u1").unwrap();
        assert_eq!(doc.get("address"), Some(&json!("1 Main St")));
        assert_eq!(doc.get("birthdate"), Some(&json!(0)));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let backend = InMemoryBackend::new();
        let create = |email: &str| {
            let backend = backend.clone();
            let email = email.to_string();
            pending("create_user", move |done| {
                backend.create_user(email, "secret1".into(), done)
            })
        };

        create("ada@example.com").await.unwrap();
        let err = create("ADA@example.com").await.unwrap_err();

        assert_eq!(err.code, VendorErrorCode::EmailAlreadyInUse);
        assert_eq!(backend.account_count(), 1);
    }
}
