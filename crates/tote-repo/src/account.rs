//! # Account Repository
//!
//! Identity, profile image, user document and push token sources behind
//! one handle. Every method forwards; sequencing of multi-step flows such
//! as sign-up lives in the account state holder.

use std::sync::Arc;

use tote_core::{Response, UserDetail, UserProfile};
use tote_remote::{
    DocumentBackend, IdentityBackend, IdentitySource, InMemoryBackend, MessagingBackend,
    ProfileImageSource, PushTokenSource, StorageBackend, UserDocumentSource,
};

#[derive(Debug, Clone)]
pub struct AccountRepository {
    identity: IdentitySource,
    images: ProfileImageSource,
    documents: UserDocumentSource,
    push: PushTokenSource,
}

impl AccountRepository {
    pub fn new(
        identity: Arc<dyn IdentityBackend>,
        storage: Arc<dyn StorageBackend>,
        documents: Arc<dyn DocumentBackend>,
        messaging: Arc<dyn MessagingBackend>,
    ) -> Self {
        AccountRepository {
            identity: IdentitySource::new(identity),
            images: ProfileImageSource::new(storage),
            documents: UserDocumentSource::new(documents),
            push: PushTokenSource::new(messaging),
        }
    }

    /// All four services served by one in-memory backend.
    pub fn in_memory(backend: InMemoryBackend) -> Self {
        let backend = Arc::new(backend);
        Self::new(backend.clone(), backend.clone(), backend.clone(), backend)
    }

    // =========================================================================
    // Identity
    // =========================================================================

    pub async fn create_account(&self, email: &str, password: &str) -> Response<UserProfile> {
        self.identity.create_account(email, password).await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Response<UserProfile> {
        self.identity.sign_in(email, password).await
    }

    pub async fn sign_out(&self) -> Response<()> {
        self.identity.sign_out().await
    }

    pub async fn current_user(&self) -> Response<Option<UserProfile>> {
        self.identity.current_user().await
    }

    pub async fn update_display_name(&self, name: &str) -> Response<UserProfile> {
        self.identity.update_display_name(name).await
    }

    pub async fn update_photo_url(&self, url: &str) -> Response<UserProfile> {
        self.identity.update_photo_url(url).await
    }

    pub async fn send_email_verification(&self) -> Response<()> {
        self.identity.send_email_verification().await
    }

    pub async fn send_password_reset(&self, email: &str) -> Response<()> {
        self.identity.send_password_reset(email).await
    }

    pub async fn change_password(&self, new_password: &str) -> Response<()> {
        self.identity.change_password(new_password).await
    }

    pub async fn delete_account(&self) -> Response<()> {
        self.identity.delete_account().await
    }

    pub async fn reauthenticate(&self, email: &str, password: &str) -> Response<()> {
        self.identity.reauthenticate(email, password).await
    }

    pub async fn send_phone_code(&self, phone_number: &str) -> Response<String> {
        self.identity.send_phone_code(phone_number).await
    }

    pub async fn verify_phone_code(
        &self,
        verification_id: &str,
        code: &str,
    ) -> Response<UserProfile> {
        self.identity.verify_phone_code(verification_id, code).await
    }

    // =========================================================================
    // Profile Image
    // =========================================================================

    pub async fn upload_profile_image(&self, uid: &str, bytes: Vec<u8>) -> Response<String> {
        self.images.upload(uid, bytes).await
    }

    pub async fn profile_image_url(&self, uid: &str) -> Response<Option<String>> {
        self.images.url(uid).await
    }

    pub async fn delete_profile_image(&self, uid: &str) -> Response<()> {
        self.images.delete(uid).await
    }

    // =========================================================================
    // User Document & Push Token
    // =========================================================================

    pub async fn merge_detail(&self, uid: &str, detail: &UserDetail) -> Response<()> {
        self.documents.merge_detail(uid, detail).await
    }

    pub async fn fetch_detail(&self, uid: &str) -> Response<Option<UserDetail>> {
        self.documents.fetch_detail(uid).await
    }

    pub async fn delete_detail(&self, uid: &str) -> Response<()> {
        self.documents.delete_detail(uid).await
    }

    pub async fn push_token(&self) -> Response<String> {
        self.push.token().await
    }

    pub async fn save_push_token(&self, uid: &str, token: &str) -> Response<()> {
        self.documents.save_push_token(uid, token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tote_core::ErrorKind;

    #[tokio::test]
    async fn test_forwards_to_every_source() {
        let backend = InMemoryBackend::new();
        let repo = AccountRepository::in_memory(backend.clone());

        let uid = repo
            .create_account("ada@example.com", "secret1")
            .await
            .success()
            .unwrap()
            .uid;

        let url = repo.upload_profile_image(&uid, vec![1, 2]).await.success().unwrap();
        assert_eq!(repo.profile_image_url(&uid).await, Response::Success(Some(url)));

        let detail = UserDetail::default().with_address("1 Main St");
        assert!(repo.merge_detail(&uid, &detail).await.is_success());
        assert_eq!(repo.fetch_detail(&uid).await, Response::Success(Some(detail)));

        let token = repo.push_token().await.success().unwrap();
        assert!(repo.save_push_token(&uid, &token).await.is_success());
        assert!(backend.document("push_tokens", &uid).is_some());
    }

    #[tokio::test]
    async fn test_failures_pass_through_unchanged() {
        let repo = AccountRepository::in_memory(InMemoryBackend::new());

        assert_eq!(
            repo.sign_in("ada@example.com", "secret1").await,
            Response::Failure(ErrorKind::InvalidCredentials)
        );
        assert_eq!(repo.delete_account().await, Response::Failure(ErrorKind::NotSignedIn));
    }
}
