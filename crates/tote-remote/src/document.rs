//! # User Document Source
//!
//! Per-user records in the hosted document store.
//!
//! ## Collections
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Document Layout                                   │
//! │                                                                         │
//! │  users/{uid}          { "address": "1 Main St", "birthdate": 6e11 }    │
//! │                       both optional; writes merge, never replace       │
//! │                                                                         │
//! │  push_tokens/{uid}    { "token": "..." }                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use tote_core::{guard, Response, UserDetail};

use crate::backend::{Document, DocumentBackend, VendorError, VendorErrorCode};
use crate::callback::pending;

pub const USERS_COLLECTION: &str = "users";
pub const PUSH_TOKENS_COLLECTION: &str = "push_tokens";

fn to_document(value: Value) -> Result<Document, VendorError> {
    match value {
        Value::Object(fields) => Ok(fields),
        other => Err(VendorError::new(VendorErrorCode::Internal)
            .with_message(format!("expected an object, got {other}"))),
    }
}

#[derive(Clone)]
pub struct UserDocumentSource {
    backend: Arc<dyn DocumentBackend>,
}

impl fmt::Debug for UserDocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserDocumentSource").finish_non_exhaustive()
    }
}

impl UserDocumentSource {
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        UserDocumentSource { backend }
    }

    /// Writes the present fields of `detail` into `users/{uid}`.
    ///
    /// Fields that are `None` keep their stored value.
    pub async fn merge_detail(&self, uid: &str, detail: &UserDetail) -> Response<()> {
        debug!(uid = %uid, "Merging user detail");
        guard(self.try_merge_detail(uid, detail)).await
    }

    /// The stored detail, or `None` when the user has no document.
    pub async fn fetch_detail(&self, uid: &str) -> Response<Option<UserDetail>> {
        guard(self.try_fetch_detail(uid)).await
    }

    pub async fn delete_detail(&self, uid: &str) -> Response<()> {
        debug!(uid = %uid, "Deleting user detail");
        let (collection, id) = (USERS_COLLECTION.to_string(), uid.to_string());
        guard(pending("delete_document", |done| {
            self.backend.delete(collection, id, done)
        }))
        .await
    }

    /// Registers the device's push token for `uid`.
    pub async fn save_push_token(&self, uid: &str, token: &str) -> Response<()> {
        debug!(uid = %uid, "Saving push token");
        guard(async {
            let fields = to_document(json!({ "token": token }))?;
            self.set_merge(PUSH_TOKENS_COLLECTION, uid, fields).await
        })
        .await
    }

    async fn try_merge_detail(&self, uid: &str, detail: &UserDetail) -> Result<(), VendorError> {
        if detail.is_empty() {
            return Ok(());
        }
        let value = serde_json::to_value(detail).map_err(|e| {
            VendorError::new(VendorErrorCode::Internal).with_message(e.to_string())
        })?;
        self.set_merge(USERS_COLLECTION, uid, to_document(value)?).await
    }

    async fn try_fetch_detail(&self, uid: &str) -> Result<Option<UserDetail>, VendorError> {
        let (collection, id) = (USERS_COLLECTION.to_string(), uid.to_string());
        let document = pending("get_document", |done| self.backend.get(collection, id, done)).await?;

        document
            .map(|fields| serde_json::from_value(Value::Object(fields)))
            .transpose()
            .map_err(|e| VendorError::new(VendorErrorCode::Internal).with_message(e.to_string()))
    }

    async fn set_merge(&self, collection: &str, id: &str, fields: Document) -> Result<(), VendorError> {
        let (collection, id) = (collection.to_string(), id.to_string());
        pending("set_document", |done| {
            self.backend.set_merge(collection, id, fields, done)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryBackend;
    use tote_core::ErrorKind;

    /// 1989-03-02T00:00:00Z in epoch milliseconds.
    const BIRTHDATE_MS: i64 = 604_800_000_000;

    fn source() -> (InMemoryBackend, UserDocumentSource) {
        let backend = InMemoryBackend::new();
        let source = UserDocumentSource::new(Arc::new(backend.clone()));
        (backend, source)
    }

    #[tokio::test]
    async fn test_merge_keeps_untouched_fields() {
        let (_backend, documents) = source();

        let with_address = UserDetail::default().with_address("1 Main St");
        assert!(documents.merge_detail("u1", &with_address).await.is_success());

        let with_birthdate = UserDetail {
            birthdate: Some(BIRTHDATE_MS),
            ..UserDetail::default()
        };
        assert!(documents.merge_detail("u1", &with_birthdate).await.is_success());

        assert_eq!(
            documents.fetch_detail("u1").await,
            Response::Success(Some(UserDetail {
                address: Some("1 Main St".to_string()),
                birthdate: Some(BIRTHDATE_MS),
            }))
        );
    }

    #[tokio::test]
    async fn test_fetch_absent_is_none() {
        let (_backend, documents) = source();
        assert_eq!(documents.fetch_detail("nobody").await, Response::Success(None));
    }

    #[tokio::test]
    async fn test_delete_detail() {
        let (backend, documents) = source();
        documents
            .merge_detail("u1", &UserDetail::default().with_address("x"))
            .await;

        assert!(documents.delete_detail("u1").await.is_success());
        assert!(backend.document(USERS_COLLECTION, "u1").is_none());
        assert!(documents.delete_detail("u1").await.is_success());
    }

    #[tokio::test]
    async fn test_save_push_token_layout() {
        let (backend, documents) = source();

        assert!(documents.save_push_token("u1", "tok-1").await.is_success());

        let stored = backend.document(PUSH_TOKENS_COLLECTION, "u1").unwrap();
        assert_eq!(Value::Object(stored), json!({ "token": "tok-1" }));
    }

    #[tokio::test]
    async fn test_malformed_document_is_unknown() {
        let (backend, documents) = source();
        let (collection, id) = (USERS_COLLECTION.to_string(), "u1".to_string());
        let fields = to_document(json!({ "birthdate": "yesterday" })).unwrap();
        pending("seed", |done| backend.set_merge(collection, id, fields, done))
            .await
            .unwrap();

        assert_eq!(
            documents.fetch_detail("u1").await,
            Response::Failure(ErrorKind::Unknown)
        );
    }
}
