//! # Profile Image Source
//!
//! One profile image per user, stored at `profile_images/{uid}`.

use std::fmt;
use std::sync::Arc;
use tracing::debug;

use tote_core::{guard, ErrorKind, Response};

use crate::backend::{StorageBackend, VendorError};
use crate::callback::pending;

const IMAGE_FOLDER: &str = "profile_images";

/// Object path of a user's profile image.
pub fn image_path(uid: &str) -> String {
    format!("{IMAGE_FOLDER}/{uid}")
}

/// Maps a `NotFound` failure to `Ok(None)`.
pub(crate) fn absent_as_none<T>(result: Result<T, VendorError>) -> Result<Option<T>, VendorError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

#[derive(Clone)]
pub struct ProfileImageSource {
    backend: Arc<dyn StorageBackend>,
}

impl fmt::Debug for ProfileImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileImageSource").finish_non_exhaustive()
    }
}

impl ProfileImageSource {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        ProfileImageSource { backend }
    }

    /// Stores the image, replacing any previous one; returns its download URL.
    pub async fn upload(&self, uid: &str, bytes: Vec<u8>) -> Response<String> {
        if uid.is_empty() || bytes.is_empty() {
            return Response::Failure(ErrorKind::InvalidInput);
        }
        debug!(uid = %uid, size = bytes.len(), "Uploading profile image");

        let path = image_path(uid);
        guard(pending("put", |done| self.backend.put(path, bytes, done))).await
    }

    /// Download URL of the image, or `None` when the user has none.
    pub async fn url(&self, uid: &str) -> Response<Option<String>> {
        let path = image_path(uid);
        guard(async {
            absent_as_none(pending("download_url", |done| self.backend.download_url(path, done)).await)
        })
        .await
    }

    /// Deletes the image. A user without one is a no-op.
    pub async fn delete(&self, uid: &str) -> Response<()> {
        debug!(uid = %uid, "Deleting profile image");
        let path = image_path(uid);
        guard(async {
            absent_as_none(pending("delete_object", |done| self.backend.delete(path, done)).await)
                .map(|_| ())
        })
        .await
    }
}
