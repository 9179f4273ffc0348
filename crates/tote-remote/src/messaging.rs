//! # Push Token Source
//!
//! The device's push-messaging registration token.

use std::fmt;
use std::sync::Arc;

use tote_core::Response;

use crate::backend::MessagingBackend;
use crate::callback::bridge;

#[derive(Clone)]
pub struct PushTokenSource {
    backend: Arc<dyn MessagingBackend>,
}

impl fmt::Debug for PushTokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushTokenSource").finish_non_exhaustive()
    }
}

impl PushTokenSource {
    pub fn new(backend: Arc<dyn MessagingBackend>) -> Self {
        PushTokenSource { backend }
    }

    pub async fn token(&self) -> Response<String> {
        bridge("push_token", |done| self.backend.token(done)).await
    }
}
