//! # Callback Bridge
//!
//! Turns completion-callback APIs into `async fn`s.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Callback → Future                                │
//! │                                                                         │
//! │  pending(op, register)                                                 │
//! │    │                                                                    │
//! │    ├── oneshot::channel()  ──►  (tx, rx)                               │
//! │    ├── register(Completer { tx })   vendor keeps the completer         │
//! │    └── rx.await                                                        │
//! │          │                                                              │
//! │          ├── Ok(result)     completer fired                            │
//! │          └── Err(Canceled)  completer dropped  ──► VendorError         │
//! │                                                  (Abandoned)           │
//! │                                                                         │
//! │  Caller drops the future first?  The late `complete` finds the         │
//! │  receiver gone, logs at debug and discards the result.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tokio::sync::oneshot;
use tracing::{debug, warn};

use tote_core::{guard, Response};

use crate::backend::{VendorError, VendorErrorCode};

/// One-shot completion handle passed to a backend call.
///
/// Every method consumes the completer, so a result is delivered at most
/// once.
#[derive(Debug)]
pub struct Completer<T> {
    op: &'static str,
    tx: Option<oneshot::Sender<Result<T, VendorError>>>,
}

impl<T> Completer<T> {
    /// Delivers `result` to the awaiting task.
    pub fn complete(mut self, result: Result<T, VendorError>) {
        if let Some(tx) = self.tx.take() {
            if tx.send(result).is_err() {
                debug!(op = self.op, "Late completion discarded, caller went away");
            }
        }
    }

    pub fn succeed(self, value: T) {
        self.complete(Ok(value));
    }

    pub fn fail(self, error: impl Into<VendorError>) {
        self.complete(Err(error.into()));
    }

    /// Name of the operation this completer belongs to.
    pub fn op(&self) -> &'static str {
        self.op
    }
}

impl<T> Drop for Completer<T> {
    fn drop(&mut self) {
        if self.tx.is_some() {
            warn!(op = self.op, "Completer dropped without a result");
        }
    }
}

/// Registers a completer with `register` and waits for its result.
pub async fn pending<T, F>(op: &'static str, register: F) -> Result<T, VendorError>
where
    F: FnOnce(Completer<T>),
{
    let (tx, rx) = oneshot::channel();
    register(Completer { op, tx: Some(tx) });

    match rx.await {
        Ok(result) => result,
        Err(_) => Err(VendorError::new(VendorErrorCode::Abandoned)
            .with_message(format!("{op}: callback dropped without completing"))),
    }
}

/// [`pending`] behind the `guard` boundary.
pub async fn bridge<T, F>(op: &'static str, register: F) -> Response<T>
where
    F: FnOnce(Completer<T>),
{
    debug!(op = op, "Awaiting backend");
    guard(pending(op, register)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tote_core::ErrorKind;

    #[tokio::test]
    async fn test_completion_from_another_thread() {
        let response = bridge("token", |done: Completer<String>| {
            std::thread::spawn(move || done.succeed("fcm-token".to_string()));
        })
        .await;

        assert_eq!(response, Response::Success("fcm-token".to_string()));
    }

    #[tokio::test]
    async fn test_vendor_failure_is_classified() {
        let response: Response<()> = bridge("sign_in", |done| {
            done.fail(VendorErrorCode::InvalidCredential);
        })
        .await;

        assert_eq!(response, Response::Failure(ErrorKind::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_dropped_completer_is_unknown() {
        let response: Response<()> = bridge("delete_user", drop).await;
        assert_eq!(response, Response::Failure(ErrorKind::Unknown));

        let raw: Result<(), VendorError> = pending("delete_user", drop).await;
        assert_eq!(raw.unwrap_err().code, VendorErrorCode::Abandoned);
    }

    #[tokio::test]
    async fn test_late_completion_after_cancel_is_discarded() {
        let (park_tx, park_rx) = std::sync::mpsc::channel::<Completer<u32>>();

        // Register, then cancel the wait before the backend answers.
        let waiting = pending("slow", move |done| park_tx.send(done).unwrap());
        let timed_out = tokio::time::timeout(Duration::from_millis(10), waiting).await;
        assert!(timed_out.is_err());

        // The backend fires afterwards; nothing panics.
        let done = park_rx.recv().unwrap();
        assert_eq!(done.op(), "slow");
        done.succeed(42);
    }
}
