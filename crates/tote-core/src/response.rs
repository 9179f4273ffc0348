//! # Response
//!
//! The two-variant outcome returned by every data-source method, and the
//! `guard` boundary that produces it.
//!
//! ## Boundary
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Where Errors Stop                                    │
//! │                                                                         │
//! │  State holder                                                           │
//! │       │  match response { Success(v) => .., Failure(kind) => toast }    │
//! │       ▼                                                                 │
//! │  Repository (forwards, adds nothing)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Data source ── guard(async { ... ? ... }) ──┐                          │
//! │       │                                      │ Err(e): log e,           │
//! │       ▼                                      │ Failure(e.error_kind())  │
//! │  sqlx / reqwest / vendor backend ────────────┘                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::error::{ErrorKind, FailureCause};

/// Outcome of a fallible local or remote operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Response<T> {
    Success(T),
    Failure(ErrorKind),
}

impl<T> Response<T> {
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success(_))
    }

    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(self, Response::Failure(_))
    }

    /// Returns the payload, discarding a failure.
    pub fn success(self) -> Option<T> {
        match self {
            Response::Success(value) => Some(value),
            Response::Failure(_) => None,
        }
    }

    /// Returns the failure kind, if any.
    pub fn failure(&self) -> Option<ErrorKind> {
        match self {
            Response::Success(_) => None,
            Response::Failure(kind) => Some(*kind),
        }
    }

    pub fn as_ref(&self) -> Response<&T> {
        match self {
            Response::Success(value) => Response::Success(value),
            Response::Failure(kind) => Response::Failure(*kind),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Response<U> {
        match self {
            Response::Success(value) => Response::Success(f(value)),
            Response::Failure(kind) => Response::Failure(kind),
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> Response<U>) -> Response<U> {
        match self {
            Response::Success(value) => f(value),
            Response::Failure(kind) => Response::Failure(kind),
        }
    }

    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Response::Success(value) => value,
            Response::Failure(_) => default,
        }
    }

    /// Converts into a `Result` for `?`-style composition in callers.
    pub fn into_result(self) -> Result<T, ErrorKind> {
        match self {
            Response::Success(value) => Ok(value),
            Response::Failure(kind) => Err(kind),
        }
    }
}

impl<T> From<Result<T, ErrorKind>> for Response<T> {
    fn from(result: Result<T, ErrorKind>) -> Self {
        match result {
            Ok(value) => Response::Success(value),
            Err(kind) => Response::Failure(kind),
        }
    }
}

/// Runs a fallible operation and converts its result into a `Response`.
///
/// ## Mapping
/// - `Ok(v)` → `Success(v)`
/// - `Err(e)` → `Failure(e.error_kind())`; transport failures classify as
///   `Network`, everything unclassified as `Unknown`
///
/// The error itself is logged here and dropped.
pub async fn guard<T, E, F>(operation: F) -> Response<T>
where
    F: Future<Output = Result<T, E>>,
    E: FailureCause,
{
    guard_sync(operation.await)
}

/// Synchronous twin of [`guard`] for results already in hand.
pub fn guard_sync<T, E>(result: Result<T, E>) -> Response<T>
where
    E: FailureCause,
{
    match result {
        Ok(value) => Response::Success(value),
        Err(cause) => {
            let kind = cause.error_kind();
            if kind.is_network() {
                warn!(error = %cause, "Operation failed: network unavailable");
            } else {
                error!(error = %cause, kind = %kind, "Operation failed");
            }
            Response::Failure(kind)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, ValidationError};

    #[derive(Debug)]
    struct Offline;

    impl std::fmt::Display for Offline {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("connection refused")
        }
    }

    impl FailureCause for Offline {
        fn error_kind(&self) -> ErrorKind {
            ErrorKind::Network
        }
    }

    #[tokio::test]
    async fn test_guard_success() {
        let response = guard(async { Ok::<_, CoreError>(42) }).await;
        assert_eq!(response, Response::Success(42));
    }

    #[tokio::test]
    async fn test_guard_non_transport_error_is_unknown() {
        let response: Response<()> = guard(async {
            Err(CoreError::InvalidPrice {
                value: "free".to_string(),
                reason: "not a number".to_string(),
            })
        })
        .await;
        assert_eq!(response, Response::Failure(ErrorKind::Unknown));
    }

    #[tokio::test]
    async fn test_guard_transport_error_is_network() {
        let response: Response<Vec<String>> = guard(async { Err(Offline) }).await;
        assert_eq!(response, Response::Failure(ErrorKind::Network));
    }

    #[test]
    fn test_guard_sync_keeps_specific_kind() {
        let response: Response<()> = guard_sync(Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: 6,
        }));
        assert_eq!(response.failure(), Some(ErrorKind::WeakPassword));
    }

    #[test]
    fn test_combinators() {
        let ok: Response<i32> = Response::Success(2);
        assert_eq!(ok.clone().map(|v| v * 10), Response::Success(20));
        assert_eq!(
            ok.clone().and_then(|_| Response::<i32>::Failure(ErrorKind::Unknown)),
            Response::Failure(ErrorKind::Unknown)
        );
        assert_eq!(ok.as_ref().success(), Some(&2));

        let failed: Response<i32> = Response::Failure(ErrorKind::Network);
        assert!(failed.is_failure());
        assert_eq!(failed.clone().unwrap_or(7), 7);
        assert_eq!(failed.into_result(), Err(ErrorKind::Network));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(Response::Success(vec!["jewelery"])).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"][0], "jewelery");

        let json = serde_json::to_value(Response::<()>::Failure(ErrorKind::Network)).unwrap();
        assert_eq!(json["status"], "failure");
        assert_eq!(json["data"], "NETWORK");
    }
}
