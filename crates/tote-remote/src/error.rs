//! # Remote Error Types
//!
//! Errors raised on the catalog path and while loading remote
//! configuration. Vendor backend failures have their own type,
//! [`VendorError`](crate::backend::VendorError).
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Remote Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Transport     │  │    Protocol     │  │    Configuration        │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  connect fail   │  │  Status (4xx/5xx│  │  InvalidUrl             │ │
//! │  │  timeout        │  │  Decode (body / │  │  InvalidConfig          │ │
//! │  │  send fail      │  │    price)       │  │  ConfigLoadFailed       │ │
//! │  │                 │  │                 │  │  Io / Toml              │ │
//! │  │  ──► Network    │  │  ──► Unknown    │  │  ──► Unknown            │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use tote_core::{ErrorKind, FailureCause};

/// Result type alias for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

#[derive(Debug, Error)]
pub enum RemoteError {
    // =========================================================================
    // Transport / Protocol
    // =========================================================================
    /// The HTTP request could not be completed.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The connection dropped while the body was being read.
    #[error("Connection lost while reading {url}: {source}")]
    BodyInterrupted { url: String, source: reqwest::Error },

    /// The server answered with a non-success status.
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// The body was not the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    // =========================================================================
    // Configuration
    // =========================================================================
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid remote configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl RemoteError {
    /// Returns true when the connection failed, either before a response
    /// arrived or while its body was being read.
    pub fn is_transport(&self) -> bool {
        match self {
            RemoteError::Transport(e) => {
                e.is_connect() || e.is_timeout() || e.is_request() || e.is_body()
            }
            RemoteError::BodyInterrupted { .. } => true,
            _ => false,
        }
    }
}

impl FailureCause for RemoteError {
    fn error_kind(&self) -> ErrorKind {
        if self.is_transport() {
            ErrorKind::Network
        } else {
            ErrorKind::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_and_decode_are_unknown() {
        let status = RemoteError::Status {
            status: 503,
            url: "http://catalog.test/products".to_string(),
        };
        assert_eq!(status.error_kind(), ErrorKind::Unknown);
        assert_eq!(
            status.to_string(),
            "Unexpected status 503 from http://catalog.test/products"
        );

        let decode = RemoteError::Decode("expected array".to_string());
        assert_eq!(decode.error_kind(), ErrorKind::Unknown);
        assert!(!decode.is_transport());
    }

    #[tokio::test]
    async fn test_cut_off_body_is_network() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            use tokio::io::{AsyncReadExt, AsyncWriteExt};
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let _ = socket
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 1000\r\n\r\n[\"electro")
                .await;
            let _ = socket.shutdown().await;
        });

        let url = format!("http://{addr}/products/categories");
        let err = match reqwest::get(&url).await {
            Ok(response) => match response.text().await {
                Ok(body) => panic!("truncated body was accepted: {body}"),
                Err(source) => RemoteError::BodyInterrupted { url, source },
            },
            Err(e) => RemoteError::Transport(e),
        };
        assert!(err.is_transport());
        assert_eq!(err.error_kind(), ErrorKind::Network);
    }

    #[test]
    fn test_config_errors_are_unknown() {
        let err = RemoteError::InvalidUrl("ftp://nope".to_string());
        assert_eq!(err.error_kind(), ErrorKind::Unknown);
    }
}
