//! Transport error types

use thiserror::Error;

/// A failed turn, classified by where it failed
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
    /// HTTP status, when the endpoint answered with a non-success code
    pub status: Option<u16>,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Network, message)
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Status, message).with_status(status)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Malformed, message)
    }

    pub fn handler(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Handler, message)
    }

    pub fn panicked(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Panicked, message)
    }
}

/// Error classification, used for logging only: every kind ends the turn
/// with the same fallback reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection failure, timeout, unreadable body
    Network,
    /// Endpoint answered with a non-2xx status
    Status,
    /// Response body missing `response` or not valid JSON
    Malformed,
    /// Injected handler returned an error
    Handler,
    /// Transport panicked while producing a reply
    Panicked,
}

/// Errors raised while constructing a transport
#[derive(Debug, Error)]
pub enum TransportBuildError {
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
