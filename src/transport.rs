//! Message transport abstraction
//!
//! A turn's text reaches a response either through a caller-supplied handler
//! or an HTTP endpoint. The variant is chosen once, when the widget is built.

mod error;
mod handler;
mod http;

pub use error::{TransportBuildError, TransportError, TransportErrorKind};
pub use handler::{HandlerError, HandlerTransport};
pub use http::HttpTransport;

use async_trait::async_trait;
use std::sync::Arc;

/// Successful outcome of one transport call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportReply {
    pub text: String,
    /// Session id supplied by the remote side, if any
    pub session_id: Option<String>,
}

impl TransportReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            session_id: None,
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

/// Common interface for delivering a turn
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Deliver `text` and wait for the single outcome
    async fn send(
        &self,
        text: &str,
        session_id: Option<&str>,
    ) -> Result<TransportReply, TransportError>;

    /// Short name for logs
    fn kind(&self) -> &'static str;
}

#[async_trait]
impl<T: MessageTransport + ?Sized> MessageTransport for Arc<T> {
    async fn send(
        &self,
        text: &str,
        session_id: Option<&str>,
    ) -> Result<TransportReply, TransportError> {
        (**self).send(text, session_id).await
    }

    fn kind(&self) -> &'static str {
        (**self).kind()
    }
}

/// The two interchangeable transports
#[derive(Debug, Clone)]
pub enum Transport {
    Handler(HandlerTransport),
    Http(HttpTransport),
}

#[async_trait]
impl MessageTransport for Transport {
    async fn send(
        &self,
        text: &str,
        session_id: Option<&str>,
    ) -> Result<TransportReply, TransportError> {
        match self {
            Self::Handler(t) => t.send(text, session_id).await,
            Self::Http(t) => t.send(text, session_id).await,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Handler(t) => t.kind(),
            Self::Http(t) => t.kind(),
        }
    }
}

/// Logging wrapper for transports
#[derive(Debug, Clone)]
pub struct LoggingTransport<T> {
    inner: T,
}

impl<T: MessageTransport> LoggingTransport<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: MessageTransport> MessageTransport for LoggingTransport<T> {
    async fn send(
        &self,
        text: &str,
        session_id: Option<&str>,
    ) -> Result<TransportReply, TransportError> {
        let start = std::time::Instant::now();
        let result = self.inner.send(text, session_id).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    transport = self.inner.kind(),
                    duration_ms = %duration.as_millis(),
                    response_chars = reply.text.chars().count(),
                    session = reply.session_id.is_some(),
                    "Transport call completed"
                );
            }
            Err(e) => {
                tracing::warn!(
                    transport = self.inner.kind(),
                    duration_ms = %duration.as_millis(),
                    kind = ?e.kind,
                    status = ?e.status,
                    error = %e.message,
                    "Transport call failed"
                );
            }
        }

        result
    }

    fn kind(&self) -> &'static str {
        self.inner.kind()
    }
}
