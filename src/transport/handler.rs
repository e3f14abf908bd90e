//! Caller-supplied handler transport

use super::{MessageTransport, TransportError, TransportReply};
use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Error type handlers may return; anything implementing `Error` converts with `?`
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

type HandlerFuture = BoxFuture<'static, Result<String, HandlerError>>;
type HandlerFn = dyn Fn(String, Option<String>) -> HandlerFuture + Send + Sync;

/// Routes each turn to an async function instead of an HTTP endpoint.
///
/// The handler receives the message text and the current session id. Handlers
/// cannot establish a session themselves, so the id stays `None` unless it was
/// set some other way.
#[derive(Clone)]
pub struct HandlerTransport {
    handler: Arc<HandlerFn>,
}

impl HandlerTransport {
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(String, Option<String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, HandlerError>> + Send + 'static,
    {
        Self {
            handler: Arc::new(move |text, session_id| handler(text, session_id).boxed()),
        }
    }
}

impl fmt::Debug for HandlerTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerTransport").finish_non_exhaustive()
    }
}

#[async_trait]
impl MessageTransport for HandlerTransport {
    async fn send(
        &self,
        text: &str,
        session_id: Option<&str>,
    ) -> Result<TransportReply, TransportError> {
        let reply = (self.handler)(text.to_string(), session_id.map(str::to_string))
            .await
            .map_err(|e| TransportError::handler(e.to_string()))?;

        Ok(TransportReply {
            text: reply,
            session_id: None,
        })
    }

    fn kind(&self) -> &'static str {
        "handler"
    }
}
