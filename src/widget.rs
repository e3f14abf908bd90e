//! Embeddable chat widget
//!
//! `ChatWidget` ties a [`WidgetConfig`] to a [`TurnController`]. The transport
//! is chosen once in [`ChatWidgetBuilder::build`]: a supplied handler wins,
//! otherwise turns go to the configured HTTP endpoint.

use crate::config::WidgetConfig;
use crate::controller::{TurnController, WidgetEvent};
use crate::state_machine::TurnContext;
use crate::transcript::{Message, TranscriptStore};
use crate::transport::{
    HandlerError, HandlerTransport, HttpTransport, LoggingTransport, MessageTransport, Transport,
    TransportBuildError,
};
use std::future::Future;
use thiserror::Error;
use tokio::sync::broadcast;

/// Errors raised while building a widget
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error(transparent)]
    Transport(#[from] TransportBuildError),
}

/// Builder for [`ChatWidget`]
#[derive(Debug)]
pub struct ChatWidgetBuilder {
    config: WidgetConfig,
    handler: Option<HandlerTransport>,
}

impl ChatWidgetBuilder {
    /// Route turns to `handler` instead of the HTTP endpoint
    pub fn with_handler<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(String, Option<String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, HandlerError>> + Send + 'static,
    {
        self.handler = Some(HandlerTransport::new(handler));
        self
    }

    pub fn build(self) -> Result<ChatWidget, WidgetError> {
        let config = self.config.normalized();
        let transport = match self.handler {
            Some(handler) => Transport::Handler(handler),
            None => {
                let http = HttpTransport::new(&config.endpoint, config.request_timeout())?;
                tracing::debug!(endpoint = %http.endpoint(), "Turns will be posted over HTTP");
                Transport::Http(http)
            }
        };

        tracing::debug!(
            transport = transport.kind(),
            title = %config.title,
            "Chat widget created"
        );

        let controller = TurnController::new(
            TurnContext::new(config.fallback_message.clone()),
            TranscriptStore::seeded(config.welcome_message.clone()),
            LoggingTransport::new(transport),
        );

        Ok(ChatWidget { config, controller })
    }
}

/// One conversation instance: its own transcript, turn state and session
pub struct ChatWidget {
    config: WidgetConfig,
    controller: TurnController<LoggingTransport<Transport>>,
}

impl ChatWidget {
    pub fn builder(config: WidgetConfig) -> ChatWidgetBuilder {
        ChatWidgetBuilder {
            config,
            handler: None,
        }
    }

    /// Build a widget that posts turns to `config.endpoint`
    pub fn new(config: WidgetConfig) -> Result<Self, WidgetError> {
        Self::builder(config).build()
    }

    /// Submit user input; see [`TurnController::submit`]
    pub async fn submit(&self, input: &str) {
        self.controller.submit(input).await;
    }

    pub fn messages(&self) -> Vec<Message> {
        self.controller.transcript().snapshot()
    }

    /// True while a turn is in flight; render surfaces disable input then
    pub fn is_pending(&self) -> bool {
        self.controller.is_pending()
    }

    pub fn session_id(&self) -> Option<String> {
        self.controller.session_id()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WidgetEvent> {
        self.controller.subscribe()
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// Which transport variant was selected: `"handler"` or `"http"`
    pub fn transport_kind(&self) -> &'static str {
        self.controller.transport().kind()
    }
}
