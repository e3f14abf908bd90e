//! HTTP endpoint transport

use super::{MessageTransport, TransportBuildError, TransportError, TransportReply};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Longest slice of an error body kept in log messages
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    /// Serialized as `null` when no session exists yet
    session_id: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    response: String,
    #[serde(default)]
    session_id: Option<Value>,
}

/// Posts each turn as JSON to a configured endpoint
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
}

impl HttpTransport {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, TransportBuildError> {
        let endpoint = Url::parse(endpoint).map_err(|e| TransportBuildError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn parse_reply(body: &str) -> Result<TransportReply, TransportError> {
        let parsed: ChatResponse = serde_json::from_str(body)
            .map_err(|e| TransportError::malformed(format!("Failed to parse response: {e}")))?;

        // Only non-empty string ids are kept; anything else means "no session"
        let session_id = match parsed.session_id {
            Some(Value::String(id)) if !id.is_empty() => Some(id),
            _ => None,
        };

        Ok(TransportReply {
            text: parsed.response,
            session_id,
        })
    }
}

fn truncate_body(body: &str) -> &str {
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => body.get(..idx).unwrap_or(body),
        None => body,
    }
}

#[async_trait]
impl MessageTransport for HttpTransport {
    async fn send(
        &self,
        text: &str,
        session_id: Option<&str>,
    ) -> Result<TransportReply, TransportError> {
        let request = ChatRequest {
            message: text,
            session_id,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::network(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    TransportError::network(format!("Connection failed: {e}"))
                } else {
                    TransportError::network(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(TransportError::status(
                status.as_u16(),
                format!("HTTP {status}: {}", truncate_body(&body)),
            ));
        }

        Self::parse_reply(&body)
    }

    fn kind(&self) -> &'static str {
        "http"
    }
}
