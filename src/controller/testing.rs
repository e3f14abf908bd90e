//! Mock transports for testing
//!
//! These mocks let controller and widget tests run without real I/O.

use crate::transport::{MessageTransport, TransportError, TransportReply};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::{mpsc, Notify};

type Outcome = Result<TransportReply, TransportError>;

// ============================================================================
// Mock Transport
// ============================================================================

/// Returns queued outcomes in order and records every call
#[derive(Default)]
pub struct MockTransport {
    outcomes: Mutex<VecDeque<Outcome>>,
    /// Record of `(text, session_id)` for each call
    calls: Mutex<Vec<(String, Option<String>)>>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply
    pub fn queue_reply(&self, reply: TransportReply) {
        self.outcomes.lock().unwrap().push_back(Ok(reply));
    }

    /// Queue a failure
    pub fn queue_error(&self, error: TransportError) {
        self.outcomes.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_calls(&self) -> Vec<(String, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageTransport for MockTransport {
    async fn send(&self, text: &str, session_id: Option<&str>) -> Outcome {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), session_id.map(str::to_string)));
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::network("No mock response queued")))
    }

    fn kind(&self) -> &'static str {
        "mock"
    }
}

// ============================================================================
// Gated Transport (for overlapping-submission tests)
// ============================================================================

/// Holds every call open until the test releases an outcome
pub struct GatedTransport {
    calls: AtomicUsize,
    arrived: Notify,
    outcome_tx: mpsc::UnboundedSender<Outcome>,
    outcome_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<Outcome>>,
}

#[allow(dead_code)]
impl GatedTransport {
    pub fn new() -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            calls: AtomicUsize::new(0),
            arrived: Notify::new(),
            outcome_tx,
            outcome_rx: tokio::sync::Mutex::new(outcome_rx),
        }
    }

    /// Wait until a call has reached the transport
    pub async fn wait_for_call(&self) {
        self.arrived.notified().await;
    }

    /// Let the oldest waiting (or next) call settle with `outcome`
    pub fn release(&self, outcome: Outcome) {
        let _ = self.outcome_tx.send(outcome);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for GatedTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageTransport for GatedTransport {
    async fn send(&self, _text: &str, _session_id: Option<&str>) -> Outcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.arrived.notify_one();
        let mut rx = self.outcome_rx.lock().await;
        rx.recv()
            .await
            .unwrap_or_else(|| Err(TransportError::network("Gate closed")))
    }

    fn kind(&self) -> &'static str {
        "gated"
    }
}

// ============================================================================
// Panicking Transport
// ============================================================================

/// Panics on every call
pub struct PanickingTransport;

#[async_trait]
impl MessageTransport for PanickingTransport {
    async fn send(&self, _text: &str, _session_id: Option<&str>) -> Outcome {
        panic!("transport exploded");
    }

    fn kind(&self) -> &'static str {
        "panicking"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_transport_replays_queue() {
        let mock = MockTransport::new();
        mock.queue_reply(TransportReply::text("one"));

        let reply = mock.send("a", Some("s")).await.unwrap();
        assert_eq!(reply.text, "one");

        // Queue exhausted
        assert!(mock.send("b", None).await.is_err());
        assert_eq!(
            mock.recorded_calls(),
            vec![
                ("a".to_string(), Some("s".to_string())),
                ("b".to_string(), None)
            ]
        );
    }

    #[tokio::test]
    async fn test_gated_transport_buffers_release() {
        let gated = GatedTransport::new();
        gated.release(Ok(TransportReply::text("early")));

        let reply = gated.send("x", None).await.unwrap();
        assert_eq!(reply.text, "early");
        assert_eq!(gated.call_count(), 1);
    }
}
