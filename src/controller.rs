//! Turn controller: executes the turn state machine
//!
//! The controller owns the transcript, the session tracker and the turn
//! state. Every transition and the effects it produces are applied under one
//! short lock that is never held across an `.await`; the transport call is
//! the only suspension point.

#[cfg(test)]
pub mod testing;

use crate::session::SessionTracker;
use crate::state_machine::{
    transition, Effect, TransitionError, TurnContext, TurnEvent, TurnState,
};
use crate::transcript::{Message, TranscriptStore};
use crate::transport::{MessageTransport, TransportError};
use futures::FutureExt;
use serde::Serialize;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;

const EVENT_CHANNEL_CAPACITY: usize = 128;

/// Notifications for render surfaces
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WidgetEvent {
    MessageAppended { message: Message },
    PendingChanged { pending: bool },
}

/// State guarded by the controller lock
#[derive(Debug, Default)]
struct Machine {
    state: TurnState,
    /// Number of turns accepted so far
    turns: u64,
}

/// Outbound request produced by an accepted submission
struct Dispatch {
    turn: u64,
    text: String,
}

/// Drives one conversation: at most one turn in flight at a time
pub struct TurnController<T: MessageTransport> {
    context: TurnContext,
    machine: Mutex<Machine>,
    transcript: TranscriptStore,
    session: SessionTracker,
    transport: T,
    broadcast_tx: broadcast::Sender<WidgetEvent>,
}

impl<T: MessageTransport> TurnController<T> {
    pub fn new(context: TurnContext, transcript: TranscriptStore, transport: T) -> Self {
        let (broadcast_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            context,
            machine: Mutex::new(Machine::default()),
            transcript,
            session: SessionTracker::new(),
            transport,
            broadcast_tx,
        }
    }

    pub fn transcript(&self) -> &TranscriptStore {
        &self.transcript
    }

    pub fn session_id(&self) -> Option<String> {
        self.session.get()
    }

    pub fn state(&self) -> TurnState {
        self.lock_machine().state
    }

    pub fn is_pending(&self) -> bool {
        self.state().is_pending()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WidgetEvent> {
        self.broadcast_tx.subscribe()
    }

    /// Submit user input.
    ///
    /// Blank input and input arriving while a turn is pending are dropped
    /// without touching any state. An accepted turn always ends with exactly
    /// one bot message (the reply or the fallback) and the pending flag
    /// cleared; no error reaches the caller.
    pub async fn submit(&self, raw_input: &str) {
        let dispatch = {
            let mut machine = self.lock_machine();
            let turn = machine.turns + 1;
            match self.apply(&mut machine, TurnEvent::submit(raw_input, turn)) {
                Ok(Some(dispatch)) => {
                    machine.turns = turn;
                    dispatch
                }
                Ok(None) => {
                    tracing::error!(turn, "Accepted submission produced no dispatch");
                    return;
                }
                Err(e) => {
                    tracing::debug!(reason = %e, "Submission ignored");
                    return;
                }
            }
        };

        tracing::info!(turn = dispatch.turn, transport = self.transport.kind(), "Turn started");
        let _release = PendingRelease {
            controller: self,
            turn: dispatch.turn,
        };

        let outcome = self.dispatch(dispatch.turn, &dispatch.text).await;

        let mut machine = self.lock_machine();
        match self.apply(&mut machine, outcome) {
            Ok(_) => tracing::info!(turn = dispatch.turn, "Turn completed"),
            Err(e) => tracing::error!(turn = dispatch.turn, error = %e, "Failed to settle turn"),
        }
    }

    /// Run one transition and its synchronous effects while the lock is held
    fn apply(
        &self,
        machine: &mut Machine,
        event: TurnEvent,
    ) -> Result<Option<Dispatch>, TransitionError> {
        let result = transition(&machine.state, &self.context, event)?;
        machine.state = result.new_state;

        let mut dispatch = None;
        for effect in result.effects {
            match effect {
                Effect::AppendMessage { sender, text } => {
                    let message = self.transcript.append(Message::new(sender, text));
                    tracing::debug!(
                        sequence_id = message.sequence_id,
                        sender = %message.sender,
                        "Message appended"
                    );
                    let _ = self
                        .broadcast_tx
                        .send(WidgetEvent::MessageAppended { message });
                }
                Effect::RecordSession { session_id } => {
                    if self.session.set(session_id) {
                        tracing::info!("Session id updated");
                    }
                }
                Effect::NotifyPending { pending } => {
                    let _ = self.broadcast_tx.send(WidgetEvent::PendingChanged { pending });
                }
                Effect::Dispatch { turn, text } => {
                    dispatch = Some(Dispatch { turn, text });
                }
            }
        }

        Ok(dispatch)
    }

    /// Invoke the transport once and turn its outcome into an event
    async fn dispatch(&self, turn: u64, text: &str) -> TurnEvent {
        let session_id = self.session.get();
        let call = self.transport.send(text, session_id.as_deref());

        match AssertUnwindSafe(call).catch_unwind().await {
            Ok(Ok(reply)) => {
                if reply.text.trim().is_empty() {
                    tracing::warn!(turn, "Transport returned an empty response");
                }
                TurnEvent::TransportReplied { turn, reply }
            }
            Ok(Err(error)) => {
                tracing::warn!(turn, kind = ?error.kind, error = %error, "Transport failed");
                TurnEvent::TransportFailed { turn, error }
            }
            Err(panic) => {
                let error = TransportError::panicked(panic_message(panic.as_ref()));
                tracing::error!(turn, error = %error, "Transport panicked");
                TurnEvent::TransportFailed { turn, error }
            }
        }
    }

    fn lock_machine(&self) -> MutexGuard<'_, Machine> {
        self.machine.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Settles a turn that ends without an outcome, e.g. when the `submit`
/// future is dropped mid-flight. The turn fails like any other transport
/// error, so the user message still gets its fallback reply.
struct PendingRelease<'a, T: MessageTransport> {
    controller: &'a TurnController<T>,
    turn: u64,
}

impl<T: MessageTransport> Drop for PendingRelease<'_, T> {
    fn drop(&mut self) {
        let mut machine = self.controller.lock_machine();
        if machine.state != (TurnState::Pending { turn: self.turn }) {
            return;
        }

        tracing::warn!(turn = self.turn, "Turn abandoned before settling");
        let event = TurnEvent::TransportFailed {
            turn: self.turn,
            error: TransportError::network("Turn abandoned before the transport replied"),
        };
        if let Err(e) = self.controller.apply(&mut machine, event) {
            tracing::error!(turn = self.turn, error = %e, "Failed to settle abandoned turn");
            machine.state = TurnState::Idle;
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "transport panicked".to_string()
    }
}
