//! Pure state transition function
//!
//! `Idle -> Pending -> Idle` is the only cycle. Rejected submissions leave the
//! state untouched and produce no effects.

use super::{Effect, TurnContext, TurnEvent, TurnState};
use crate::transport::TransportReply;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: TurnState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: TurnState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Reasons a transition is refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Input is empty after trimming")]
    EmptyInput,
    #[error("A turn is already pending")]
    Busy,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs, with no I/O.
pub fn transition(
    state: &TurnState,
    context: &TurnContext,
    event: TurnEvent,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // Empty input is checked before the busy guard
        (_, TurnEvent::Submit { raw_input, .. }) if raw_input.trim().is_empty() => {
            Err(TransitionError::EmptyInput)
        }

        (TurnState::Pending { .. }, TurnEvent::Submit { .. }) => Err(TransitionError::Busy),

        // Idle + Submit -> Pending
        (TurnState::Idle, TurnEvent::Submit { raw_input, turn }) => {
            let text = raw_input.trim().to_string();
            Ok(TransitionResult::new(TurnState::Pending { turn })
                .with_effect(Effect::NotifyPending { pending: true })
                .with_effect(Effect::append_user(text.clone()))
                .with_effect(Effect::Dispatch { turn, text }))
        }

        // Pending + reply -> Idle
        (TurnState::Pending { turn }, TurnEvent::TransportReplied { turn: replied, reply })
            if *turn == replied =>
        {
            Ok(TransitionResult::new(TurnState::Idle).with_effects(reply_effects(context, reply)))
        }

        // Pending + failure -> Idle with the fallback reply
        (TurnState::Pending { turn }, TurnEvent::TransportFailed { turn: failed, .. })
            if *turn == failed =>
        {
            Ok(TransitionResult::new(TurnState::Idle).with_effects(fallback_effects(context)))
        }

        (TurnState::Pending { turn }, TurnEvent::TransportReplied { turn: other, .. })
        | (TurnState::Pending { turn }, TurnEvent::TransportFailed { turn: other, .. }) => {
            Err(TransitionError::InvalidTransition(format!(
                "outcome for turn {other} while turn {turn} is pending"
            )))
        }

        (TurnState::Idle, TurnEvent::TransportReplied { turn, .. })
        | (TurnState::Idle, TurnEvent::TransportFailed { turn, .. }) => {
            Err(TransitionError::InvalidTransition(format!(
                "outcome for turn {turn} while idle"
            )))
        }
    }
}

fn reply_effects(context: &TurnContext, reply: TransportReply) -> Vec<Effect> {
    // A blank reply cannot be shown as a message, so it counts as malformed
    if reply.text.trim().is_empty() {
        return fallback_effects(context);
    }

    let mut effects = Vec::with_capacity(3);
    if let Some(session_id) = reply.session_id.filter(|id| !id.is_empty()) {
        effects.push(Effect::RecordSession { session_id });
    }
    effects.push(Effect::append_bot(reply.text));
    effects.push(Effect::NotifyPending { pending: false });
    effects
}

fn fallback_effects(context: &TurnContext) -> Vec<Effect> {
    vec![
        Effect::append_bot(context.fallback_message.clone()),
        Effect::NotifyPending { pending: false },
    ]
}
