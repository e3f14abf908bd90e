//! Turn state types

use serde::{Deserialize, Serialize};

/// Per-instance turn state: at most one turn is ever in flight
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnState {
    /// Ready for user input
    #[default]
    Idle,

    /// A submission was accepted and its transport call has not settled
    Pending { turn: u64 },
}

impl TurnState {
    pub fn is_pending(&self) -> bool {
        matches!(self, TurnState::Pending { .. })
    }
}

/// Immutable configuration consulted by transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnContext {
    /// Bot reply appended whenever a turn fails for any reason
    pub fallback_message: String,
}

impl TurnContext {
    pub fn new(fallback_message: impl Into<String>) -> Self {
        Self {
            fallback_message: fallback_message.into(),
        }
    }
}
