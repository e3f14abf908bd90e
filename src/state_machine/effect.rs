//! Effects produced by state transitions

use crate::transcript::Sender;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append an entry to the transcript
    AppendMessage { sender: Sender, text: String },

    /// Hand the turn's text to the transport
    Dispatch { turn: u64, text: String },

    /// Remember the session id returned by the transport
    RecordSession { session_id: String },

    /// Tell observers the pending flag changed
    NotifyPending { pending: bool },
}

impl Effect {
    pub fn append_user(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn append_bot(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            sender: Sender::Bot,
            text: text.into(),
        }
    }
}
