//! Events that drive a turn

use crate::transport::{TransportError, TransportReply};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum TurnEvent {
    /// Raw text from the user, untrimmed. `turn` is the number this turn gets
    /// if it is accepted.
    Submit { raw_input: String, turn: u64 },

    /// The transport settled successfully
    TransportReplied { turn: u64, reply: TransportReply },

    /// The transport settled with a failure of any kind
    TransportFailed { turn: u64, error: TransportError },
}

impl TurnEvent {
    pub fn submit(raw_input: impl Into<String>, turn: u64) -> Self {
        TurnEvent::Submit {
            raw_input: raw_input.into(),
            turn,
        }
    }
}
