//! Ordered transcript of one conversation
//!
//! The store is append-only: entries are never removed or reordered, and
//! readers only ever see complete messages through [`TranscriptStore::snapshot`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{PoisonError, RwLock};

/// Who authored a transcript entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

/// A single transcript entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: String,
    /// Position in the transcript, assigned on append
    pub sequence_id: u64,
    pub text: String,
    pub sender: Sender,
    /// Creation instant, for display only
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            sequence_id: 0,
            text: text.into(),
            sender,
            timestamp: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Sender::Bot, text)
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// Append-only message store owned by one widget instance
#[derive(Debug, Default)]
pub struct TranscriptStore {
    messages: RwLock<Vec<Message>>,
}

impl TranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding a single welcome message from the bot
    pub fn seeded(welcome: impl Into<String>) -> Self {
        let store = Self::new();
        store.append(Message::bot(welcome));
        store
    }

    /// Add a message to the end of the transcript.
    ///
    /// The stored copy (with its assigned `sequence_id`) is returned so the
    /// caller can publish exactly what readers will see.
    pub fn append(&self, mut message: Message) -> Message {
        let mut messages = self
            .messages
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        message.sequence_id = messages.len() as u64;
        messages.push(message.clone());
        message
    }

    pub fn snapshot(&self) -> Vec<Message> {
        self.messages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.messages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn last(&self) -> Option<Message> {
        self.messages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}
