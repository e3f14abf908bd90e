//! Session continuity across turns

use std::sync::{Mutex, PoisonError};

/// Holds the opaque session id handed back by the transport.
///
/// Starts empty, is only written from a successful turn, and is never cleared.
#[derive(Debug, Default)]
pub struct SessionTracker {
    id: Mutex<Option<String>>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<String> {
        self.id.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Store a new id. Returns `true` if the stored value changed.
    pub fn set(&self, id: impl Into<String>) -> bool {
        let id = id.into();
        let mut current = self.id.lock().unwrap_or_else(PoisonError::into_inner);
        if current.as_deref() == Some(id.as_str()) {
            return false;
        }
        *current = Some(id);
        true
    }
}
