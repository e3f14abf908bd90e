//! Turn state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.
//! The controller owns the state and executes the effects.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::TurnEvent;
pub use state::{TurnContext, TurnState};
pub use transition::{transition, TransitionError, TransitionResult};
