//! Embeddable chat widget core
//!
//! A conversation transcript, a single-flight turn controller and a pluggable
//! message transport, plus the workflow proxy served by `workflow-proxy`.

pub mod config;
pub mod controller;
pub mod proxy;
pub mod session;
pub mod state_machine;
pub mod transcript;
pub mod transport;
pub mod widget;

pub use config::{ThemeColors, WidgetConfig};
pub use controller::{TurnController, WidgetEvent};
pub use transcript::{Message, Sender, TranscriptStore};
pub use transport::{MessageTransport, Transport, TransportError, TransportReply};
pub use widget::{ChatWidget, ChatWidgetBuilder, WidgetError};
