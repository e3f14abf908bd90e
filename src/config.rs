//! Widget configuration
//!
//! Static options consumed once at construction. Apart from choosing the
//! transport (and the welcome/fallback text), none of this affects how a turn
//! is processed.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8001/chat";
pub const DEFAULT_WELCOME_MESSAGE: &str = "Hello! How can I assist you today?";
pub const DEFAULT_FALLBACK_MESSAGE: &str = "Sorry, there was an error processing your message.";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Display colors. Values are passed through to the render surface untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ThemeColors {
    pub primary: String,
    pub secondary: Option<String>,
    pub tertiary: Option<String>,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            primary: "blue".to_string(),
            secondary: None,
            tertiary: None,
        }
    }
}

/// Configuration for one widget instance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WidgetConfig {
    /// Where HTTP turns are posted; ignored when a handler is supplied
    pub endpoint: String,
    pub title: String,
    pub subtitle: String,
    pub placeholder: String,
    /// Layout height in pixels
    pub height: u32,
    pub colors: ThemeColors,
    /// Bot message the transcript is seeded with
    pub welcome_message: String,
    /// Bot message appended when a turn fails
    pub fallback_message: String,
    /// Upper bound on a single HTTP turn
    pub request_timeout_secs: u64,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            title: "Chat Assistant".to_string(),
            subtitle: "How can we help you?".to_string(),
            placeholder: "Type your message...".to_string(),
            height: 500,
            colors: ThemeColors::default(),
            welcome_message: DEFAULT_WELCOME_MESSAGE.to_string(),
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl WidgetConfig {
    /// Load overrides from `CHAT_WIDGET_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; unset or unparsable values keep
    /// their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("CHAT_WIDGET_ENDPOINT") {
            config.endpoint = v;
        }
        if let Some(v) = lookup("CHAT_WIDGET_TITLE") {
            config.title = v;
        }
        if let Some(v) = lookup("CHAT_WIDGET_SUBTITLE") {
            config.subtitle = v;
        }
        if let Some(v) = lookup("CHAT_WIDGET_PLACEHOLDER") {
            config.placeholder = v;
        }
        if let Some(height) = lookup("CHAT_WIDGET_HEIGHT").and_then(|v| v.parse().ok()) {
            config.height = height;
        }
        if let Some(v) = lookup("CHAT_WIDGET_PRIMARY_COLOR") {
            config.colors.primary = v;
        }
        config.colors.secondary = lookup("CHAT_WIDGET_SECONDARY_COLOR");
        config.colors.tertiary = lookup("CHAT_WIDGET_TERTIARY_COLOR");
        if let Some(v) = lookup("CHAT_WIDGET_WELCOME") {
            config.welcome_message = v;
        }
        if let Some(v) = lookup("CHAT_WIDGET_FALLBACK") {
            config.fallback_message = v;
        }
        if let Some(secs) = lookup("CHAT_WIDGET_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            config.request_timeout_secs = secs;
        }

        config.normalized()
    }

    /// Parse a JSON options object; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::normalized)
    }

    /// Blank welcome or fallback text is replaced by the default, since bot
    /// messages are never empty
    pub fn normalized(mut self) -> Self {
        if self.welcome_message.trim().is_empty() {
            self.welcome_message = DEFAULT_WELCOME_MESSAGE.to_string();
        }
        if self.fallback_message.trim().is_empty() {
            self.fallback_message = DEFAULT_FALLBACK_MESSAGE.to_string();
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
