//! Chat message model and the clock used to stamp messages.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Display format for client-generated timestamps (hour:minute).
pub const TIMESTAMP_FORMAT: &str = "%H:%M";

/// Role of the message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message typed by the person using the widget.
    User,
    /// Reply produced by the server.
    Assistant,
}

impl MessageRole {
    /// Role name as used in CSS class names (`user-msg`, `assistant-msg`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rendered chat message.
///
/// Messages are immutable once appended to the panel and live until the
/// page goes away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who wrote the message.
    pub role: MessageRole,
    /// Raw text content. Never interpreted as markup.
    pub content: String,
    /// Preformatted display timestamp.
    pub timestamp: String,
}

impl Message {
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// Source of the current time.
pub trait Clock {
    /// Current local time.
    fn now(&self) -> DateTime<Local>;

    /// Current time formatted for a message label.
    fn timestamp(&self) -> String {
        self.now().format(TIMESTAMP_FORMAT).to_string()
    }

    /// Milliseconds since the Unix epoch, used for transient node ids.
    fn unix_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// Wall clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock pinned to a single instant. Handy for deterministic rendering.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}
