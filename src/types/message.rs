use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::macros::format_description;

/// The author of a message in the conversation.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Typed (or uploaded) by the person at the keyboard.
    User,
    /// Produced by the selected provider.
    Assistant,
    /// The welcome banner; the one message a clear keeps.
    System,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::System => write!(f, "system"),
        }
    }
}

/// A single rendered chat message.
///
/// Messages are never mutated after creation.  The timestamp is for display
/// only and is captured when the message is constructed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Who wrote the message.
    pub role: Role,

    /// The raw, unformatted message text.
    pub content: String,

    /// Display label of the provider that produced an assistant message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    /// Wall-clock time of creation as `HH:MM`.
    pub timestamp: String,
}

impl Message {
    /// Create a message stamped with the current time.
    pub fn new(role: Role, content: impl Into<String>, provider: Option<String>) -> Self {
        Self {
            role,
            content: content.into(),
            provider,
            timestamp: display_timestamp(now()),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content, None)
    }

    /// Create an assistant message with an optional provider label.
    pub fn assistant(content: impl Into<String>, provider: Option<String>) -> Self {
        Self::new(Role::Assistant, content, provider)
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content, None)
    }

    /// Override the display timestamp.
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    /// Returns true for the banner message that survives a clear.
    pub fn is_system(&self) -> bool {
        self.role == Role::System
    }

    /// The header label shown above the message body.
    pub fn author(&self) -> String {
        match self.role {
            Role::User => "You".to_string(),
            Role::Assistant => match &self.provider {
                Some(provider) => format!("{provider} Assistant"),
                None => "AI Assistant".to_string(),
            },
            Role::System => "System".to_string(),
        }
    }

    /// The full header: author and timestamp.
    pub fn header(&self) -> String {
        format!("{} · {}", self.author(), self.timestamp)
    }
}

/// Format a point in time as `HH:MM`.
pub fn display_timestamp(at: OffsetDateTime) -> String {
    at.format(format_description!("[hour]:[minute]"))
        .unwrap_or_default()
}

fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}
