use std::fmt;

use serde::{Deserialize, Serialize};

/// Presentation level of a notification.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Neutral status, e.g. a provider switch.
    Info,
    /// An operation completed.
    Success,
    /// Something went wrong.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Success => write!(f, "success"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A transient status message occupying the single notification slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    /// The text shown to the user.
    pub message: String,

    /// How the text is styled.
    pub severity: Severity,

    /// Persistent notifications are not auto-dismissed.
    #[serde(default)]
    pub persistent: bool,
}

impl Notification {
    /// Create an auto-dismissing notification.
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
            persistent: false,
        }
    }

    /// Create an info notification.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Info)
    }

    /// Create a success notification.
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Success)
    }

    /// Create an error notification.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Error)
    }

    /// Keep the notification until another replaces it.
    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }
}
