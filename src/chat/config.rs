//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::types::Provider;

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default time a notification stays on screen.
pub const DEFAULT_NOTIFICATION_DELAY: Duration = Duration::from_secs(5);

/// Command-line arguments for the chatroom tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Base URL of the AI Room server.
    #[arrrg(optional, "Server URL (default: $CHATROOM_BASE_URL or http://localhost:5000/)", "URL")]
    pub base_url: Option<String>,

    /// Provider selected at startup.
    #[arrrg(optional, "AI provider to start with (default: openai)", "PROVIDER")]
    pub provider: Option<String>,

    /// Request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: 60)", "SECONDS")]
    pub timeout: Option<u64>,

    /// How long notifications stay visible, in seconds.
    #[arrrg(optional, "Notification display time in seconds (default: 5)", "SECONDS")]
    pub notification_secs: Option<u64>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Server URL; `None` defers to `CHATROOM_BASE_URL` and then the default.
    pub base_url: Option<String>,

    /// The provider selected when the session starts.
    pub provider: Provider,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Delay before a non-persistent notification is dismissed.
    pub notification_delay: Duration,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Provider: openai
    /// - Timeout: 60 seconds
    /// - Notification delay: 5 seconds
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            base_url: None,
            provider: Provider::default(),
            timeout: DEFAULT_TIMEOUT,
            notification_delay: DEFAULT_NOTIFICATION_DELAY,
            use_color: true,
        }
    }

    /// Sets the server URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the initial provider.
    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = provider;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the notification auto-dismiss delay.
    pub fn with_notification_delay(mut self, delay: Duration) -> Self {
        self.notification_delay = delay;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        let provider = args
            .provider
            .and_then(|s| s.parse::<Provider>().ok())
            .unwrap_or_default();

        ChatConfig {
            base_url: args.base_url,
            provider,
            timeout: args
                .timeout
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
            notification_delay: args
                .notification_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_NOTIFICATION_DELAY),
            use_color: !args.no_color,
        }
    }
}
