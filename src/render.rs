//! Output rendering for the chat session.
//!
//! This module provides the [`View`] trait the chat controller drives and a
//! terminal implementation of it.

use std::io::{self, BufRead, Write};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{Error, Result};
use crate::format::format_terminal;
use crate::types::{Message, Notification, Provider, ProviderOption, Role, Severity};

/// ANSI escape code for dim text (used for the loading indicator).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for bold text (used for message headers).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code for cyan text (used for assistant headers and info).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for yellow text (used for system messages).
const ANSI_YELLOW: &str = "\x1b[33m";

/// ANSI escape code for green text (used for user headers and success).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// The surface a chat session renders into.
///
/// The controller owns all session state; a view only mirrors it.  Methods
/// take `&self` because replies can land while other requests are still in
/// flight, so implementations synchronize internally.
pub trait View: Send + Sync + 'static {
    /// Add one message to the end of the message list.
    fn append_message(&self, message: &Message);

    /// Replace the whole message list, e.g. after a clear.
    fn render_messages(&self, messages: &[Message]);

    /// Show or hide the loading indicator.
    fn set_loading(&self, loading: bool);

    /// Put a notification in the single notification slot.
    fn show_notification(&self, notification: &Notification);

    /// Empty the notification slot.
    fn hide_notification(&self);

    /// Ask the user to confirm a destructive action.
    fn confirm(&self, prompt: &str) -> bool;

    /// Clear the file selection so the same file can be picked again.
    fn reset_file_input(&self) {}

    /// Replace the provider selector's options.
    fn set_provider_options(&self, options: &[ProviderOption]);

    /// Move the provider selector to the given provider.
    fn select_provider(&self, provider: &Provider);

    /// Place text on the system clipboard.
    fn copy_to_clipboard(&self, text: &str) -> Result<()>;
}

/// Terminal view with optional ANSI styling.
///
/// Messages and notifications are printed as they arrive; nothing printed is
/// ever taken back, so hiding a notification is a no-op.
pub struct TerminalView {
    use_color: bool,
}

impl TerminalView {
    /// Creates a new TerminalView with ANSI colors enabled.
    pub fn new() -> Self {
        Self { use_color: true }
    }

    /// Creates a new TerminalView with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self { use_color }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_color {
            format!("{color}{text}{ANSI_RESET}")
        } else {
            text.to_string()
        }
    }

    fn render_message(&self, message: &Message) -> String {
        let color = match message.role {
            Role::User => ANSI_GREEN,
            Role::Assistant => ANSI_CYAN,
            Role::System => ANSI_YELLOW,
        };
        let header = if self.use_color {
            format!("{ANSI_BOLD}{color}{}{ANSI_RESET}", message.header())
        } else {
            message.header()
        };
        format!(
            "{header}\n{}\n",
            format_terminal(&message.content, self.use_color)
        )
    }

    fn render_notification(&self, notification: &Notification) -> String {
        let color = match notification.severity {
            Severity::Info => ANSI_CYAN,
            Severity::Success => ANSI_GREEN,
            Severity::Error => ANSI_RED,
        };
        self.paint(
            color,
            &format!("[{}] {}", notification.severity, notification.message),
        )
    }

    fn write(&self, text: &str) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{text}");
        let _ = stdout.flush();
    }
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for TerminalView {
    fn append_message(&self, message: &Message) {
        self.write(&self.render_message(message));
    }

    fn render_messages(&self, messages: &[Message]) {
        let rule = self.paint(ANSI_DIM, "──────── conversation cleared ────────");
        self.write(&rule);
        for message in messages {
            self.append_message(message);
        }
    }

    fn set_loading(&self, loading: bool) {
        if loading {
            self.write(&self.paint(ANSI_DIM, "… waiting for the server"));
        }
    }

    fn show_notification(&self, notification: &Notification) {
        self.write(&self.render_notification(notification));
    }

    fn hide_notification(&self) {}

    fn confirm(&self, prompt: &str) -> bool {
        {
            let mut stdout = io::stdout().lock();
            let _ = write!(stdout, "{prompt} [y/N] ");
            let _ = stdout.flush();
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }

    fn set_provider_options(&self, options: &[ProviderOption]) {
        let labels: Vec<String> = options
            .iter()
            .map(|option| format!("{} ({})", option.label(), option.provider.id()))
            .collect();
        self.write(&self.paint(ANSI_DIM, &format!("Providers: {}", labels.join(", "))));
    }

    fn select_provider(&self, provider: &Provider) {
        self.write(&self.paint(
            ANSI_DIM,
            &format!("Provider set to {}", provider.label()),
        ));
    }

    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        // OSC 52 asks the terminal emulator to set the clipboard.
        let sequence = format!("\x1b]52;c;{}\x07", STANDARD.encode(text));
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(sequence.as_bytes())
            .and_then(|_| stdout.flush())
            .map_err(|err| Error::io("failed to write clipboard sequence", err))
    }
}
