//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to clear, upload and switch providers without sending a
//! chat message.

/// A parsed chat command.
///
/// These commands control the chat session and are not sent as messages.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Clear the conversation (asks for confirmation).
    Clear,

    /// Upload a file from the given path.
    Upload(String),

    /// Switch to a provider.
    Provider(String),

    /// List the provider options.
    Providers,

    /// Re-check which providers the server can reach.
    Status,

    /// Check server health.
    Health,

    /// Copy a message to the clipboard.
    /// `None` copies the latest assistant reply; `Some(n)` the n-th message (1-based).
    Copy(Option<usize>),

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a valid command,
/// or `None` if it should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use chatroom::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/provider gemini").is_some());
/// assert!(parse_command("Hello there!").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "clear" => ChatCommand::Clear,
        "upload" => match argument {
            Some(path) => ChatCommand::Upload(path.to_string()),
            None => ChatCommand::Invalid("/upload requires a file path".to_string()),
        },
        "provider" => match argument {
            Some(name) => ChatCommand::Provider(name.to_string()),
            None => ChatCommand::Invalid("/provider requires a provider name".to_string()),
        },
        "providers" => ChatCommand::Providers,
        "status" => ChatCommand::Status,
        "health" => ChatCommand::Health,
        "copy" => match argument {
            None => ChatCommand::Copy(None),
            Some(arg) => match arg.parse::<usize>() {
                Ok(n) if n > 0 => ChatCommand::Copy(Some(n)),
                _ => ChatCommand::Invalid("/copy expects a message number".to_string()),
            },
        },
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /clear                 Clear the conversation (asks first)
  /upload <path>         Upload a file to the server
  /provider <name>       Switch provider (e.g., /provider gemini)
  /providers             List providers and their availability
  /status                Re-check provider availability
  /health                Check server health
  /copy [n]              Copy message n (default: latest reply)
  /help                  Show this help message
  /quit                  Exit the chat
Lines that do not start with / are sent as messages."#
}
