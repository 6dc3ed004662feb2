//! Chat session module for the AI Room client.
//!
//! This module turns user intents into backend calls and mirrors the
//! results into a [`View`]. It supports:
//!
//! - Sending messages to the selected provider
//! - Uploading files and announcing them in the conversation
//! - Clearing the conversation after confirmation
//! - Provider availability checks and switching
//! - A single auto-dismissing notification slot
//!
//! # Architecture
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`session`]: The controller and the session state it owns
//! - [`commands`]: Slash command parsing for the terminal client

mod commands;
mod config;
mod session;

pub use crate::render::{TerminalView, View};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig, DEFAULT_NOTIFICATION_DELAY};
pub use session::{
    ActiveNotification, CLEAR_PROMPT, ChatController, ClearOutcome, SendOutcome, UploadOutcome,
    WELCOME_MESSAGE, send_failure_message, upload_failure_message,
};
