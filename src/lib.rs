// Public modules
pub mod chat;
pub mod client;
pub mod error;
pub mod format;
pub mod observability;
pub mod render;
pub mod types;

// Re-exports
pub use chat::{ChatController, ChatConfig, SendOutcome};
pub use client::RoomClient;
pub use error::{Error, Result};
pub use render::{TerminalView, View};
pub use types::*;
