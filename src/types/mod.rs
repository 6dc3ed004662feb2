// Public modules
pub mod chat;
pub mod message;
pub mod notification;
pub mod provider;
pub mod status;
pub mod upload;

// Re-exports
pub use chat::{ChatRequest, ChatResponse};
pub use message::{Message, Role, display_timestamp};
pub use notification::{Notification, Severity};
pub use provider::{Provider, ProviderOption, UNAVAILABLE_SUFFIX};
pub use status::{ApiStatus, HealthStatus};
pub use upload::UploadResponse;
