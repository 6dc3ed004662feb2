use serde::{Deserialize, Serialize};

use crate::types::Provider;

/// Body of a `POST /chat` request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    /// The trimmed user text.
    pub message: String,

    /// Identifier of the provider that should answer.
    pub ai_provider: String,
}

impl ChatRequest {
    /// Create a new chat request for the given provider.
    pub fn new(message: impl Into<String>, provider: &Provider) -> Self {
        Self {
            message: message.into(),
            ai_provider: provider.id().to_string(),
        }
    }
}

/// Successful body of a `POST /chat` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatResponse {
    /// The assistant's reply.
    pub response: String,

    /// Display label of the provider that answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}
