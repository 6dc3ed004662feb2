use serde::{Deserialize, Serialize};

/// Successful body of a `POST /upload` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadResponse {
    /// The name the server stored the file under.
    pub filename: String,

    /// Confirmation text from the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// The first part of the file's text, when the server could read it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_preview: Option<String>,
}

impl UploadResponse {
    /// The chat message announcing this upload.
    pub fn announcement(&self) -> String {
        let mut text = format!("📎 Uploaded file: {}", self.filename);
        if let Some(preview) = self.content_preview.as_deref().filter(|p| !p.is_empty()) {
            text.push_str("\n\nPreview:\n");
            text.push_str(preview);
        }
        text
    }
}
