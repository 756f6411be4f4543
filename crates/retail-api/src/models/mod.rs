//! Wire models shared across handlers.

use serde::{Deserialize, Serialize};

/// Error payload returned to clients. The `message` stays generic; the
/// underlying storage error is only logged server-side.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: &str, message: &str) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
        }
    }
}

/// Response to an image upload: the blob's public URL.
#[derive(Debug, Serialize, Deserialize)]
pub struct ImageUploadResponse {
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

/// Response to a contract upload.
#[derive(Debug, Serialize, Deserialize)]
pub struct FileUploadResponse {
    #[serde(rename = "fileName")]
    pub file_name: String,
}

/// Query parameters for image deletion.
#[derive(Debug, Deserialize)]
pub struct ImageDeleteQuery {
    pub url: String,
}
