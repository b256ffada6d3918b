//! Relay endpoint wire format
//!
//! Request and response bodies for POST /generate. The endpoint always
//! answers HTTP 200; success and failure are distinguished by the body
//! shape alone.

use serde::{Deserialize, Serialize};

/// Request body for POST /generate
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    /// The user prompt. Absent and null both deserialize to None so the
    /// handler can report the missing prompt itself.
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Response body for POST /generate
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum GenerateResponse {
    /// Generated text: `{"result": "..."}`
    Success { result: String },
    /// Terminal failure: `{"error": "..."}`
    Error { error: String },
}

impl GenerateResponse {
    /// Build a success response
    pub fn success(text: impl Into<String>) -> Self {
        Self::Success {
            result: text.into(),
        }
    }

    /// Build an error response
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }
}
