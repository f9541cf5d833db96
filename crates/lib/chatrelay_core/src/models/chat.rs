//! Gateway request and response bodies.

use serde::{Deserialize, Serialize};

/// Placeholder shown when the upstream produced no text.
pub const NO_RESPONSE_PLACEHOLDER: &str = "No response received.";

/// Content type of the streaming reply: one JSON record per line.
pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// `POST /api/chat` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's prompt.
    #[serde(rename = "messages")]
    pub prompt: String,
    /// Relay the upstream output incrementally instead of buffering it.
    #[serde(rename = "stream", default)]
    pub streaming: bool,
}

impl ChatRequest {
    pub fn new(prompt: impl Into<String>, streaming: bool) -> Self {
        Self {
            prompt: prompt.into(),
            streaming,
        }
    }

    /// True when the prompt is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.prompt.trim().is_empty()
    }
}

/// Buffered `POST /api/chat` reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Error body returned for every failed gateway request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: String,
}

/// `GET /api/health` reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model: String,
    pub upstream_configured: bool,
}
