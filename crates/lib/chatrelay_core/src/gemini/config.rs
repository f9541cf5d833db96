//! Gemini upstream configuration.

use std::fmt;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Header carrying the API key on every upstream request.
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Resolved upstream configuration, built once and handed to [`super::GeminiClient`].
#[derive(Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    /// API root, e.g. `https://generativelanguage.googleapis.com/v1beta`.
    pub base_url: String,
    /// Model name used in the endpoint path.
    pub model: String,
    /// API key. When absent requests go out unauthenticated and the
    /// upstream's authorization error is surfaced to the caller.
    pub api_key: Option<String>,
}

impl GeminiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable          | Default                                             |
    /// |-------------------|-----------------------------------------------------|
    /// | `GEMINI_API_KEY`  | none                                                |
    /// | `GEMINI_MODEL`    | `gemini-2.0-flash`                                  |
    /// | `GEMINI_BASE_URL` | `https://generativelanguage.googleapis.com/v1beta`  |
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into()),
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into()),
            api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
        }
    }

    /// Buffered endpoint: `{base}/models/{model}:generateContent`.
    pub fn generate_url(&self) -> String {
        self.endpoint("generateContent")
    }

    /// Streaming endpoint: `{base}/models/{model}:streamGenerateContent`.
    ///
    /// SSE output is requested separately with `alt=sse`.
    pub fn stream_url(&self) -> String {
        self.endpoint("streamGenerateContent")
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{method}",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            api_key: None,
        }
    }
}

// Keep the key out of logs.
impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
