//! API server configuration.

use chatrelay_core::gemini::GeminiConfig;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3000").
    pub bind_addr: String,
    /// Upstream generation API settings.
    pub gemini: GeminiConfig,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable     | Default          |
    /// |--------------|------------------|
    /// | `BIND_ADDR`  | `127.0.0.1:3000` |
    ///
    /// Upstream variables are documented on [`GeminiConfig::from_env`].
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into()),
            gemini: GeminiConfig::from_env(),
        }
    }
}
