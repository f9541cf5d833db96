//! Gemini upstream: the generative-language API the gateway forwards to.
//!
//! - [`config::GeminiConfig`]: endpoint, model and API key, resolved once at startup
//! - [`client::GeminiClient`]: buffered and streaming `generateContent` calls

pub mod client;
pub mod config;

pub use client::GeminiClient;
pub use config::GeminiConfig;
