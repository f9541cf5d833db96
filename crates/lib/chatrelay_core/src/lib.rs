//! # chatrelay_core
//!
//! Core domain logic for chatrelay.

pub mod decoder;
pub mod error;
pub mod gemini;
pub mod models;
pub mod relay;
pub mod routes;

pub use error::{RelayError, RelayResult};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
