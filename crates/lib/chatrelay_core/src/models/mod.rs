//! Wire models.
//!
//! - [`chat`]: gateway request/response bodies
//! - [`gemini`]: upstream `generateContent` records

pub mod chat;
pub mod gemini;
