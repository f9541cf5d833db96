//! # chatrelay_client
//!
//! Gateway client and incremental renderer for chatrelay.
//!
//! - [`gateway::GatewayClient`]: talks to `POST /api/chat`
//! - [`frames::FrameReader`]: turns NDJSON body reads into text fragments
//! - [`display`]: the display buffer and the [`display::RenderSink`] a UI implements
//! - [`renderer::Renderer`]: per-action state machine with in-flight guards

pub mod display;
pub mod error;
pub mod frames;
pub mod gateway;
pub mod renderer;

pub use display::{DisplayBuffer, RenderSink, RenderState};
pub use error::{ClientError, ClientResult};
pub use gateway::GatewayClient;
pub use renderer::{Mode, Outcome, Renderer, SkipReason};
