//! Incremental renderer: drives one chat action and feeds a [`RenderSink`].
//!
//! Each mode (buffered, streaming) is an independent action with its own
//! in-flight flag, so both can run at once against the same [`Renderer`]
//! while a second click on a busy action is a no-op. Reads of one streaming
//! body are strictly sequential; the task yields only while waiting for the
//! next chunk.

use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::StreamExt;
use log::{debug, warn};

use crate::display::{DisplayBuffer, RenderSink, RenderState};
use crate::error::ClientResult;
use crate::frames::FrameReader;
use crate::gateway::GatewayClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Buffered,
    Streaming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Prompt was empty or whitespace only.
    EmptyPrompt,
    /// The same action is already running.
    InFlight,
}

/// How one action ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Final-slot value: the response text or the no-response placeholder.
    Completed(String),
    /// Final-slot value: `Error: <message>`.
    Failed(String),
    /// Nothing was sent.
    Skipped(SkipReason),
}

/// Busy flag for one action.
#[derive(Debug, Default)]
pub struct InFlight(AtomicBool);

impl InFlight {
    /// Claim the flag; `None` if already claimed.
    pub fn try_begin(&self) -> Option<InFlightGuard<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(&self.0))
    }

    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Releases the flag when the action ends, however it ends.
pub struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Renderer {
    gateway: GatewayClient,
    buffered: InFlight,
    streaming: InFlight,
}

impl Renderer {
    pub fn new(gateway: GatewayClient) -> Self {
        Self {
            gateway,
            buffered: InFlight::default(),
            streaming: InFlight::default(),
        }
    }

    pub fn is_busy(&self, mode: Mode) -> bool {
        self.flag(mode).is_busy()
    }

    /// Run one action to completion, publishing into `sink` as it goes.
    pub async fn run<S>(&self, prompt: &str, mode: Mode, sink: &mut S) -> Outcome
    where
        S: RenderSink + ?Sized,
    {
        if prompt.trim().is_empty() {
            debug!("ignoring empty prompt");
            return Outcome::Skipped(SkipReason::EmptyPrompt);
        }
        let Some(_guard) = self.flag(mode).try_begin() else {
            debug!("{mode:?} action already in flight");
            return Outcome::Skipped(SkipReason::InFlight);
        };

        sink.stream_updated("");
        sink.final_updated("");
        sink.state_changed(RenderState::Requesting);

        let result = match mode {
            Mode::Buffered => self.run_buffered(prompt).await,
            Mode::Streaming => self.run_streaming(prompt, sink).await,
        };

        match result {
            Ok(final_text) => {
                sink.final_updated(&final_text);
                sink.state_changed(RenderState::Completed);
                Outcome::Completed(final_text)
            }
            Err(e) => {
                warn!("{mode:?} chat failed: {e}");
                let message = format!("Error: {e}");
                sink.final_updated(&message);
                sink.state_changed(RenderState::Failed);
                Outcome::Failed(message)
            }
        }
    }

    async fn run_buffered(&self, prompt: &str) -> ClientResult<String> {
        let response = self.gateway.chat(prompt).await?;
        let mut display = DisplayBuffer::new();
        display.set(&response);
        Ok(display.into_final())
    }

    async fn run_streaming<S>(&self, prompt: &str, sink: &mut S) -> ClientResult<String>
    where
        S: RenderSink + ?Sized,
    {
        let mut body = self.gateway.chat_stream(prompt).await?;
        sink.state_changed(RenderState::Streaming);

        let mut frames = FrameReader::new();
        let mut display = DisplayBuffer::new();

        // A read error leaves the partial text in the progressive slot.
        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            for fragment in frames.push(&chunk) {
                display.append(&fragment);
                sink.stream_updated(display.as_str());
            }
        }
        if let Some(fragment) = frames.finish() {
            display.append(&fragment);
            sink.stream_updated(display.as_str());
        }

        debug!(
            "stream complete: {} chars, {} skipped frames",
            display.as_str().len(),
            frames.skipped()
        );
        Ok(display.into_final())
    }

    fn flag(&self, mode: Mode) -> &InFlight {
        match mode {
            Mode::Buffered => &self.buffered,
            Mode::Streaming => &self.streaming,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        stream: Vec<String>,
        finals: Vec<String>,
        states: Vec<RenderState>,
    }

    impl RenderSink for Recorder {
        fn stream_updated(&mut self, text: &str) {
            self.stream.push(text.to_string());
        }

        fn final_updated(&mut self, text: &str) {
            self.finals.push(text.to_string());
        }

        fn state_changed(&mut self, state: RenderState) {
            self.states.push(state);
        }
    }

    fn renderer() -> Renderer {
        // Nothing listens here; tests below never reach the network or
        // expect the connection to fail.
        Renderer::new(GatewayClient::new("http://127.0.0.1:1").unwrap())
    }

    #[test]
    fn in_flight_guard_releases_on_drop() {
        let flag = InFlight::default();
        let guard = flag.try_begin().expect("first claim");
        assert!(flag.is_busy());
        assert!(flag.try_begin().is_none());
        drop(guard);
        assert!(!flag.is_busy());
        assert!(flag.try_begin().is_some());
    }

    #[tokio::test]
    async fn blank_prompt_is_a_no_op() {
        let renderer = renderer();
        let mut sink = Recorder::default();
        let outcome = renderer.run("  \n", Mode::Streaming, &mut sink).await;
        assert_eq!(outcome, Outcome::Skipped(SkipReason::EmptyPrompt));
        assert!(sink.states.is_empty());
        assert!(sink.finals.is_empty());
    }

    #[tokio::test]
    async fn busy_action_is_not_reentered() {
        let renderer = renderer();
        let _held = renderer.streaming.try_begin().expect("claim");
        let mut sink = Recorder::default();

        let outcome = renderer.run("Hello", Mode::Streaming, &mut sink).await;
        assert_eq!(outcome, Outcome::Skipped(SkipReason::InFlight));
        assert!(sink.states.is_empty());
        assert!(renderer.is_busy(Mode::Streaming));
        assert!(!renderer.is_busy(Mode::Buffered));
    }

    #[tokio::test]
    async fn connection_failure_sets_error_and_clears_flag() {
        let renderer = renderer();
        let mut sink = Recorder::default();

        let outcome = renderer.run("Hello", Mode::Buffered, &mut sink).await;
        match outcome {
            Outcome::Failed(message) => assert!(message.starts_with("Error: ")),
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(
            sink.states,
            vec![RenderState::Requesting, RenderState::Failed]
        );
        assert!(sink.finals.last().unwrap().starts_with("Error: "));
        assert!(!renderer.is_busy(Mode::Buffered));
    }
}
