//! Display buffer and the UI seam.

use chatrelay_core::models::chat::NO_RESPONSE_PLACEHOLDER;

/// Running concatenation of every fragment received for one request.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DisplayBuffer {
    text: String,
}

impl DisplayBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.text.clear();
    }

    pub fn append(&mut self, fragment: &str) {
        self.text.push_str(fragment);
    }

    pub fn set(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Value for the final-response slot; the placeholder when nothing arrived.
    pub fn into_final(self) -> String {
        if self.text.is_empty() {
            NO_RESPONSE_PLACEHOLDER.to_string()
        } else {
            self.text
        }
    }
}

/// Per-action lifecycle.
///
/// `Idle → Requesting → Streaming* → Completed | Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Idle,
    Requesting,
    Streaming,
    Completed,
    Failed,
}

impl RenderState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RenderState::Completed | RenderState::Failed)
    }
}

/// The two display slots a UI shows for one action.
pub trait RenderSink {
    /// Progressive slot: the whole buffer so far, after every append.
    fn stream_updated(&mut self, text: &str);

    /// Final slot: set once when the action ends (also cleared at start).
    fn final_updated(&mut self, text: &str);

    fn state_changed(&mut self, _state: RenderState) {}
}
