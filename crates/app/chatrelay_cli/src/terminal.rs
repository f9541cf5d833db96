//! Terminal rendering of the two display slots.

use std::io::{self, Write};

use chatrelay_client::{RenderSink, RenderState};

/// Writes streamed text as it grows, then the final reply.
///
/// The progressive slot only ever grows within one action, so each update
/// prints the new suffix. The final slot is printed when nothing was
/// streamed (buffered mode, or a stream with no text).
pub struct TerminalSink<W: Write> {
    out: W,
    printed: usize,
    final_text: String,
    error: Option<io::Error>,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            printed: 0,
            final_text: String::new(),
            error: None,
        }
    }

    /// Surface the first write error, if any.
    pub fn finish(self) -> io::Result<W> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.out),
        }
    }

    fn write(&mut self, text: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            self.error = Some(e);
        }
    }
}

impl<W: Write> RenderSink for TerminalSink<W> {
    fn stream_updated(&mut self, text: &str) {
        if text.len() < self.printed {
            // Reset at the start of an action.
            self.printed = 0;
        }
        if let Some(new) = text.get(self.printed..) {
            if !new.is_empty() {
                self.write(new);
            }
        }
        self.printed = text.len();
    }

    fn final_updated(&mut self, text: &str) {
        self.final_text = text.to_string();
    }

    fn state_changed(&mut self, state: RenderState) {
        match state {
            RenderState::Completed if self.printed == 0 => {
                let text = std::mem::take(&mut self.final_text);
                self.write(&text);
                self.write("\n");
            }
            RenderState::Completed | RenderState::Failed if self.printed > 0 => self.write("\n"),
            _ => {}
        }
    }
}
