//! NDJSON frame reader for the gateway's streaming reply.

use chatrelay_core::decoder::LineDecoder;
use chatrelay_core::models::gemini::GenerateContentResponse;
use log::warn;

/// Turns body reads into text fragments, one per well-formed frame.
///
/// Frames may be split across reads at any byte, including inside a
/// multi-byte character. A frame that does not parse is logged and skipped;
/// a frame without text (metadata only) yields nothing.
#[derive(Debug, Default)]
pub struct FrameReader {
    lines: LineDecoder,
    skipped: usize,
}

impl FrameReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one read, returning the fragments of every frame it completed.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        let lines = self.lines.push(bytes);
        lines
            .iter()
            .filter_map(|line| self.fragment(line))
            .collect()
    }

    /// Fragment of a trailing frame that arrived without its newline.
    pub fn finish(&mut self) -> Option<String> {
        let line = self.lines.finish()?;
        self.fragment(&line)
    }

    /// Frames dropped because they failed to parse.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn fragment(&mut self, line: &str) -> Option<String> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        match serde_json::from_str::<GenerateContentResponse>(line) {
            Ok(record) => record
                .first_text()
                .filter(|text| !text.is_empty())
                .map(str::to_string),
            Err(e) => {
                self.skipped += 1;
                warn!("Failed to parse stream line {line:?}: {e}");
                None
            }
        }
    }
}
