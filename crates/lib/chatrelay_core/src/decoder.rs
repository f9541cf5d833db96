//! Incremental byte-to-line decoding for chunked response bodies.
//!
//! Network reads rarely line up with record boundaries: a read can end in
//! the middle of a line, or in the middle of a multi-byte UTF-8 sequence.
//! [`Utf8Decoder`] holds back an unfinished multi-byte tail until the next
//! read completes it, and [`LineDecoder`] holds back an unfinished line until
//! its newline arrives. Neither ever drops buffered input; leftovers are
//! only released by `finish`.

/// Stateful UTF-8 decoder that carries split multi-byte sequences across reads.
///
/// Invalid sequences decode to `U+FFFD`. An incomplete sequence at the end
/// of a read is kept and prefixed to the next read.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `bytes`, returning every character that is complete so far.
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);

        let mut out = String::with_capacity(self.pending.len());
        let mut consumed = 0;
        loop {
            let rest = &self.pending[consumed..];
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    consumed = self.pending.len();
                    break;
                }
                Err(e) => {
                    let valid_up_to = e.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&rest[..valid_up_to]));
                    match e.error_len() {
                        // Truncated sequence at the end: wait for more bytes.
                        None => {
                            consumed += valid_up_to;
                            break;
                        }
                        Some(invalid_len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            consumed += valid_up_to + invalid_len;
                        }
                    }
                }
            }
        }

        self.pending.drain(..consumed);
        out
    }

    /// Flush whatever is left; an unfinished sequence becomes `U+FFFD`.
    pub fn finish(&mut self) -> String {
        let out = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        out
    }

    /// Number of bytes held back waiting for the rest of a character.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Splits an incrementally decoded byte stream into lines.
///
/// `\n`, `\r\n` and a bare `\r` all end a line, as in SSE; a `\r\n` split
/// across two reads still counts once. Lines are returned without their
/// terminator. Empty lines are returned as-is so callers can tell SSE event
/// boundaries apart from data.
///
/// A line is held until its terminator arrives. There is no length cap, so
/// a peer that never ends a line grows the buffer for as long as it sends.
#[derive(Debug, Default)]
pub struct LineDecoder {
    utf8: Utf8Decoder,
    partial: String,
    /// The last terminator seen was `\r`; a leading `\n` completes it.
    after_cr: bool,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one network read, returning every line it completed.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        let text = self.utf8.decode(bytes);
        let mut rest = text.as_str();
        if rest.is_empty() {
            return Vec::new();
        }
        if self.after_cr {
            rest = rest.strip_prefix('\n').unwrap_or(rest);
            self.after_cr = false;
        }

        let mut lines = Vec::new();
        while let Some(end) = rest.find(|c: char| c == '\r' || c == '\n') {
            self.partial.push_str(&rest[..end]);
            lines.push(std::mem::take(&mut self.partial));

            let terminator = rest.as_bytes()[end];
            rest = &rest[end + 1..];
            if terminator == b'\r' {
                match rest.strip_prefix('\n') {
                    Some(after) => rest = after,
                    None if rest.is_empty() => self.after_cr = true,
                    None => {}
                }
            }
        }
        self.partial.push_str(rest);
        lines
    }

    /// Release the final unterminated line, if any.
    pub fn finish(&mut self) -> Option<String> {
        let tail = self.utf8.finish();
        self.partial.push_str(&tail);
        self.after_cr = false;
        let line = std::mem::take(&mut self.partial);
        if line.is_empty() { None } else { Some(line) }
    }
}
