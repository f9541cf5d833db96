//! SSE → NDJSON streaming relay.
//!
//! The upstream streams Server-Sent Events whose `data:` lines each carry one
//! JSON record. The relay re-frames every record it can parse as one
//! newline-terminated JSON line, in arrival order:
//!
//! ```text
//! upstream:  data: {"candidates":[...]}\n\ndata: {"candidates":[...]}\n\n
//! client:    {"candidates":[...]}\n{"candidates":[...]}\n
//! ```
//!
//! A malformed record is logged and dropped on its own and the `[DONE]`
//! sentinel is swallowed. A transport error is yielded as the last item
//! instead of an error frame; the HTTP layer aborts the body on it, so the
//! consumer sees an incomplete response rather than a clean end.

use std::fmt::Display;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tracing::{debug, warn};

use crate::decoder::LineDecoder;
use crate::error::{RelayError, RelayResult};
use crate::models::gemini::GenerateContentResponse;

/// Prefix of an SSE data line.
pub const SSE_DATA_PREFIX: &str = "data:";

/// End-of-stream payload some upstreams send as a final data line.
pub const DONE_SENTINEL: &str = "[DONE]";

/// What one upstream SSE line means to the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SseLine<'a> {
    /// A data payload to parse and forward.
    Data(&'a str),
    /// The end-of-stream sentinel.
    Done,
    /// Blank separators, comments, `event:`/`id:` fields and empty data.
    Skip,
}

/// Classify one decoded SSE line.
pub fn classify_line(line: &str) -> SseLine<'_> {
    let Some(rest) = line.strip_prefix(SSE_DATA_PREFIX) else {
        return SseLine::Skip;
    };
    // SSE allows one optional space after the colon.
    let payload = rest.strip_prefix(' ').unwrap_or(rest);
    match payload.trim() {
        "" => SseLine::Skip,
        DONE_SENTINEL => SseLine::Done,
        _ => SseLine::Data(payload),
    }
}

/// Parse one data payload into a typed upstream record.
pub fn parse_record(payload: &str) -> RelayResult<GenerateContentResponse> {
    serde_json::from_str(payload).map_err(|e| RelayError::Parse(format!("{e}: {payload}")))
}

/// Serialize a record as one NDJSON frame, newline included.
pub fn encode_frame(record: &GenerateContentResponse) -> RelayResult<Bytes> {
    let mut frame =
        serde_json::to_vec(record).map_err(|e| RelayError::Parse(e.to_string()))?;
    frame.push(b'\n');
    Ok(Bytes::from(frame))
}

/// Counters reported when a relay finishes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RelayStats {
    pub relayed: usize,
    pub dropped: usize,
}

impl RelayStats {
    /// Turn one upstream line into an outgoing frame, if it yields one.
    fn relay_line(&mut self, line: &str) -> Option<Bytes> {
        match classify_line(line) {
            SseLine::Data(payload) => match parse_record(payload).and_then(|r| encode_frame(&r)) {
                Ok(frame) => {
                    self.relayed += 1;
                    Some(frame)
                }
                Err(e) => {
                    self.dropped += 1;
                    warn!(error = %e, "dropping malformed upstream record");
                    None
                }
            },
            SseLine::Done => {
                debug!("upstream sent end-of-stream sentinel");
                None
            }
            SseLine::Skip => None,
        }
    }
}

/// Relay an upstream SSE byte stream as NDJSON frames.
///
/// An upstream read error ends the relay with one
/// [`RelayError::Transport`] item; nothing follows it.
///
/// The upstream is owned by the returned stream: it is released when the
/// relay finishes, when a transport error ends it, or when the consumer
/// drops the stream early.
pub fn relay_frames<S, E>(upstream: S) -> impl Stream<Item = RelayResult<Bytes>> + Send + 'static
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    async_stream::stream! {
        let mut upstream = Box::pin(upstream);
        let mut lines = LineDecoder::new();
        let mut stats = RelayStats::default();
        let mut interrupted: Option<RelayError> = None;

        while let Some(chunk) = upstream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    warn!(error = %e, "upstream stream failed, aborting relay");
                    interrupted = Some(RelayError::Transport(e.to_string()));
                    break;
                }
            };
            for line in lines.push(&chunk) {
                if let Some(frame) = stats.relay_line(&line) {
                    yield Ok(frame);
                }
            }
        }

        // A partial line left by a broken connection is never forwarded.
        if interrupted.is_none() {
            if let Some(line) = lines.finish() {
                if let Some(frame) = stats.relay_line(&line) {
                    yield Ok(frame);
                }
            }
        }

        drop(upstream);
        debug!(
            relayed = stats.relayed,
            dropped = stats.dropped,
            aborted = interrupted.is_some(),
            "relay finished"
        );
        if let Some(e) = interrupted {
            yield Err(e);
        }
    }
}
