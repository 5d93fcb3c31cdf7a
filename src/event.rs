//! Event interpretation: one framed line in, one classified outcome out.
//!
//! The endpoint speaks server-sent events where every meaningful line is
//! a `data:` field holding a JSON chunk, and the stream ends with the
//! literal `data: [DONE]` sentinel.

use serde::Deserialize;

use crate::error::DecodeWarning;

/// Terminal sentinel payload sent after the last content chunk.
const DONE_SENTINEL: &str = "[DONE]";

/// What one event line means for the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Append this fragment to the transcript and notify the host.
    Delta(String),

    /// The producer finished; no further events follow.
    Done,

    /// Structurally fine but content-free (comments, role announcements,
    /// finish metadata, empty fragments). Nothing to do.
    Ignore,

    /// The line violates the protocol. The session skips it and records
    /// the warning.
    Malformed(DecodeWarning),
}

/// One streamed completion chunk. Only the content delta matters here;
/// identifiers, timestamps, and usage metadata are left to serde's
/// unknown-field handling.
#[derive(Debug, Deserialize)]
struct ChatChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    delta: Option<ChunkDelta>,
}

#[derive(Debug, Deserialize)]
struct ChunkDelta {
    content: Option<String>,
}

/// Classify one framed, non-blank line.
pub fn extract(line: &str) -> Extraction {
    if line.starts_with(':') {
        return Extraction::Ignore;
    }
    let Some(payload) = line.strip_prefix("data:") else {
        return Extraction::Malformed(DecodeWarning::new("unexpected event field", line));
    };
    let payload = payload.trim();
    if payload.is_empty() {
        return Extraction::Ignore;
    }
    if payload == DONE_SENTINEL {
        return Extraction::Done;
    }

    match serde_json::from_str::<ChatChunk>(payload) {
        Ok(chunk) => {
            let content = chunk
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.delta)
                .and_then(|delta| delta.content);
            match content {
                Some(text) if !text.is_empty() => Extraction::Delta(text),
                _ => Extraction::Ignore,
            }
        }
        Err(_) => Extraction::Malformed(DecodeWarning::new("unparseable event payload", line)),
    }
}
