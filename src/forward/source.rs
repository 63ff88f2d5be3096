//! Collaborator seams of the forwarding loop.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::Result;
use crate::model::{MessageContent, MessageSummary};

/// Paginated upstream message source.
///
/// Authentication and transport details stay behind this trait; the loop
/// only sees pages of summaries and per-id content fetches. Page numbers
/// start at 1. Implementations should surface transport failures as
/// [`crate::Error::Transport`]; the loop aborts on them.
pub trait MessageSource {
    /// Fetch one page of message summaries. An empty page ends pagination.
    fn fetch_page(&mut self, page: u32) -> Result<Vec<MessageSummary>>;

    /// Fetch the full content of one message.
    fn fetch_content(&mut self, id: &str) -> Result<MessageContent>;

    /// Server-reported total message count, when the source exposes one.
    /// Used by the pre-loading variant to stop fetching pages early.
    fn total_count(&mut self) -> Result<Option<usize>> {
        Ok(None)
    }
}

/// Downstream delivery seam.
pub trait Outbound {
    /// Deliver one message. A failure aborts the run.
    fn deliver(&mut self, subject: &str, body: &str) -> Result<()>;
}

/// Decode a possibly base64 transport-encoded body.
///
/// Sources hand bodies through in whatever encoding the transport used;
/// anything that does not decode into valid UTF-8 base64 is returned as-is
/// rather than failing the run.
pub fn decode_body(raw: &str) -> String {
    match STANDARD.decode(raw.trim()) {
        Ok(bytes) => String::from_utf8(bytes).unwrap_or_else(|_| raw.to_string()),
        Err(_) => raw.to_string(),
    }
}
