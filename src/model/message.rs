//! Message record types for the forwarding loop.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Summary of one upstream message, as returned by a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSummary {
    /// Stable identifier used for deduplication across runs.
    pub id: String,
    pub subject: String,
    pub sender: String,
    pub sent_at: NaiveDateTime,
    /// Unread flag, when the source reports one.
    pub unread: Option<bool>,
}

/// Full content of one upstream message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent {
    pub subject: String,
    pub sender: String,
    /// Display form of the sent date, passed through verbatim.
    pub date: String,
    /// Body text; may arrive base64 transport-encoded.
    pub body: String,
}
