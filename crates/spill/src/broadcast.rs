//! Broadcast types shared between the monitor and the collector server.
//!
//! Field names follow the wire and on-disk format of the collector: a
//! broadcast arrives as `{content, timestamp, user_id}`, is persisted as a
//! [`BroadcastRecord`], and is acknowledged with the running broadcast
//! counter.

use serde::{Deserialize, Serialize};

/// A clipboard broadcast as sent by the monitor.
///
/// The user id travels in the URL path; the copy in the body is informative
/// only and ignored by the server. Both `content` and `timestamp` may be
/// absent: missing content is treated as empty, a missing timestamp is
/// replaced with the server's receipt time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastPayload {
    /// The clipboard text.
    #[serde(default)]
    pub content: String,

    /// Client-side ISO-8601 timestamp of the change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// The sending user's id (informative; the path segment is canonical).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// One logged clipboard transmission.
///
/// Immutable once appended; the structured log holds the ordered list of
/// these under a `broadcasts` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastRecord {
    /// Monotonically increasing sequence number, unique per server process
    /// lifetime and reset only by an explicit log clear.
    #[serde(rename = "broadcast_number")]
    pub sequence: u64,

    /// Opaque identifier of the sending client.
    pub user_id: String,

    /// ISO-8601 timestamp supplied by the client (or substituted by the
    /// server at receipt).
    pub client_timestamp: String,

    /// ISO-8601 timestamp assigned by the server at append time.
    pub server_timestamp: String,

    /// The clipboard text.
    pub content: String,

    /// Character count of `content` at receipt time.
    pub content_length: usize,
}

/// Acknowledgement returned for a successful broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastAck {
    /// Always `"success"`.
    pub status: String,

    /// Human-readable confirmation.
    pub message: String,

    /// The user id the broadcast was recorded under.
    pub user_id: String,

    /// Character count of the recorded content.
    pub content_length: usize,

    /// The record's sequence number.
    pub broadcast_number: u64,
}

/// Count characters the way the collector reports content length.
#[must_use]
pub fn content_length(content: &str) -> usize {
    content.chars().count()
}
