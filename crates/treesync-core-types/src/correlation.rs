//! Correlation types for update streams
//!
//! A transport delivers updates for one tree as an ordered stream. These
//! types let log events and errors from different layers be tied back to
//! the stream and the position of the update inside it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies one update stream (typically one tree instance)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamId(String);

impl StreamId {
    /// Generate a new StreamId using UUIDv7 (time ordered)
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wrap an id received from elsewhere (e.g. a transport header)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for StreamId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StreamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Zero-based position of an update within its stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpdateSeq(u64);

impl UpdateSeq {
    pub const FIRST: UpdateSeq = UpdateSeq(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// The sequence number following this one (saturating)
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl std::fmt::Display for UpdateSeq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Correlation context carried alongside one update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateContext {
    pub stream_id: StreamId,
    pub seq: UpdateSeq,
}

impl UpdateContext {
    /// Start a fresh stream at sequence 0
    pub fn new() -> Self {
        Self {
            stream_id: StreamId::new(),
            seq: UpdateSeq::FIRST,
        }
    }

    /// Context for an existing stream
    pub fn for_stream(stream_id: StreamId) -> Self {
        Self {
            stream_id,
            seq: UpdateSeq::FIRST,
        }
    }

    /// Advance to the next update in the same stream
    pub fn advance(&mut self) -> UpdateSeq {
        let current = self.seq;
        self.seq = current.next();
        current
    }
}

impl Default for UpdateContext {
    fn default() -> Self {
        Self::new()
    }
}
