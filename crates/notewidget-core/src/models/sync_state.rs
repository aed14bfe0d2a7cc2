//! Persisted freshness state

use serde::{Deserialize, Serialize};

use super::StreamId;

/// Last-applied freshness timestamp per stream.
///
/// Both fields only move forward; a fresh install starts at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncState {
    pub last_widget_timestamp: i64,
    pub last_updates_timestamp: i64,
}

impl SyncState {
    /// Stored timestamp for a stream.
    pub const fn get(&self, stream: StreamId) -> i64 {
        match stream {
            StreamId::Widget => self.last_widget_timestamp,
            StreamId::Updates => self.last_updates_timestamp,
        }
    }

    /// Raise a stream's timestamp, ignoring values that would move it backwards.
    pub fn advance(&mut self, stream: StreamId, timestamp: i64) {
        let slot = match stream {
            StreamId::Widget => &mut self.last_widget_timestamp,
            StreamId::Updates => &mut self.last_updates_timestamp,
        };
        *slot = (*slot).max(timestamp);
    }
}
