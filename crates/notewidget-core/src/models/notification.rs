//! Notification model

use serde::{Deserialize, Serialize};

/// The single channel update notifications are posted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationChannel {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

impl NotificationChannel {
    pub const SHARED_NOTES: Self = Self {
        id: "shared_notes_updates",
        name: "Shared Notes",
        description: "Notifications for shared note updates",
    };
}

/// A user-visible notification produced by a forward move of the `updates`
/// stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub channel_id: String,
    pub title: String,
    pub body: String,
    /// Timestamp of the `updates` document that produced this event
    pub dedup_timestamp: i64,
    pub note_id: Option<String>,
}
