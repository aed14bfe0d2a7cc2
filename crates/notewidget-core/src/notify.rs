//! Update notifications

use crate::decide::Decision;
use crate::error::NotificationError;
use crate::host::NotificationSink;
use crate::models::{NotificationChannel, NotificationEvent, UpdatesDocument};

const NOTIFICATION_TITLE: &str = "Shared Notes";

/// Posts at most one notification per forward move of the `updates` stream.
pub struct NotificationDispatcher<N> {
    sink: N,
    channel: NotificationChannel,
}

impl<N: NotificationSink> NotificationDispatcher<N> {
    pub const fn new(sink: N) -> Self {
        Self {
            sink,
            channel: NotificationChannel::SHARED_NOTES,
        }
    }

    pub const fn sink(&self) -> &N {
        &self.sink
    }

    /// Post a notification for an applied `updates` document.
    ///
    /// `Ok(Some(event))` means the notification went out and the caller should
    /// persist `event.dedup_timestamp`. On `Err` the timestamp must stay where
    /// it is so the next pass tries again.
    pub async fn maybe_notify(
        &self,
        decision: Decision,
        document: &UpdatesDocument,
    ) -> Result<Option<NotificationEvent>, NotificationError> {
        if !decision.is_apply() {
            return Ok(None);
        }

        let event = self.build_event(document);
        self.sink.post(&event).await?;
        tracing::info!(
            channel = %event.channel_id,
            timestamp = event.dedup_timestamp,
            "Posted update notification"
        );
        Ok(Some(event))
    }

    pub fn build_event(&self, document: &UpdatesDocument) -> NotificationEvent {
        NotificationEvent {
            channel_id: self.channel.id.to_string(),
            title: NOTIFICATION_TITLE.to_string(),
            body: format!("Note updated: {}", document.title),
            dedup_timestamp: document.timestamp,
            note_id: document.note_id.clone(),
        }
    }
}
