//! Result of one sync pass

use crate::error::{FetchError, NotificationError};
use crate::models::{NotificationEvent, SyncState, WidgetViewModel};
use crate::publish::PublishReport;

use super::SyncTrigger;

/// How one stream fared during a pass.
#[derive(Debug)]
pub enum StreamOutcome {
    /// Newer document applied and its timestamp persisted
    Applied { timestamp: i64 },
    /// Fetched document was not newer than the stored timestamp
    Skipped { fetched: i64, stored: i64 },
    /// Fetch failed; nothing was mutated for this stream
    FetchFailed(FetchError),
    /// Newer `updates` document, but the notification was rejected; the
    /// timestamp stays put so the next pass retries
    NotificationFailed(NotificationError),
    /// The pass was dropped before this stream ran
    NotRun,
}

impl StreamOutcome {
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    pub const fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::FetchFailed(_))
    }
}

/// Overall pass result reported to the external scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassStatus {
    Success,
    /// At least one stream could not be fetched
    PartialSuccess,
    /// Another pass was already running; this trigger was dropped
    Skipped,
}

/// Everything a completed (or dropped) pass did.
#[derive(Debug)]
pub struct PassReport {
    pub trigger: SyncTrigger,
    pub widget: StreamOutcome,
    pub updates: StreamOutcome,
    pub notification: Option<NotificationEvent>,
    /// View model published this pass
    pub view_model: Option<WidgetViewModel>,
    pub publish: PublishReport,
    /// Freshness state after the pass
    pub state: SyncState,
}

impl PassReport {
    pub(crate) fn skipped(trigger: SyncTrigger) -> Self {
        Self {
            trigger,
            widget: StreamOutcome::NotRun,
            updates: StreamOutcome::NotRun,
            notification: None,
            view_model: None,
            publish: PublishReport::default(),
            state: SyncState::default(),
        }
    }

    pub const fn status(&self) -> PassStatus {
        if matches!(self.widget, StreamOutcome::NotRun)
            && matches!(self.updates, StreamOutcome::NotRun)
        {
            PassStatus::Skipped
        } else if self.widget.is_fetch_failure() || self.updates.is_fetch_failure() {
            PassStatus::PartialSuccess
        } else {
            PassStatus::Success
        }
    }
}
