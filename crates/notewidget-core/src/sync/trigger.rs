//! What starts a sync pass

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::models::InstanceId;

/// Reason a pass was requested. Every trigger runs a full pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncTrigger {
    /// The host's periodic facility fired
    Periodic,
    /// Explicit request (app foregrounded, manual refresh)
    OnDemand,
    /// A new widget instance was placed and needs content now
    InstanceAdded(InstanceId),
    /// Best-effort push wake-up from the fan-out service
    Wake(WakeSignal),
}

impl fmt::Display for SyncTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Periodic => f.write_str("periodic"),
            Self::OnDemand => f.write_str("on-demand"),
            Self::InstanceAdded(id) => write!(f, "instance-added({id})"),
            Self::Wake(signal) => write!(f, "wake({})", signal.event),
        }
    }
}

/// Event names the fan-out service sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WakeEvent {
    WidgetUpdated,
    NoteUpdated,
    Other(String),
}

impl From<String> for WakeEvent {
    fn from(value: String) -> Self {
        match value.trim() {
            "widget_updated" => Self::WidgetUpdated,
            "note_updated" => Self::NoteUpdated,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<WakeEvent> for String {
    fn from(value: WakeEvent) -> Self {
        value.to_string()
    }
}

impl fmt::Display for WakeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WidgetUpdated => f.write_str("widget_updated"),
            Self::NoteUpdated => f.write_str("note_updated"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

/// Data payload of a push wake-up: `{ "event": ..., "id": ... }`.
///
/// Only an accelerator. Passes stay correct on periodic polling alone, so
/// the payload contents never influence what a pass applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WakeSignal {
    pub event: WakeEvent,
    #[serde(default)]
    pub id: Option<String>,
}

impl WakeSignal {
    pub fn parse(payload: &str) -> Result<Self, Error> {
        serde_json::from_str(payload)
            .map_err(|error| Error::InvalidInput(format!("invalid wake payload: {error}")))
    }

    /// Whether this signal concerns content the worker syncs.
    pub const fn is_relevant(&self) -> bool {
        matches!(self.event, WakeEvent::WidgetUpdated | WakeEvent::NoteUpdated)
    }
}
