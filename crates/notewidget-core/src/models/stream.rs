//! Remote stream identifiers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the two independently-timestamped remote documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamId {
    /// Content shown on the widget surface
    Widget,
    /// Change marker used to decide whether to notify
    Updates,
}

impl StreamId {
    /// Every stream, in the order a pass processes them.
    pub const ALL: [Self; 2] = [Self::Widget, Self::Updates];

    /// Wire name, also the default document name on the remote store.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Widget => "widget",
            Self::Updates => "updates",
        }
    }

    /// Key of the last-applied timestamp in the freshness store.
    pub const fn state_key(self) -> &'static str {
        match self {
            Self::Widget => "lastWidgetTimestamp",
            Self::Updates => "lastUpdatesTimestamp",
        }
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StreamId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "widget" => Ok(Self::Widget),
            "updates" => Ok(Self::Updates),
            other => Err(format!("unknown stream '{other}'")),
        }
    }
}
