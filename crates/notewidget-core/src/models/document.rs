//! Remote document models and payload parsing

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::StreamId;
use crate::error::FetchError;

/// Shown when the widget document has no `display_text`.
pub const PLACEHOLDER_DISPLAY_TEXT: &str = "No note content yet...";

/// Used when the updates document has no `title`.
pub const PLACEHOLDER_TITLE: &str = "Note updated";

const FIELD_UPDATED_AT: &str = "updated_at";
const FIELD_DISPLAY_TEXT: &str = "display_text";
const FIELD_IMAGE_PATH: &str = "image_path";
const FIELD_SELECTED_NOTE_ID: &str = "selected_note_id";
const FIELD_TITLE: &str = "title";
const FIELD_NOTE_ID: &str = "note_id";
const FIELD_NOTE_ID_ALIAS: &str = "id";

/// Content to display on the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetDocument {
    /// Freshness timestamp (`updated_at`)
    pub timestamp: i64,
    pub display_text: String,
    /// Local image path; empty means "no image"
    pub image_path: String,
    /// Note the widget is pinned to, when the writer records it
    pub selected_note_id: Option<String>,
}

/// Change marker for the shared notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatesDocument {
    /// Freshness timestamp (`updated_at`)
    pub timestamp: i64,
    pub title: String,
    pub note_id: Option<String>,
}

/// A fetched document of either stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteDocument {
    Widget(WidgetDocument),
    Updates(UpdatesDocument),
}

impl RemoteDocument {
    /// Parse a raw JSON payload for the given stream.
    ///
    /// A JSON `null` means the remote path does not exist yet. Anything that
    /// is not an object, or carries an `updated_at` that is not a number, is
    /// rejected as a whole rather than returned half-filled.
    pub fn parse(stream: StreamId, payload: &str) -> Result<Self, FetchError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|error| FetchError::Malformed {
                stream,
                reason: error.to_string(),
            })?;

        let object = match value {
            Value::Object(object) => object,
            Value::Null => return Err(FetchError::Missing { stream }),
            other => {
                return Err(FetchError::Malformed {
                    stream,
                    reason: format!("expected an object, found {}", json_kind(&other)),
                })
            }
        };

        let timestamp = read_timestamp(&object).map_err(|reason| FetchError::Malformed {
            stream,
            reason,
        })?;

        Ok(match stream {
            StreamId::Widget => Self::Widget(WidgetDocument {
                timestamp,
                display_text: read_text(&object, FIELD_DISPLAY_TEXT)
                    .unwrap_or_else(|| PLACEHOLDER_DISPLAY_TEXT.to_string()),
                image_path: read_text(&object, FIELD_IMAGE_PATH).unwrap_or_default(),
                selected_note_id: read_text(&object, FIELD_SELECTED_NOTE_ID)
                    .filter(|id| !id.trim().is_empty()),
            }),
            StreamId::Updates => Self::Updates(UpdatesDocument {
                timestamp,
                title: read_text(&object, FIELD_TITLE)
                    .unwrap_or_else(|| PLACEHOLDER_TITLE.to_string()),
                note_id: read_text(&object, FIELD_NOTE_ID)
                    .or_else(|| read_text(&object, FIELD_NOTE_ID_ALIAS))
                    .filter(|id| !id.trim().is_empty()),
            }),
        })
    }

    pub const fn timestamp(&self) -> i64 {
        match self {
            Self::Widget(document) => document.timestamp,
            Self::Updates(document) => document.timestamp,
        }
    }
}

/// `updated_at` as an integer. Missing or `null` reads as 0 so the document
/// can never win a freshness comparison.
fn read_timestamp(object: &Map<String, Value>) -> Result<i64, String> {
    match object.get(FIELD_UPDATED_AT) {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().map(truncate_f64))
            .ok_or_else(|| format!("{FIELD_UPDATED_AT} is out of range: {number}")),
        Some(Value::String(text)) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().map(truncate_f64))
                .ok_or_else(|| format!("{FIELD_UPDATED_AT} is not numeric: {text:?}"))
        }
        Some(other) => Err(format!(
            "{FIELD_UPDATED_AT} must be a number, found {}",
            json_kind(other)
        )),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn truncate_f64(value: f64) -> i64 {
    value.trunc() as i64
}

/// Scalar fields are read as text; `null` and structured values count as
/// absent.
fn read_text(object: &Map<String, Value>, field: &str) -> Option<String> {
    match object.get(field)? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
