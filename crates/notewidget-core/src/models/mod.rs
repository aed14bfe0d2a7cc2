//! Data models for notewidget

mod document;
mod instance;
mod notification;
mod stream;
mod sync_state;
mod view_model;

pub use document::{RemoteDocument, UpdatesDocument, WidgetDocument};
pub use instance::InstanceId;
pub use notification::{NotificationChannel, NotificationEvent};
pub use stream::StreamId;
pub use sync_state::SyncState;
pub use view_model::{Color, WidgetTheme, WidgetViewModel};
