//! notewidget-core - Core library for notewidget
//!
//! Keeps a home-screen widget and a local notification channel consistent
//! with two remote documents (`widget` and `updates`) even when the hosting
//! application is not running. The [`sync::SyncWorker`] runs one pass at a
//! time: fetch both streams, decide freshness, notify, render, publish and
//! persist.
//!
//! Host facilities (widget surfaces, the notification tray, periodic
//! triggers) are consumed through the traits in [`host`]; the core never
//! reaches into a platform directly.

pub mod config;
pub mod db;
pub mod decide;
pub mod error;
pub mod fetch;
pub mod host;
pub mod models;
pub mod notify;
pub mod publish;
pub mod render;
pub mod schedule;
pub mod sync;
pub mod util;

pub use decide::{decide, Decision};
pub use error::{
    ConfigError, Error, FetchError, NotificationError, PersistenceError, PublishError, Result,
};
pub use models::{
    InstanceId, NotificationEvent, RemoteDocument, StreamId, SyncState, UpdatesDocument,
    WidgetDocument, WidgetViewModel,
};
pub use sync::{PassReport, PassStatus, SyncTrigger, SyncWorker};
