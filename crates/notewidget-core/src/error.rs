//! Error types for notewidget-core
//!
//! Each failure class suppresses a different state mutation during a sync
//! pass, so they are kept as separate types and only folded into [`Error`]
//! where a caller needs a single return type.

use std::time::Duration;

use thiserror::Error;

use crate::models::{InstanceId, StreamId};

/// Result type alias using notewidget-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in notewidget-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Remote document could not be read
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Local durable store failed
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// A single stream read failed. Never carries a partial document.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Fetching {stream} timed out after {timeout:?}")]
    Timeout { stream: StreamId, timeout: Duration },

    #[error("Fetching {stream} failed: {source}")]
    Http {
        stream: StreamId,
        #[source]
        source: reqwest::Error,
    },

    #[error("Fetching {stream} returned HTTP {status}: {body}")]
    Status {
        stream: StreamId,
        status: u16,
        body: String,
    },

    #[error("Malformed {stream} document: {reason}")]
    Malformed { stream: StreamId, reason: String },

    #[error("Remote {stream} document does not exist")]
    Missing { stream: StreamId },

    #[error("Invalid remote URL for {stream}: {reason}")]
    InvalidUrl { stream: StreamId, reason: String },
}

impl FetchError {
    /// Stream the failed read was for.
    pub const fn stream(&self) -> StreamId {
        match self {
            Self::Timeout { stream, .. }
            | Self::Http { stream, .. }
            | Self::Status { stream, .. }
            | Self::Malformed { stream, .. }
            | Self::Missing { stream }
            | Self::InvalidUrl { stream, .. } => *stream,
        }
    }
}

/// Local durable-store failure.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// libSQL error
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored value is unusable
    #[error("Corrupt persisted value for {key}: {reason}")]
    Corrupt { key: String, reason: String },
}

/// Host surface rejected a render for one instance.
#[derive(Error, Debug)]
#[error("Surface instance {instance} rejected render: {reason}")]
pub struct PublishError {
    pub instance: InstanceId,
    pub reason: String,
}

impl PublishError {
    pub fn new(instance: InstanceId, reason: impl Into<String>) -> Self {
        Self {
            instance,
            reason: reason.into(),
        }
    }
}

/// Platform notification facility rejected an event.
#[derive(Error, Debug)]
#[error("Notification on channel {channel_id} rejected: {reason}")]
pub struct NotificationError {
    pub channel_id: String,
    pub reason: String,
}

impl NotificationError {
    pub fn new(channel_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            reason: reason.into(),
        }
    }
}

/// Configuration could not be resolved.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<libsql::Error> for Error {
    fn from(error: libsql::Error) -> Self {
        Self::Persistence(PersistenceError::LibSql(error))
    }
}
