use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] notewidget_core::Error),
    #[error(transparent)]
    Config(#[from] notewidget_core::ConfigError),
    #[error(transparent)]
    Persistence(#[from] notewidget_core::PersistenceError),
    #[error(transparent)]
    Fetch(#[from] notewidget_core::FetchError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Could not determine a data directory; pass --data-dir")]
    NoDataDir,
}
