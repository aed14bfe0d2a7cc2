//! Local durable storage for freshness state and the fallback view cache

mod connection;
mod freshness_repository;
mod migrations;
mod pass_lease_repository;
mod view_cache_repository;

pub use connection::Database;
pub use freshness_repository::{FreshnessStore, LibSqlFreshnessStore};
pub use pass_lease_repository::{LibSqlPassLease, PassLease};
pub use view_cache_repository::{LibSqlViewCache, ViewCache};

/// Result type for storage operations
pub type PersistenceResult<T> = std::result::Result<T, crate::error::PersistenceError>;
