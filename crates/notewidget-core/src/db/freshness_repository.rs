//! Freshness store: last-applied timestamp per stream

use libsql::Connection;

use super::PersistenceResult;
use crate::error::PersistenceError;
use crate::models::{StreamId, SyncState};

/// Durable key to timestamp map for the two streams.
#[allow(async_fn_in_trait)]
pub trait FreshnessStore {
    /// Load the stored state; absent keys read as 0.
    async fn load(&self) -> PersistenceResult<SyncState>;

    /// Raise a stream's timestamp to `timestamp` if it is strictly newer.
    ///
    /// Returns whether the stored value moved. A stale value leaves the row
    /// untouched.
    async fn advance(&self, stream: StreamId, timestamp: i64) -> PersistenceResult<bool>;
}

/// libSQL implementation of `FreshnessStore`
pub struct LibSqlFreshnessStore<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlFreshnessStore<'a> {
    /// Create a new store with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl FreshnessStore for LibSqlFreshnessStore<'_> {
    async fn load(&self) -> PersistenceResult<SyncState> {
        let mut state = SyncState::default();
        let mut rows = self.conn.query("SELECT key, value FROM sync_state", ()).await?;

        while let Some(row) = rows.next().await? {
            let key: String = row.get(0)?;
            let value: i64 = row.get(1)?;
            match StreamId::ALL
                .into_iter()
                .find(|stream| stream.state_key() == key)
            {
                Some(stream) => state.advance(stream, value),
                None => tracing::debug!("Ignoring unknown sync_state key {key}"),
            }
        }

        Ok(state)
    }

    async fn advance(&self, stream: StreamId, timestamp: i64) -> PersistenceResult<bool> {
        if timestamp < 0 {
            return Err(PersistenceError::Corrupt {
                key: stream.state_key().to_string(),
                reason: format!("refusing to store negative timestamp {timestamp}"),
            });
        }

        let changed = self
            .conn
            .execute(
                "INSERT INTO sync_state (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value
                 WHERE excluded.value > sync_state.value",
                libsql::params![stream.state_key(), timestamp],
            )
            .await?;

        Ok(changed > 0)
    }
}
