//! Fallback cache of the last rendered widget view model

use libsql::Connection;

use super::PersistenceResult;
use crate::models::WidgetViewModel;
use crate::util::unix_timestamp_millis;

/// Holds the view model shown when a widget fetch fails.
#[allow(async_fn_in_trait)]
pub trait ViewCache {
    /// Load the cached view model, if one was ever saved
    async fn load(&self) -> PersistenceResult<Option<WidgetViewModel>>;

    /// Replace the cached view model
    async fn save(&self, view_model: &WidgetViewModel) -> PersistenceResult<()>;
}

/// libSQL implementation of `ViewCache`
pub struct LibSqlViewCache<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlViewCache<'a> {
    /// Create a new cache with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl ViewCache for LibSqlViewCache<'_> {
    async fn load(&self) -> PersistenceResult<Option<WidgetViewModel>> {
        let mut rows = self
            .conn
            .query("SELECT payload FROM view_cache WHERE id = 1", ())
            .await?;

        let Some(row) = rows.next().await? else {
            return Ok(None);
        };
        let payload: String = row.get(0)?;
        Ok(Some(serde_json::from_str(&payload)?))
    }

    async fn save(&self, view_model: &WidgetViewModel) -> PersistenceResult<()> {
        let payload = serde_json::to_string(view_model)?;
        self.conn
            .execute(
                "INSERT OR REPLACE INTO view_cache (id, payload, updated_at) VALUES (1, ?1, ?2)",
                libsql::params![payload, unix_timestamp_millis()],
            )
            .await?;
        Ok(())
    }
}
