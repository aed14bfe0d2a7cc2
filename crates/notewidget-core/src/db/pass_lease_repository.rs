//! Pass lease: at most one sync pass per database file at a time

use std::time::Duration;

use libsql::Connection;

use super::PersistenceResult;
use crate::util::unix_timestamp_millis;

/// Exclusive, expiring claim on running a pass against this store.
///
/// A holder that dies without releasing blocks others only until its lease
/// expires.
#[allow(async_fn_in_trait)]
pub trait PassLease {
    /// Claim the lease for `ttl`. Returns `false` while someone else holds an
    /// unexpired lease.
    async fn try_acquire(&self, holder: &str, ttl: Duration) -> PersistenceResult<bool>;

    /// Give the lease up if `holder` still owns it.
    async fn release(&self, holder: &str) -> PersistenceResult<()>;
}

/// libSQL implementation of `PassLease`
pub struct LibSqlPassLease<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlPassLease<'a> {
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl PassLease for LibSqlPassLease<'_> {
    async fn try_acquire(&self, holder: &str, ttl: Duration) -> PersistenceResult<bool> {
        let now = unix_timestamp_millis();
        let ttl_millis = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let expires_at = now.saturating_add(ttl_millis);

        // Single statement, so the check and the claim are one write.
        let changed = self
            .conn
            .execute(
                "INSERT INTO pass_lease (id, holder, expires_at) VALUES (1, ?1, ?2)
                 ON CONFLICT(id) DO UPDATE SET
                    holder = excluded.holder,
                    expires_at = excluded.expires_at
                 WHERE pass_lease.expires_at <= ?3",
                libsql::params![holder, expires_at, now],
            )
            .await?;

        Ok(changed > 0)
    }

    async fn release(&self, holder: &str) -> PersistenceResult<()> {
        self.conn
            .execute(
                "DELETE FROM pass_lease WHERE id = 1 AND holder = ?1",
                libsql::params![holder],
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test(flavor = "multi_thread")]
    async fn second_holder_is_refused_until_release() {
        let db = Database::open_in_memory().await.unwrap();
        let lease = LibSqlPassLease::new(db.connection());

        assert!(lease.try_acquire("a", TTL).await.unwrap());
        assert!(!lease.try_acquire("b", TTL).await.unwrap());

        lease.release("a").await.unwrap();
        assert!(lease.try_acquire("b", TTL).await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn release_by_non_holder_keeps_lease() {
        let db = Database::open_in_memory().await.unwrap();
        let lease = LibSqlPassLease::new(db.connection());

        assert!(lease.try_acquire("a", TTL).await.unwrap());
        lease.release("b").await.unwrap();
        assert!(!lease.try_acquire("b", TTL).await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn expired_lease_can_be_taken_over() {
        let db = Database::open_in_memory().await.unwrap();
        db.connection()
            .execute(
                "INSERT INTO pass_lease (id, holder, expires_at) VALUES (1, 'crashed', ?1)",
                libsql::params![unix_timestamp_millis() - 1_000],
            )
            .await
            .unwrap();
        let lease = LibSqlPassLease::new(db.connection());

        assert!(lease.try_acquire("b", TTL).await.unwrap());
        assert!(!lease.try_acquire("c", TTL).await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn lease_is_shared_across_connections_to_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sync.db");
        let first = Database::open(&path).await.unwrap();
        let second = Database::open(&path).await.unwrap();

        assert!(LibSqlPassLease::new(first.connection())
            .try_acquire("a", TTL)
            .await
            .unwrap());
        assert!(!LibSqlPassLease::new(second.connection())
            .try_acquire("b", TTL)
            .await
            .unwrap());
    }
}
