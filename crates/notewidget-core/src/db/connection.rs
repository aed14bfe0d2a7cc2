//! Database connection management

use std::path::Path;

use libsql::{Builder, Connection, Database as LibSqlDatabase};

use super::{migrations, PersistenceResult};

/// Database wrapper for a local libSQL file
pub struct Database {
    _db: LibSqlDatabase,
    conn: Connection,
}

impl Database {
    /// Open a local database at the given path, creating it if it doesn't exist
    ///
    /// Runs migrations automatically.
    pub async fn open(path: impl AsRef<Path>) -> PersistenceResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let path_str = path.to_string_lossy().to_string();
        let db = Builder::new_local(&path_str).build().await?;
        Self::finish(db).await
    }

    /// Open an in-memory database (useful for testing)
    pub async fn open_in_memory() -> PersistenceResult<Self> {
        let db = Builder::new_local(":memory:").build().await?;
        Self::finish(db).await
    }

    async fn finish(db: LibSqlDatabase) -> PersistenceResult<Self> {
        let conn = db.connect()?;
        let database = Self { _db: db, conn };
        database.configure().await?;
        migrations::run(&database.conn).await?;
        Ok(database)
    }

    /// Configure `SQLite` for a small, crash-safe key/value workload
    async fn configure(&self) -> PersistenceResult<()> {
        // In-memory databases reject WAL; that is fine.
        if let Ok(mut rows) = self.conn.query("PRAGMA journal_mode = WAL;", ()).await {
            rows.next().await.ok();
        }
        self.conn.execute("PRAGMA synchronous = FULL;", ()).await?;
        // Several workers may share the file; wait out short write locks.
        let mut rows = self.conn.query("PRAGMA busy_timeout = 5000;", ()).await?;
        rows.next().await?;
        Ok(())
    }

    /// Get a reference to the underlying connection
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}
