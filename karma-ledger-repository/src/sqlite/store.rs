use crate::errors::LedgerRepositoryError;
use futures::future::BoxFuture;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{SqliteConnection, SqlitePool};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Handle to the durable store shared by the ledger, totals and schema repositories.
///
/// Cloning is cheap; all clones share one connection pool.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if needed) the database file at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, LedgerRepositoryError> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // Prevent transient "database is locked" errors under concurrent access.
            .busy_timeout(Duration::from_secs(5));
        Self::connect_with(options).await
    }

    /// Opens a private in-memory database, mostly useful for tests.
    pub async fn in_memory() -> Result<Self, LedgerRepositoryError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        Self::connect_with(options).await
    }

    async fn connect_with(options: SqliteConnectOptions) -> Result<Self, LedgerRepositoryError> {
        let pool = SqlitePoolOptions::new()
            // One connection: transactions serialize at the store, and an
            // in-memory database lives exactly as long as its connection.
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Runs `work` inside a single transaction.
    ///
    /// The transaction commits when `work` returns `Ok` and rolls back when it
    /// returns `Err`. If the returned future is dropped before completion the
    /// transaction is rolled back as well.
    ///
    /// # Arguments
    ///
    /// * `work` - Closure receiving the transaction's connection
    ///
    /// # Returns
    ///
    /// * `Ok(R)` - The closure's result, after a successful commit
    /// * `Err(LedgerRepositoryError)` - The closure's error, or a begin/commit failure
    pub async fn unit_of_work<R, F>(&self, work: F) -> Result<R, LedgerRepositoryError>
    where
        R: Send,
        F: for<'c> FnOnce(&'c mut SqliteConnection) -> BoxFuture<'c, Result<R, LedgerRepositoryError>>
            + Send,
    {
        let mut tx = self.pool.begin().await?;
        match work(&mut *tx).await {
            Ok(result) => {
                tx.commit().await?;
                Ok(result)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Failed to roll back transaction");
                }
                Err(err)
            }
        }
    }

    /// Check database connectivity.
    pub async fn health_check(&self) -> Result<(), LedgerRepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unit_of_work_commits_on_ok() {
        let store = SqliteStore::in_memory().await.unwrap();
        sqlx::query("CREATE TABLE items (id INTEGER PRIMARY KEY)")
            .execute(store.pool())
            .await
            .unwrap();

        store
            .unit_of_work(|conn| {
                Box::pin(async move {
                    sqlx::query("INSERT INTO items (id) VALUES (1)")
                        .execute(&mut *conn)
                        .await?;
                    Ok::<_, LedgerRepositoryError>(())
                })
            })
            .await
            .unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_unit_of_work_rolls_back_on_err() {
        let store = SqliteStore::in_memory().await.unwrap();
        sqlx::query("CREATE TABLE items (id INTEGER PRIMARY KEY)")
            .execute(store.pool())
            .await
            .unwrap();

        let result: Result<(), _> = store
            .unit_of_work(|conn| {
                Box::pin(async move {
                    sqlx::query("INSERT INTO items (id) VALUES (1)")
                        .execute(&mut *conn)
                        .await?;
                    Err::<(), _>(LedgerRepositoryError::InvalidRecord("abort".to_string()))
                })
            })
            .await;
        assert!(matches!(result, Err(LedgerRepositoryError::InvalidRecord(_))));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_health_check() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.health_check().await.unwrap();
    }
}
