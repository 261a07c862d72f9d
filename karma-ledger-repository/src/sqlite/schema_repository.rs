//! SQLite implementation of the schema version marker.
//!
//! Stores the schema generation in the single-row `schema_version` table and
//! applies pending migrations at startup.

use crate::errors::LedgerRepositoryError;
use crate::interfaces::{SchemaRepository, SchemaStatus};
use crate::sqlite::SqliteStore;
use crate::sqlite::migrations::{CURRENT_SCHEMA_VERSION, MIGRATIONS, Migration};
use async_trait::async_trait;
use sqlx::SqliteConnection;
use tracing::info;

/// SQLite-backed schema marker and migrator.
pub struct SqliteSchemaRepository {
    store: SqliteStore,
}

impl SqliteSchemaRepository {
    /// Creates a new schema repository on top of `store`.
    pub fn new(store: SqliteStore) -> Self {
        Self { store }
    }

    async fn apply(&self, migration: &'static Migration) -> Result<(), LedgerRepositoryError> {
        self.store
            .unit_of_work(move |conn| Box::pin(run_migration(conn, migration)))
            .await?;
        info!(
            version = migration.version,
            description = migration.description,
            "Applied schema migration"
        );
        Ok(())
    }
}

async fn run_migration(
    conn: &mut SqliteConnection,
    migration: &'static Migration,
) -> Result<(), LedgerRepositoryError> {
    for statement in migration.statements {
        sqlx::query(statement).execute(&mut *conn).await?;
    }
    sqlx::query("DELETE FROM schema_version")
        .execute(&mut *conn)
        .await?;
    sqlx::query("INSERT INTO schema_version (version) VALUES (?)")
        .bind(migration.version)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

#[async_trait]
impl SchemaRepository for SqliteSchemaRepository {
    async fn current_version(&self) -> Result<Option<i64>, LedgerRepositoryError> {
        let table_exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version')",
        )
        .fetch_one(self.store.pool())
        .await?;

        if !table_exists {
            return Ok(None);
        }

        let version: Option<i64> = sqlx::query_scalar("SELECT MAX(version) FROM schema_version")
            .fetch_one(self.store.pool())
            .await?;
        Ok(version)
    }

    async fn ensure_schema(&self) -> Result<SchemaStatus, LedgerRepositoryError> {
        let found = self.current_version().await?;

        match found {
            Some(version) if version > CURRENT_SCHEMA_VERSION => {
                Err(LedgerRepositoryError::UnsupportedSchemaVersion {
                    found: version,
                    supported: CURRENT_SCHEMA_VERSION,
                })
            }
            Some(version) if version == CURRENT_SCHEMA_VERSION => {
                Ok(SchemaStatus::UpToDate { version })
            }
            _ => {
                let from = found.unwrap_or(0);
                for migration in MIGRATIONS.iter().filter(|m| m.version > from) {
                    self.apply(migration).await?;
                }

                if found.is_none() {
                    info!(version = CURRENT_SCHEMA_VERSION, "Initialized ledger schema");
                    Ok(SchemaStatus::Created {
                        version: CURRENT_SCHEMA_VERSION,
                    })
                } else {
                    Ok(SchemaStatus::Migrated {
                        from,
                        to: CURRENT_SCHEMA_VERSION,
                    })
                }
            }
        }
    }
}
