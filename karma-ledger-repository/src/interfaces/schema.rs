use crate::errors::LedgerRepositoryError;

/// What `ensure_schema` did to the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaStatus {
    /// The database carried no version marker and was brought to the current schema.
    Created { version: i64 },
    /// Pending migrations were applied.
    Migrated { from: i64, to: i64 },
    UpToDate { version: i64 },
}

/// Trait for interacting with the schema version marker.
///
/// The marker is a single persisted integer consulted at startup to decide
/// whether the database needs to be initialised or migrated.
#[async_trait::async_trait]
pub trait SchemaRepository: Send + Sync {
    /// Stored schema generation, `None` for a database that has never been stamped.
    async fn current_version(&self) -> Result<Option<i64>, LedgerRepositoryError>;

    /// Brings the database up to the schema generation of this build.
    async fn ensure_schema(&self) -> Result<SchemaStatus, LedgerRepositoryError>;
}
