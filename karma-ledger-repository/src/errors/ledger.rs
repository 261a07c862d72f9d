//! Error types for the ledger repository.
//! Defines specific errors that can occur during database operations on votes,
//! totals and the schema marker.
use thiserror::Error;

/// Represents errors that can occur within the ledger repository.
///
/// Storage faults are fatal to the request that hit them. The surrounding
/// transaction has been rolled back by the time the error is returned.
#[derive(Debug, Error)]
pub enum LedgerRepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Unsupported schema version {found}, this build supports up to {supported}")]
    UnsupportedSchemaVersion { found: i64, supported: i64 },

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}
