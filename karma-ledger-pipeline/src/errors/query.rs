//! Error types for the query module of the Karma Ledger Pipeline.
use thiserror::Error;
use karma_ledger_repository::LedgerRepositoryError;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Repository error: {0}")]
    Repository(#[from] LedgerRepositoryError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
