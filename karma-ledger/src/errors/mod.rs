//! Error types for the Karma Ledger application.
//! Consolidates errors from configuration, the repository and the query layer.
use karma_ledger_pipeline::errors::{ProcessorError, QueryError};
use karma_ledger_repository::LedgerRepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum KarmaLedgerError {
    #[error("Invalid value for {key}: {value}")]
    InvalidSetting { key: &'static str, value: String },
    #[error("Processor error: {0}")]
    Processor(#[from] ProcessorError),
    #[error("Repository error: {0}")]
    Repository(#[from] LedgerRepositoryError),
    #[error("Query error: {0}")]
    Query(#[from] QueryError),
    #[error("Tracing error: {0}")]
    Tracing(String),
}
