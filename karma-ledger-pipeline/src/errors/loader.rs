//! Error types for the loader module of the Karma Ledger Pipeline.
//! Defines specific errors that can occur while persisting votes.
use thiserror::Error;
use karma_ledger_repository::LedgerRepositoryError;

/// Represents errors that can occur within the vote loader.
///
/// This enum consolidates the error conditions of the loading step, which
/// are all propagated from the ledger repository.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("Ledger repository error: {0}")]
    LedgerRepository(#[from] LedgerRepositoryError),
}
