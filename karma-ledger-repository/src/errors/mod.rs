//! Error types for the karma ledger repository.
//! Consolidates and re-exports error types related to ledger storage operations.
mod ledger;

pub use ledger::LedgerRepositoryError;
