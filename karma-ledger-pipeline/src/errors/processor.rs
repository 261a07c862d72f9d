//! Error types for the processor module of the Karma Ledger Pipeline.
use thiserror::Error;

/// Represents errors that can occur while building the vote policy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProcessorError {
    #[error("Invalid content storage mode: {0} (expected off, partial or full)")]
    InvalidStoreContent(String),
}
