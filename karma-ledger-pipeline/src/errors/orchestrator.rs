//! Error types for the orchestrator module of the Karma Ledger Pipeline.
use thiserror::Error;
use crate::errors::loader::LoaderError;

/// Represents errors that can occur while handling a vote request.
///
/// Policy rejections, duplicates and unresolvable subjects are outcomes, not
/// errors. Only storage failures end up here.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Loader error: {0}")]
    Loader(#[from] LoaderError),
}
