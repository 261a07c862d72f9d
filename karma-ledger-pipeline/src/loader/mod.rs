//! This module defines the `VoteLoader` struct responsible for persisting
//! processed votes to the ledger.
//! It acts as an interface between the request pipeline and the data storage.
pub use karma_ledger_repository::{LedgerRepository, LedgerRepositoryError};
pub use crate::errors::LoaderError;
use karma_ledger_shared::types::{ApplyOutcome, RetractOutcome, VoteRecord};
use std::sync::Arc;

/// `VoteLoader` is responsible for writing votes to, and removing them from,
/// the ledger.
///
/// It utilizes a `LedgerRepository` to interact with the underlying data store,
/// which keeps the recipient totals in step with every write.
pub struct VoteLoader {
    pub ledger_repository: Arc<dyn LedgerRepository>,
}

impl VoteLoader {
    /// Creates a new `VoteLoader` instance.
    ///
    /// # Arguments
    ///
    /// * `ledger_repository` - An `Arc` (Atomically Reference Counted) trait object
    ///   that implements `LedgerRepository`, providing the interface for data persistence.
    ///
    /// # Returns
    ///
    /// A new `VoteLoader` instance.
    pub fn new(ledger_repository: Arc<dyn LedgerRepository>) -> Self {
        Self { ledger_repository }
    }

    /// Returns `true` if `event_id` is itself a stored vote event.
    pub async fn is_vote_subject(&self, event_id: &str) -> Result<bool, LoaderError> {
        Ok(self.ledger_repository.is_vote_subject(event_id).await?)
    }

    /// Inserts `record`, revotes the stored one, or reports a duplicate.
    ///
    /// # Arguments
    ///
    /// * `record` - The vote to persist
    ///
    /// # Returns
    ///
    /// A `Result` with the `ApplyOutcome` or a `LoaderError` if the persistence fails.
    pub async fn apply(&self, record: &VoteRecord) -> Result<ApplyOutcome, LoaderError> {
        Ok(self.ledger_repository.apply_vote(record).await?)
    }

    /// Removes the vote created by the event `origin`, if there is one.
    pub async fn retract(&self, origin: &str) -> Result<RetractOutcome, LoaderError> {
        let outcome = match self.ledger_repository.delete_by_origin(origin).await? {
            Some(record) => RetractOutcome::Retracted(record),
            None => RetractOutcome::NotFound,
        };
        Ok(outcome)
    }
}
