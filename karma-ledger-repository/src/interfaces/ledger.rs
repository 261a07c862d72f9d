//! This module defines the `LedgerRepository` trait, the interface to the set
//! of individual vote records. Every mutation it exposes also adjusts the
//! recipient's cached totals inside the same transaction.
use crate::errors::LedgerRepositoryError;
use karma_ledger_shared::types::{ApplyOutcome, MessageTally, UpdateOutcome, VoteKey, VoteRecord};

/// A trait that defines the interface for interacting with the vote ledger.
///
/// The ledger is the source of truth. Implementors must apply each record
/// mutation and the matching totals adjustment as a single atomic unit.
#[async_trait::async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Point lookup by the full identity key.
    async fn get(&self, key: &VoteKey) -> Result<Option<VoteRecord>, LedgerRepositoryError>;

    /// Looks up the record first cast by the vote event `origin`.
    async fn get_by_origin(&self, origin: &str) -> Result<Option<VoteRecord>, LedgerRepositoryError>;

    /// Returns every current record for `recipient`.
    ///
    /// Records are ordered by timestamp, then by storage order.
    async fn all_for(&self, recipient: &str) -> Result<Vec<VoteRecord>, LedgerRepositoryError>;

    /// Returns `true` if `event_id` is the origin of a stored vote.
    async fn is_vote_subject(&self, event_id: &str) -> Result<bool, LedgerRepositoryError>;

    /// Inserts a new record and credits its value to the recipient's totals.
    ///
    /// # Arguments
    ///
    /// * `record` - The record to store. Its key must not exist yet.
    ///
    /// # Returns
    ///
    /// * `Ok(VoteRecord)` - The stored record, with its timestamp set
    /// * `Err(LedgerRepositoryError)` - Invalid record, duplicate key or storage failure
    async fn insert(&self, record: &VoteRecord) -> Result<VoteRecord, LedgerRepositoryError>;

    /// Changes the value of the record stored under `record.key`.
    ///
    /// Only `record.key` is read. The stored origin is kept, the timestamp is
    /// refreshed and the totals move by `new_value - old_value`.
    ///
    /// # Returns
    ///
    /// * `Ok(UpdateOutcome::Updated)` - The value changed
    /// * `Ok(UpdateOutcome::Duplicate)` - The stored value already equals `new_value`
    /// * `Ok(UpdateOutcome::Missing)` - No record is stored under the key
    async fn update_value(
        &self,
        record: &VoteRecord,
        new_value: i64,
    ) -> Result<UpdateOutcome, LedgerRepositoryError>;

    /// Removes the record whose origin is `origin`, if any.
    ///
    /// The recipient's totals are debited only when their row exists; a delete
    /// never creates a totals row.
    async fn delete_by_origin(
        &self,
        origin: &str,
    ) -> Result<Option<VoteRecord>, LedgerRepositoryError>;

    /// Looks up the record's key and inserts, revotes or reports a duplicate,
    /// all in one transaction.
    async fn apply_vote(&self, record: &VoteRecord) -> Result<ApplyOutcome, LedgerRepositoryError>;

    /// Per-message tallies, highest total first.
    async fn best_messages(&self, limit: u32) -> Result<Vec<MessageTally>, LedgerRepositoryError>;

    /// Per-message tallies, lowest total first.
    async fn worst_messages(&self, limit: u32) -> Result<Vec<MessageTally>, LedgerRepositoryError>;
}
