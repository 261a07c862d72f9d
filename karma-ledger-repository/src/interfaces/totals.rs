//! This module defines the `TotalsRepository` trait, the read and repair side
//! of the per-recipient aggregate cache.
use crate::errors::LedgerRepositoryError;
use karma_ledger_shared::types::{Divergence, VoteTotals};

/// A trait that defines the interface for the cached per-recipient totals.
///
/// Totals are a projection of the ledger with no authority of their own.
/// Writes happen through the ledger's mutations; this trait only reads them
/// and rebuilds them from the ledger when they drift.
#[async_trait::async_trait]
pub trait TotalsRepository: Send + Sync {
    /// Cached totals for `recipient`, `None` if nobody ever voted on them.
    async fn get_totals(&self, recipient: &str) -> Result<Option<VoteTotals>, LedgerRepositoryError>;

    /// Up to `limit` recipients, highest total first.
    async fn ranked_descending(&self, limit: u32) -> Result<Vec<VoteTotals>, LedgerRepositoryError>;

    /// Up to `limit` recipients, lowest total first.
    async fn ranked_ascending(&self, limit: u32) -> Result<Vec<VoteTotals>, LedgerRepositoryError>;

    /// 1-based position of `recipient` in the descending ranking.
    ///
    /// Returns `None` when the recipient has no totals. Implementations may scan
    /// the ranking linearly.
    async fn position_from_top(&self, recipient: &str) -> Result<Option<u64>, LedgerRepositoryError>;

    /// Recomputes the totals of `recipient` from the ledger and overwrites the cache.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(VoteTotals))` - The rebuilt totals
    /// * `Ok(None)` - The recipient has neither votes nor a totals row
    async fn recalculate(&self, recipient: &str) -> Result<Option<VoteTotals>, LedgerRepositoryError>;

    /// Lists every recipient whose cached totals disagree with the ledger.
    async fn find_divergent(&self) -> Result<Vec<Divergence>, LedgerRepositoryError>;
}
