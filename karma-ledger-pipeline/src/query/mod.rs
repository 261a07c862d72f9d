//! Read side of the ledger: totals, rankings, message lists and exports, as
//! the command layer asks for them.
use crate::errors::QueryError;
use karma_ledger_repository::{LedgerRepository, TotalsRepository};
use karma_ledger_shared::types::{Divergence, MessageTally, VoteRecord, VoteTotals};
use std::sync::Arc;
use tracing::{info, warn};

/// `LedgerQueries` answers the lookups exposed to the command layer.
///
/// Reads are advisory: two calls are not guaranteed to observe the same
/// snapshot of the ledger.
pub struct LedgerQueries {
    ledger_repository: Arc<dyn LedgerRepository>,
    totals_repository: Arc<dyn TotalsRepository>,
    show_content: bool,
}

impl LedgerQueries {
    /// Creates a new `LedgerQueries` instance.
    ///
    /// # Arguments
    ///
    /// * `ledger_repository` - Source of individual vote records
    /// * `totals_repository` - Per-recipient totals cache
    /// * `show_content` - Whether message lists carry the stored message content
    pub fn new(
        ledger_repository: Arc<dyn LedgerRepository>,
        totals_repository: Arc<dyn TotalsRepository>,
        show_content: bool,
    ) -> Self {
        Self {
            ledger_repository,
            totals_repository,
            show_content,
        }
    }

    /// Totals of `identity`, `None` if nobody ever voted on them.
    pub async fn totals(&self, identity: &str) -> Result<Option<VoteTotals>, QueryError> {
        Ok(self.totals_repository.get_totals(identity).await?)
    }

    /// 1-based position of `identity` in the descending ranking, `None` when unranked.
    pub async fn rank(&self, identity: &str) -> Result<Option<u64>, QueryError> {
        if identity.is_empty() {
            return Ok(None);
        }
        Ok(self.totals_repository.position_from_top(identity).await?)
    }

    pub async fn top(&self, limit: u32) -> Result<Vec<VoteTotals>, QueryError> {
        Ok(self.totals_repository.ranked_descending(limit).await?)
    }

    pub async fn bottom(&self, limit: u32) -> Result<Vec<VoteTotals>, QueryError> {
        Ok(self.totals_repository.ranked_ascending(limit).await?)
    }

    /// Highest scoring messages.
    pub async fn best_messages(&self, limit: u32) -> Result<Vec<MessageTally>, QueryError> {
        let tallies = self.ledger_repository.best_messages(limit).await?;
        Ok(self.visible(tallies))
    }

    /// Lowest scoring messages.
    pub async fn worst_messages(&self, limit: u32) -> Result<Vec<MessageTally>, QueryError> {
        let tallies = self.ledger_repository.worst_messages(limit).await?;
        Ok(self.visible(tallies))
    }

    /// Every vote currently recorded for `identity`.
    pub async fn export(&self, identity: &str) -> Result<Vec<VoteRecord>, QueryError> {
        Ok(self.ledger_repository.all_for(identity).await?)
    }

    /// `export` serialized as a JSON array of flat vote objects.
    pub async fn export_json(&self, identity: &str) -> Result<String, QueryError> {
        let records = self.export(identity).await?;
        Ok(serde_json::to_string(&records)?)
    }

    /// Compares the totals cache against the ledger and rebuilds every entry
    /// that disagrees.
    ///
    /// # Returns
    ///
    /// The divergences found, as they were before the repair.
    pub async fn verify_and_repair(&self) -> Result<Vec<Divergence>, QueryError> {
        let divergent = self.totals_repository.find_divergent().await?;
        for divergence in &divergent {
            warn!(
                recipient = %divergence.recipient,
                cached_total = divergence.cached.as_ref().map(|t| t.total),
                computed_total = divergence.computed.total,
                "Cached totals diverge from the ledger"
            );
            self.totals_repository
                .recalculate(&divergence.recipient)
                .await?;
        }
        if !divergent.is_empty() {
            info!(repaired = divergent.len(), "Repaired vote totals");
        }
        Ok(divergent)
    }

    fn visible(&self, tallies: Vec<MessageTally>) -> Vec<MessageTally> {
        if self.show_content {
            return tallies;
        }
        tallies
            .into_iter()
            .map(|tally| MessageTally {
                content: String::new(),
                ..tally
            })
            .collect()
    }
}
