//! This module defines the `VoteOrchestrator` responsible for coordinating the
//! handling of a single vote request.
//! It integrates the resolver, processor, and loader components to take a vote
//! from the protocol event that cast it to the ledger.
use crate::errors::OrchestratorError;
use crate::loader::VoteLoader;
use crate::processor::VoteProcessor;
use crate::resolver::EventResolver;
use karma_ledger_shared::types::{
    ApplyOutcome, RejectionReason, RetractOutcome, VoteOutcome, VoteRequest, VoteSource,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// `VoteOrchestrator` runs the vote request state machine:
/// eligibility, vote-on-vote check, resolution, apply, acknowledge.
///
/// Requests are independent; the orchestrator holds no locks and may be
/// shared between concurrently handled events. Consistency of the ledger and
/// its totals is enforced by the repository's transactions.
pub struct VoteOrchestrator {
    pub resolver: Arc<dyn EventResolver>,
    pub processor: VoteProcessor,
    pub loader: VoteLoader,
}

impl VoteOrchestrator {
    /// Creates a new `VoteOrchestrator` instance.
    ///
    /// # Arguments
    ///
    /// * `resolver` - Client used to look up voted-on events and acknowledge votes
    /// * `processor` - Policy checks and record building
    /// * `loader` - Persistence of the resulting records
    ///
    /// # Returns
    ///
    /// A new `VoteOrchestrator` instance.
    pub fn new(
        resolver: Arc<dyn EventResolver>,
        processor: VoteProcessor,
        loader: VoteLoader,
    ) -> Self {
        Self {
            resolver,
            processor,
            loader,
        }
    }

    /// Handles one cast vote request.
    ///
    /// Rejections, duplicates and unresolvable subjects are reported as
    /// outcomes and leave the ledger untouched.
    ///
    /// # Returns
    ///
    /// * `Ok(VoteOutcome)` - What happened to the request
    /// * `Err(OrchestratorError)` - The ledger could not be read or written
    pub async fn cast_vote(&self, request: VoteRequest) -> Result<VoteOutcome, OrchestratorError> {
        if request.subject.is_empty() {
            return Ok(VoteOutcome::NotFound);
        }

        if let Some(rejection) = self.processor.screen_voter(&request) {
            debug!(voter = %request.voter, outcome = ?rejection, "Rejected vote");
            return Ok(rejection);
        }

        if self.loader.is_vote_subject(&request.subject).await? {
            debug!(voter = %request.voter, subject = %request.subject, "Rejected vote on a vote");
            return Ok(self.processor.reject(RejectionReason::VoteOnVote, &request));
        }

        let event = match self
            .resolver
            .resolve_event(&request.scope, &request.subject)
            .await
        {
            Ok(Some(event)) => event,
            Ok(None) => {
                debug!(scope = %request.scope, subject = %request.subject, "Voted-on event not found");
                return Ok(VoteOutcome::NotFound);
            }
            Err(e) => {
                warn!(error = %e, scope = %request.scope, subject = %request.subject, "Failed to resolve voted-on event");
                return Ok(VoteOutcome::NotFound);
            }
        };

        if let Some(rejection) = self.processor.screen_target(&request, &event) {
            debug!(voter = %request.voter, outcome = ?rejection, "Rejected vote");
            return Ok(rejection);
        }

        let record = self.processor.build_record(&request, &event);
        let outcome = match self.loader.apply(&record).await? {
            ApplyOutcome::Inserted(record) => VoteOutcome::Inserted(record),
            ApplyOutcome::Updated {
                record,
                previous_value,
            } => VoteOutcome::Revoted {
                record,
                previous_value,
            },
            ApplyOutcome::Duplicate(_) => {
                debug!(voter = %request.voter, subject = %request.subject, "Duplicate vote");
                return Ok(self.processor.duplicate(&request));
            }
        };

        self.acknowledge(&request).await;
        Ok(outcome)
    }

    /// Handles the deletion of a protocol event.
    ///
    /// Every deleted event is checked; an event that was not a vote yields
    /// `RetractOutcome::NotFound`.
    pub async fn retract(&self, origin: &str) -> Result<RetractOutcome, OrchestratorError> {
        let outcome = self.loader.retract(origin).await?;
        if let RetractOutcome::Retracted(record) = &outcome {
            debug!(
                recipient = %record.key.recipient,
                voter = %record.key.voter,
                origin = %origin,
                "Retracted vote"
            );
        }
        Ok(outcome)
    }

    async fn acknowledge(&self, request: &VoteRequest) {
        if request.source != VoteSource::Message {
            return;
        }
        if let Err(e) = self.resolver.mark_read(&request.scope, &request.origin).await {
            warn!(error = %e, origin = %request.origin, "Failed to acknowledge vote");
        }
    }
}
