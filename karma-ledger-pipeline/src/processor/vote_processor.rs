use crate::processor::{VotePolicy, snapshot_content};
use karma_ledger_shared::types::{
    RejectionReason, ResolvedEvent, VoteKey, VoteOutcome, VoteRecord, VoteRequest, VoteSource,
};

/// `VoteProcessor` applies the voting policy to incoming requests and builds
/// the ledger records for the ones that pass.
///
/// It never touches storage. The checks that need the ledger or the protocol
/// client are sequenced by the orchestrator.
pub struct VoteProcessor {
    policy: VotePolicy,
}

impl VoteProcessor {
    /// Creates a new `VoteProcessor` enforcing `policy`.
    pub fn new(policy: VotePolicy) -> Self {
        Self { policy }
    }

    /// Eligibility check on the voter alone.
    ///
    /// # Returns
    ///
    /// `Some(VoteOutcome::Rejected)` if the filter excludes the voter or the
    /// voter opted out, `None` if the request may proceed.
    pub fn screen_voter(&self, request: &VoteRequest) -> Option<VoteOutcome> {
        if self.policy.is_filtered(&request.voter) {
            return Some(self.reject(RejectionReason::FilteredVoter, request));
        }
        if self.policy.has_opted_out(&request.voter) {
            return Some(self.reject(RejectionReason::OptedOutVoter, request));
        }
        None
    }

    /// Checks that need the resolved subject: nobody upvotes themselves.
    ///
    /// Downvoting one's own message is allowed.
    pub fn screen_target(&self, request: &VoteRequest, event: &ResolvedEvent) -> Option<VoteOutcome> {
        if request.value > 0 && event.sender == request.voter {
            return Some(self.reject(RejectionReason::SelfUpvote, request));
        }
        None
    }

    /// Builds a rejection outcome for `reason`, replying only to message votes
    /// and only when the matching reply toggle is on.
    pub fn reject(&self, reason: RejectionReason, request: &VoteRequest) -> VoteOutcome {
        let errors = &self.policy.errors;
        let enabled = match reason {
            RejectionReason::FilteredVoter | RejectionReason::OptedOutVoter => errors.filtered_users,
            RejectionReason::VoteOnVote => errors.vote_on_vote,
            RejectionReason::SelfUpvote => errors.upvote_self,
        };
        VoteOutcome::Rejected {
            reason,
            notify: enabled && request.source == VoteSource::Message,
        }
    }

    /// Outcome for a vote identical to the stored one.
    pub fn duplicate(&self, request: &VoteRequest) -> VoteOutcome {
        VoteOutcome::Duplicate {
            notify: self.policy.errors.already_voted && request.source == VoteSource::Message,
        }
    }

    /// Builds the ledger record for `request` against the resolved `event`.
    ///
    /// Votes on the messages of opted-out authors are stored anonymised: an
    /// empty recipient and no content.
    pub fn build_record(&self, request: &VoteRequest, event: &ResolvedEvent) -> VoteRecord {
        let anonymise = self.policy.has_opted_out(&event.sender);
        let (recipient, content) = if anonymise {
            (String::new(), String::new())
        } else {
            (
                event.sender.clone(),
                snapshot_content(&event.body, self.policy.store_content),
            )
        };

        VoteRecord::new(
            VoteKey::new(
                recipient,
                request.voter.clone(),
                request.scope.clone(),
                event.event_id.clone(),
            ),
            request.origin.clone(),
            request.value,
            content,
        )
    }
}
