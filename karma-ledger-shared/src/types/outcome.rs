use serde::{Deserialize, Serialize};

use crate::types::VoteRecord;

/// Why a vote request was turned down before touching the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionReason {
    /// The voter is excluded by the filter policy.
    FilteredVoter,
    /// The voter opted out of the karma system.
    OptedOutVoter,
    /// The voter tried to upvote their own message.
    SelfUpvote,
    /// The subject is itself a vote.
    VoteOnVote,
}

impl RejectionReason {
    /// Reply text for the voter when rejections are configured to be visible.
    pub fn message(&self) -> &'static str {
        match self {
            RejectionReason::FilteredVoter | RejectionReason::OptedOutVoter => {
                "Sorry, you're not allowed to give karma."
            }
            RejectionReason::SelfUpvote => "Hey! You can't upvote yourself!",
            RejectionReason::VoteOnVote => "Sorry, you can't vote on votes.",
        }
    }
}

/// Result of a cast vote request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteOutcome {
    /// A new vote was recorded.
    Inserted(VoteRecord),
    /// An existing vote changed its value.
    Revoted {
        record: VoteRecord,
        previous_value: i64,
    },
    /// The voter already cast this exact vote. Nothing changed.
    Duplicate { notify: bool },
    /// The request was refused by policy. Nothing changed.
    Rejected {
        reason: RejectionReason,
        notify: bool,
    },
    /// The voted-on event could not be resolved. Nothing changed.
    NotFound,
}

impl VoteOutcome {
    pub const ALREADY_VOTED: &'static str = "You already voted on that message.";

    /// Whether the ledger was modified.
    pub fn is_applied(&self) -> bool {
        matches!(self, VoteOutcome::Inserted(_) | VoteOutcome::Revoted { .. })
    }

    /// Text to send back to the voter, if any.
    pub fn reply(&self) -> Option<&'static str> {
        match self {
            VoteOutcome::Duplicate { notify: true } => Some(Self::ALREADY_VOTED),
            VoteOutcome::Rejected {
                reason,
                notify: true,
            } => Some(reason.message()),
            _ => None,
        }
    }
}

/// Result of applying a vote record to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    Inserted(VoteRecord),
    Updated {
        record: VoteRecord,
        previous_value: i64,
    },
    /// A record with the same key and value already exists; returned as stored.
    Duplicate(VoteRecord),
}

/// Result of changing the value of a stored vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated {
        record: VoteRecord,
        previous_value: i64,
    },
    /// The stored value already equals the new one.
    Duplicate,
    /// The record no longer exists.
    Missing,
}

/// Result of retracting a vote event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetractOutcome {
    /// The vote recorded by the event was removed.
    Retracted(VoteRecord),
    /// The event did not correspond to a stored vote.
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_only_when_notifying() {
        let silent = VoteOutcome::Rejected {
            reason: RejectionReason::VoteOnVote,
            notify: false,
        };
        assert_eq!(silent.reply(), None);

        let loud = VoteOutcome::Rejected {
            reason: RejectionReason::VoteOnVote,
            notify: true,
        };
        assert_eq!(loud.reply(), Some("Sorry, you can't vote on votes."));

        let duplicate = VoteOutcome::Duplicate { notify: true };
        assert_eq!(duplicate.reply(), Some(VoteOutcome::ALREADY_VOTED));
        assert!(!duplicate.is_applied());
        assert_eq!(VoteOutcome::NotFound.reply(), None);
    }
}
