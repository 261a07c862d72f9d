use serde::{Deserialize, Serialize};

/// How a vote reached the ledger.
///
/// Only message-sourced votes can be replied to or marked read; reaction
/// votes are handled silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteSource {
    /// A textual vote such as `+1` sent as a reply, or an explicit command.
    Message,
    /// An emoji reaction on the voted-on message.
    Reaction,
}

/// A request to cast a vote, as delivered by the protocol layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRequest {
    /// Event id of the voted-on message.
    pub subject: String,
    pub value: i64,
    pub voter: String,
    pub scope: String,
    /// Event id of the vote itself.
    pub origin: String,
    pub source: VoteSource,
}

impl VoteRequest {
    pub fn upvote(
        subject: impl Into<String>,
        voter: impl Into<String>,
        scope: impl Into<String>,
        origin: impl Into<String>,
    ) -> Self {
        Self::with_value(subject, 1, voter, scope, origin)
    }

    pub fn downvote(
        subject: impl Into<String>,
        voter: impl Into<String>,
        scope: impl Into<String>,
        origin: impl Into<String>,
    ) -> Self {
        Self::with_value(subject, -1, voter, scope, origin)
    }

    fn with_value(
        subject: impl Into<String>,
        value: i64,
        voter: impl Into<String>,
        scope: impl Into<String>,
        origin: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            value,
            voter: voter.into(),
            scope: scope.into(),
            origin: origin.into(),
            source: VoteSource::Message,
        }
    }

    /// Marks the request as coming from a reaction.
    pub fn from_reaction(mut self) -> Self {
        self.source = VoteSource::Reaction;
        self
    }
}
