use crate::errors::ProcessorError;
use sha1::{Digest, Sha1};
use std::collections::HashSet;
use std::str::FromStr;

/// How much of a voted-on message is kept with the vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreContent {
    Off,
    /// First line only, shortened when long.
    #[default]
    Partial,
    Full,
}

impl FromStr for StoreContent {
    type Err = ProcessorError;

    /// Accepts `off`, `partial` and `full`, plus `true`/`false` as aliases of
    /// `full`/`off`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "off" | "false" => Ok(StoreContent::Off),
            "partial" => Ok(StoreContent::Partial),
            "full" | "true" => Ok(StoreContent::Full),
            _ => Err(ProcessorError::InvalidStoreContent(value.to_string())),
        }
    }
}

/// Which rejections are answered with a reply to the voter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorReplies {
    pub filtered_users: bool,
    pub vote_on_vote: bool,
    pub upvote_self: bool,
    pub already_voted: bool,
}

impl Default for ErrorReplies {
    fn default() -> Self {
        Self {
            filtered_users: true,
            vote_on_vote: true,
            upvote_self: true,
            already_voted: true,
        }
    }
}

/// Voting rules applied before a vote reaches the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VotePolicy {
    /// When set, `filter` lists identities that may not vote. When unset, it
    /// lists the only identities that may.
    pub democracy: bool,
    pub filter: HashSet<String>,
    /// Lowercase hex SHA-1 hashes of identities that opted out.
    pub opt_out: HashSet<String>,
    pub store_content: StoreContent,
    pub show_content: bool,
    pub errors: ErrorReplies,
}

impl Default for VotePolicy {
    fn default() -> Self {
        Self {
            democracy: true,
            filter: HashSet::new(),
            opt_out: HashSet::new(),
            store_content: StoreContent::default(),
            show_content: true,
            errors: ErrorReplies::default(),
        }
    }
}

impl VotePolicy {
    /// Whether the filter keeps `voter` from voting.
    pub fn is_filtered(&self, voter: &str) -> bool {
        self.democracy == self.filter.contains(voter)
    }

    /// Whether `identity` opted out of the karma system.
    pub fn has_opted_out(&self, identity: &str) -> bool {
        !self.opt_out.is_empty() && self.opt_out.contains(&identity_hash(identity))
    }
}

/// Lowercase hex SHA-1 of an identity, the form used in opt-out lists.
pub fn identity_hash(identity: &str) -> String {
    hex::encode(Sha1::digest(identity.as_bytes()))
}
