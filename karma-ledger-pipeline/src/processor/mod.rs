//! Processor module: turns a vote request plus the resolved subject into a
//! ledger record, applying the configured voting policy on the way.
mod content;
mod policy;
mod vote_processor;

pub use content::snapshot_content;
pub use policy::{ErrorReplies, StoreContent, VotePolicy, identity_hash};
pub use vote_processor::VoteProcessor;
