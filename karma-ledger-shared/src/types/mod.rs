mod message_tally;
mod outcome;
mod resolved_event;
mod vote_record;
mod vote_request;
mod vote_totals;

pub use message_tally::MessageTally;
pub use outcome::{ApplyOutcome, RejectionReason, RetractOutcome, UpdateOutcome, VoteOutcome};
pub use resolved_event::{EventBody, ResolvedEvent};
pub use vote_record::{VoteKey, VoteRecord};
pub use vote_request::{VoteRequest, VoteSource};
pub use vote_totals::{Divergence, TallyDelta, VoteTotals};
