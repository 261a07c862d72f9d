//! Resolver module for the karma ledger pipeline.
//!
//! Provides the `EventResolver` trait through which the pipeline reaches the
//! chat-protocol client: looking up the author and body of a voted-on event,
//! and acknowledging a handled vote event.

use crate::errors::ResolverError;

use async_trait::async_trait;
use karma_ledger_shared::types::ResolvedEvent;

/// Trait for looking up events on the chat protocol.
///
/// Implementations own their own timeout and retry policy; the pipeline
/// treats any error as "not found".
#[async_trait]
pub trait EventResolver: Send + Sync {
    /// Fetches the event `event_id` posted in `scope`.
    ///
    /// Returns `Ok(None)` when the event does not exist or is not visible.
    async fn resolve_event(
        &self,
        scope: &str,
        event_id: &str,
    ) -> Result<Option<ResolvedEvent>, ResolverError>;

    /// Marks the vote event `event_id` in `scope` as read.
    async fn mark_read(&self, scope: &str, event_id: &str) -> Result<(), ResolverError>;
}
