//! Error types for the event resolver boundary.
use thiserror::Error;

/// Failures reported by the chat-protocol client.
#[derive(Debug, Error, Clone)]
pub enum ResolverError {
    #[error("Error fetching event {event_id}: {reason}")]
    Fetch { event_id: String, reason: String },
    #[error("Error marking event {event_id} read: {reason}")]
    Acknowledge { event_id: String, reason: String },
}
