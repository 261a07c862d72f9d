use serde::{Deserialize, Serialize};

/// Aggregated votes on a single message, for best/worst message lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTally {
    pub scope: String,
    pub subject: String,
    pub author: String,
    pub total: i64,
    pub positive: i64,
    pub negative: i64,
    /// Stored snapshot of the message, empty when unavailable or hidden.
    pub content: String,
}
