use serde::{Deserialize, Serialize};

use crate::types::TallyDelta;

/// Identity of a single vote.
///
/// At most one `VoteRecord` exists per key: a voter has one standing vote per
/// subject and scope, on behalf of the subject's author.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoteKey {
    /// Identity the vote accumulates for. Empty when the author opted out.
    pub recipient: String,
    pub voter: String,
    /// Room or channel the vote was cast in.
    pub scope: String,
    /// Event id of the voted-on message.
    pub subject: String,
}

impl VoteKey {
    pub fn new(
        recipient: impl Into<String>,
        voter: impl Into<String>,
        scope: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            recipient: recipient.into(),
            voter: voter.into(),
            scope: scope.into(),
            subject: subject.into(),
        }
    }
}

/// A stored vote.
///
/// Serializes flat, so an export is a plain list of
/// `{recipient, voter, scope, subject, origin, timestamp, value, content}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    #[serde(flatten)]
    pub key: VoteKey,
    /// Event id of the vote itself. Retracting this event deletes the record.
    pub origin: String,
    /// Milliseconds since the Unix epoch, refreshed on every write.
    pub timestamp: i64,
    pub value: i64,
    /// Snapshot of the voted-on message. Empty when not stored.
    pub content: String,
}

impl VoteRecord {
    /// Creates an unsaved record. The timestamp is assigned when it is written.
    pub fn new(key: VoteKey, origin: impl Into<String>, value: i64, content: impl Into<String>) -> Self {
        Self {
            key,
            origin: origin.into(),
            timestamp: 0,
            value,
            content: content.into(),
        }
    }

    pub fn recipient(&self) -> &str {
        &self.key.recipient
    }

    /// What this record adds to its recipient's totals.
    pub fn contribution(&self) -> TallyDelta {
        TallyDelta::of_value(self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record() -> VoteRecord {
        VoteRecord {
            key: VoteKey::new("@alice:example.org", "@bob:example.org", "!room:example.org", "$msg"),
            origin: "$vote".to_string(),
            timestamp: 1_713_859_200_000,
            value: -1,
            content: "hello\nworld".to_string(),
        }
    }

    #[test]
    fn test_record_serializes_flat() {
        let json = serde_json::to_value(make_record()).unwrap();
        assert_eq!(json["recipient"], "@alice:example.org");
        assert_eq!(json["voter"], "@bob:example.org");
        assert_eq!(json["scope"], "!room:example.org");
        assert_eq!(json["subject"], "$msg");
        assert_eq!(json["origin"], "$vote");
        assert_eq!(json["timestamp"], 1_713_859_200_000i64);
        assert_eq!(json["value"], -1);
        assert!(json.get("key").is_none());
    }

    #[test]
    fn test_record_json_is_lossless() {
        let record = make_record();
        let json = serde_json::to_string(&record).unwrap();
        let decoded: VoteRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_new_record_has_no_timestamp() {
        let record = VoteRecord::new(VoteKey::new("a", "b", "c", "d"), "e", 1, "");
        assert_eq!(record.timestamp, 0);
        assert_eq!(record.recipient(), "a");
        assert_eq!(record.contribution(), TallyDelta::of_value(1));
    }
}
