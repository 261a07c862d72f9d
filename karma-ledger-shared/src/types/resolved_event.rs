use serde::{Deserialize, Serialize};

/// Content of a resolved event, as far as the ledger cares about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventBody {
    Text(String),
    Notice(String),
    Emote(String),
    /// A file, image, video or audio message.
    Media { kind: String, url: String },
    State,
    Unknown,
}

/// A voted-on event looked up through the protocol client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedEvent {
    pub event_id: String,
    /// Author of the event; becomes the vote recipient.
    pub sender: String,
    pub body: EventBody,
}
