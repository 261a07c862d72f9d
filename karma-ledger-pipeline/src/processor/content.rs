use crate::processor::StoreContent;
use karma_ledger_shared::types::EventBody;

/// Longest first line kept as-is in partial mode, in characters.
const PARTIAL_MAX_CHARS: usize = 60;
/// Characters kept when a first line is cut.
const PARTIAL_KEEP_CHARS: usize = 50;

/// Snapshot of a voted-on event to store alongside the vote.
///
/// Text bodies are stored whole in `Full` mode and reduced to their first line
/// in `Partial` mode, cut to 50 characters plus an ellipsis when the line is
/// longer than 60. Emotes are stored as `/me <body>`. Non-text events get a
/// short placeholder.
pub fn snapshot_content(body: &EventBody, mode: StoreContent) -> String {
    if mode == StoreContent::Off {
        return String::new();
    }

    match body {
        EventBody::Text(text) | EventBody::Notice(text) => shorten(text.clone(), mode),
        EventBody::Emote(text) => shorten(format!("/me {text}"), mode),
        EventBody::Media { kind, url } => format!("[{kind}]({url})"),
        EventBody::State => "a state event".to_string(),
        EventBody::Unknown => "an unknown event".to_string(),
    }
}

fn shorten(text: String, mode: StoreContent) -> String {
    if mode != StoreContent::Partial {
        return text;
    }
    let first_line = text.split('\n').next().unwrap_or_default();
    if first_line.chars().count() > PARTIAL_MAX_CHARS {
        let kept: String = first_line.chars().take(PARTIAL_KEEP_CHARS).collect();
        format!("{kept} \u{2026}")
    } else {
        first_line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(body: &str) -> EventBody {
        EventBody::Text(body.to_string())
    }

    #[test]
    fn test_off_stores_nothing() {
        assert_eq!(snapshot_content(&text("hello"), StoreContent::Off), "");
        assert_eq!(snapshot_content(&EventBody::State, StoreContent::Off), "");
    }

    #[test]
    fn test_full_keeps_every_line() {
        assert_eq!(
            snapshot_content(&text("first\nsecond"), StoreContent::Full),
            "first\nsecond"
        );
    }

    #[test]
    fn test_partial_keeps_first_line() {
        assert_eq!(
            snapshot_content(&text("first\nsecond"), StoreContent::Partial),
            "first"
        );
    }

    #[test]
    fn test_partial_truncates_long_lines() {
        let exactly_sixty = "a".repeat(60);
        assert_eq!(
            snapshot_content(&text(&exactly_sixty), StoreContent::Partial),
            exactly_sixty
        );

        let long = "b".repeat(61);
        let expected = format!("{} \u{2026}", "b".repeat(50));
        assert_eq!(snapshot_content(&text(&long), StoreContent::Partial), expected);
    }

    #[test]
    fn test_partial_counts_characters_not_bytes() {
        let long = "é".repeat(55);
        assert_eq!(snapshot_content(&text(&long), StoreContent::Partial), long);
    }

    #[test]
    fn test_emote_is_prefixed() {
        let emote = EventBody::Emote("waves".to_string());
        assert_eq!(snapshot_content(&emote, StoreContent::Full), "/me waves");
    }

    #[test]
    fn test_placeholders() {
        let media = EventBody::Media {
            kind: "an image".to_string(),
            url: "https://example.org/cat.png".to_string(),
        };
        assert_eq!(
            snapshot_content(&media, StoreContent::Partial),
            "[an image](https://example.org/cat.png)"
        );
        assert_eq!(snapshot_content(&EventBody::State, StoreContent::Full), "a state event");
        assert_eq!(snapshot_content(&EventBody::Unknown, StoreContent::Full), "an unknown event");
    }
}
