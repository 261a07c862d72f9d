//! Settings read from the environment.

use crate::errors::KarmaLedgerError;
use karma_ledger_pipeline::processor::{ErrorReplies, StoreContent, VotePolicy};
use std::collections::HashSet;
use std::env;

/// Default SQLite database path.
const DEFAULT_DATABASE_URL: &str = "karma.db";

/// Default length of the ranking logged at startup.
const DEFAULT_TOP_LIMIT: u32 = 10;

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// SQLite database: a file path, optionally prefixed with `sqlite://`, or
    /// `:memory:`.
    pub database_url: String,
    pub policy: VotePolicy,
    pub top_limit: u32,
}

impl Settings {
    /// Reads the settings from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `DATABASE_URL`: SQLite database (default: karma.db)
    /// - `KARMA_DEMOCRACY`: treat `KARMA_FILTER` as a deny-list rather than an allow-list (default: true)
    /// - `KARMA_FILTER`: comma-separated identities
    /// - `KARMA_OPT_OUT`: comma-separated SHA-1 hashes of identities that opted out
    /// - `KARMA_STORE_CONTENT`: off, partial or full (default: partial)
    /// - `KARMA_SHOW_CONTENT`: include stored content in message lists (default: true)
    /// - `KARMA_ERRORS_FILTERED_USERS`, `KARMA_ERRORS_VOTE_ON_VOTE`,
    ///   `KARMA_ERRORS_UPVOTE_SELF`, `KARMA_ERRORS_ALREADY_VOTED`: reply on the
    ///   matching rejection (default: true)
    /// - `KARMA_TOP_LIMIT`: length of the ranking logged at startup (default: 10)
    pub fn from_env() -> Result<Self, KarmaLedgerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the settings from `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, KarmaLedgerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &'static str| -> Result<bool, KarmaLedgerError> {
            match lookup(key) {
                None => Ok(true),
                Some(value) => parse_bool(key, &value),
            }
        };

        let store_content = match lookup("KARMA_STORE_CONTENT") {
            Some(value) => value.parse::<StoreContent>()?,
            None => StoreContent::default(),
        };

        let top_limit = match lookup("KARMA_TOP_LIMIT") {
            Some(value) => value
                .trim()
                .parse::<u32>()
                .map_err(|_| KarmaLedgerError::InvalidSetting {
                    key: "KARMA_TOP_LIMIT",
                    value,
                })?,
            None => DEFAULT_TOP_LIMIT,
        };

        let policy = VotePolicy {
            democracy: flag("KARMA_DEMOCRACY")?,
            filter: parse_list(lookup("KARMA_FILTER")),
            opt_out: parse_list(lookup("KARMA_OPT_OUT"))
                .into_iter()
                .map(|hash| hash.to_ascii_lowercase())
                .collect(),
            store_content,
            show_content: flag("KARMA_SHOW_CONTENT")?,
            errors: ErrorReplies {
                filtered_users: flag("KARMA_ERRORS_FILTERED_USERS")?,
                vote_on_vote: flag("KARMA_ERRORS_VOTE_ON_VOTE")?,
                upvote_self: flag("KARMA_ERRORS_UPVOTE_SELF")?,
                already_voted: flag("KARMA_ERRORS_ALREADY_VOTED")?,
            },
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL")
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            policy,
            top_limit,
        })
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, KarmaLedgerError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(KarmaLedgerError::InvalidSetting {
            key,
            value: value.to_string(),
        }),
    }
}

fn parse_list(value: Option<String>) -> HashSet<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(vars: &[(&str, &str)]) -> Result<Settings, KarmaLedgerError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings_from(&[]).unwrap();
        assert_eq!(settings.database_url, "karma.db");
        assert_eq!(settings.top_limit, 10);
        assert_eq!(settings.policy, VotePolicy::default());
    }

    #[test]
    fn test_full_configuration() {
        let settings = settings_from(&[
            ("DATABASE_URL", "/var/lib/karma/karma.db"),
            ("KARMA_DEMOCRACY", "false"),
            ("KARMA_FILTER", "@alice:example.org, @bob:example.org,,"),
            ("KARMA_OPT_OUT", "A9993E364706816ABA3E25717850C26C9CD0D89D"),
            ("KARMA_STORE_CONTENT", "full"),
            ("KARMA_SHOW_CONTENT", "no"),
            ("KARMA_ERRORS_VOTE_ON_VOTE", "0"),
            ("KARMA_TOP_LIMIT", "25"),
        ])
        .unwrap();

        assert_eq!(settings.database_url, "/var/lib/karma/karma.db");
        assert_eq!(settings.top_limit, 25);

        let policy = &settings.policy;
        assert!(!policy.democracy);
        assert_eq!(
            policy.filter,
            HashSet::from(["@alice:example.org".to_string(), "@bob:example.org".to_string()])
        );
        assert!(policy.opt_out.contains("a9993e364706816aba3e25717850c26c9cd0d89d"));
        assert_eq!(policy.store_content, StoreContent::Full);
        assert!(!policy.show_content);
        assert!(!policy.errors.vote_on_vote);
        assert!(policy.errors.filtered_users);
        assert!(policy.errors.already_voted);
    }

    #[test]
    fn test_store_content_boolean_aliases() {
        let off = settings_from(&[("KARMA_STORE_CONTENT", "false")]).unwrap();
        assert_eq!(off.policy.store_content, StoreContent::Off);
        let full = settings_from(&[("KARMA_STORE_CONTENT", "true")]).unwrap();
        assert_eq!(full.policy.store_content, StoreContent::Full);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(matches!(
            settings_from(&[("KARMA_DEMOCRACY", "maybe")]),
            Err(KarmaLedgerError::InvalidSetting {
                key: "KARMA_DEMOCRACY",
                ..
            })
        ));
        assert!(matches!(
            settings_from(&[("KARMA_STORE_CONTENT", "some")]),
            Err(KarmaLedgerError::Processor(_))
        ));
        assert!(matches!(
            settings_from(&[("KARMA_TOP_LIMIT", "-3")]),
            Err(KarmaLedgerError::InvalidSetting {
                key: "KARMA_TOP_LIMIT",
                ..
            })
        ));
    }
}
