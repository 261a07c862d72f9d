//! SQLite implementation of the karma ledger repository.
//!
//! ## Key Features
//!
//! - A shared `SqliteStore` handle injected into every repository
//! - `SqliteStore::unit_of_work` runs a closure inside one transaction and is
//!   used by every mutating operation
//! - Upserts with `ON CONFLICT DO UPDATE` for the totals cache
//! - Versioned schema with in-transaction migrations
//!
//! ## Database Tables
//!
//! - `votes`: individual vote records keyed by (recipient, voter, scope, subject)
//! - `vote_totals`: running totals per recipient
//! - `schema_version`: single-row schema generation marker
mod ledger_repository;
mod migrations;
mod rows;
mod schema_repository;
mod store;
mod totals_repository;

pub use ledger_repository::SqliteLedgerRepository;
pub use migrations::CURRENT_SCHEMA_VERSION;
pub use schema_repository::SqliteSchemaRepository;
pub use store::SqliteStore;
pub use totals_repository::{DeltaMode, SqliteTotalsRepository};

use time::OffsetDateTime;

/// Current time in milliseconds since the Unix epoch.
pub(crate) fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}
