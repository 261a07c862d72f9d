//! # Karma Ledger Repository
//! This crate provides traits and implementations for the durable side of the
//! karma ledger: individual vote records, the per-recipient totals derived from
//! them, and the schema version marker. It includes definitions for errors,
//! interfaces, and a concrete implementation for SQLite.
pub mod errors;
pub mod interfaces;
pub mod sqlite;

pub use errors::LedgerRepositoryError;
pub use interfaces::{LedgerRepository, SchemaRepository, SchemaStatus, TotalsRepository};
pub use sqlite::{
    CURRENT_SCHEMA_VERSION, DeltaMode, SqliteLedgerRepository, SqliteSchemaRepository,
    SqliteStore, SqliteTotalsRepository,
};
