//! Karma Ledger Library
//!
//! This library wires the karma ledger together: configuration from the
//! environment, error handling, and construction of the repositories, the
//! vote orchestrator and the query facade on top of one SQLite store.

pub mod config;
pub mod errors;

pub use config::{Dependencies, Settings};
pub use errors::KarmaLedgerError;
