//! # Karma Ledger Shared
//! This crate defines the data structures shared across the karma ledger crates.
//! It includes vote records and their identity keys, per-recipient totals and
//! tally deltas, incoming vote requests, resolved events and request outcomes.
pub mod types;
