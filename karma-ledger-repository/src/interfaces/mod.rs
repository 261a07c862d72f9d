//! This module defines and re-exports the interfaces for the ledger repository.
//! It serves as a central point for accessing traits related to data interaction.
mod ledger;
mod schema;
mod totals;

pub use ledger::LedgerRepository;
pub use schema::{SchemaRepository, SchemaStatus};
pub use totals::TotalsRepository;
