//! # Karma Ledger Pipeline
//! This crate handles vote requests between the chat-protocol client and the
//! ledger storage.
//! It includes modules for resolving voted-on events, screening and shaping
//! votes, loading them into the ledger, orchestrating a request from start to
//! finish, and answering ranking queries, along with error handling.
pub mod resolver;
pub mod loader;
pub mod processor;
pub mod orchestrator;
pub mod query;

pub mod errors;
