//! Transaction classification for the Sui analyzer.
//!
//! This crate holds the deterministic core: given one fetched transaction
//! record, a validator directory, and a target keyword, decide the semantic
//! kind, principal amount and asset, counterparty, and the
//! keyword-conditioned target amount. No I/O, no shared state.

pub mod classifier;
pub mod events;

pub use classifier::classify;
