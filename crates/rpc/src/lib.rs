//! Remote ledger access for the Sui transaction analyzer.
//!
//! This crate handles:
//! - JSON-RPC calls with ordered node-list failover
//! - Transaction record fetching (batch and single)
//! - Validator directory loading

pub mod client;
pub mod directory;
pub mod fetcher;

pub use client::RpcClient;
pub use directory::load_validator_directory;
pub use fetcher::{RecordSource, TransactionFetcher};
