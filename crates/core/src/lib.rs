//! Core types and configuration for the Sui transaction analyzer.
//!
//! This crate provides shared types used across all other crates:
//! - Wire-facing transaction record types (effects, events, balance changes)
//! - Classification output types
//! - Configuration structures
//! - Common error types
//! - The validator directory

pub mod config;
pub mod error;
pub mod types;
pub mod validators;

pub use config::{AnalyzerConfig, BatchConfig, RpcConfig};
pub use error::{Error, Result};
pub use types::*;
pub use validators::ValidatorDirectory;
