//! Configuration structures for the analyzer.

use serde::{Deserialize, Serialize};

/// Mainnet fullnodes tried in order; any subset may be unreachable.
pub const DEFAULT_RPC_NODES: &[&str] = &[
    "https://fullnode.mainnet.sui.io:443",
    "https://sui-rpc.publicnode.com",
    "https://sui-mainnet.nodeinfra.com:443",
    "https://mainnet.sui.rpcpool.com:443",
    "https://rpc.mainnet.sui.io:443",
];

/// Main configuration for an analysis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// RPC endpoint configuration.
    pub rpc: RpcConfig,
    /// Batch orchestration configuration.
    pub batch: BatchConfig,
}

/// RPC endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcConfig {
    /// Candidate fullnode URLs, tried in order for every call.
    pub nodes: Vec<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            nodes: DEFAULT_RPC_NODES.iter().map(|s| s.to_string()).collect(),
            request_timeout_secs: 15,
        }
    }
}

/// Batch orchestration configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Digests per multi-get call.
    pub batch_size: usize,
    /// Pause between consecutive batches (ms). Rate-limiting courtesy for
    /// public nodes; zero disables the pause.
    pub pause_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            pause_ms: 1000,
        }
    }
}
