//! JSON-RPC client with node-list failover.
//!
//! Every call tries the configured fullnodes in order and returns the first
//! well-formed `result` payload. Per-node failures are skipped; only total
//! exhaustion is visible to the caller, as an absence.

use std::time::Duration;

use analyzer_core::{Error, Result, RpcConfig};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error as ThisError;

/// Request header advertised to public fullnodes, some of which reject
/// clients without a browser user agent.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// Why a single node was skipped. Never surfaced to callers; logged at debug
/// and the next candidate is tried.
#[derive(Debug, ThisError)]
enum NodeError {
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("status {0}")]
    Status(reqwest::StatusCode),
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("no result in RPC response")]
    MissingResult,
}

/// JSON-RPC client that tries an ordered list of equivalent fullnodes.
pub struct RpcClient {
    http: reqwest::Client,
    nodes: Vec<String>,
}

impl RpcClient {
    /// Build a client from endpoint configuration.
    pub fn new(config: &RpcConfig) -> Result<Self> {
        if config.nodes.is_empty() {
            return Err(Error::config("no RPC nodes configured"));
        }
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| Error::rpc(e.to_string()))?;
        Ok(Self {
            http,
            nodes: config.nodes.clone(),
        })
    }

    /// Call `method` against each node in order and return the first
    /// well-formed `result` payload.
    ///
    /// `None` means every node was exhausted; individual failures are not
    /// distinguished.
    pub async fn call(&self, method: &str, params: Value) -> Option<Value> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };
        for node in &self.nodes {
            match self.call_node(node, &request).await {
                Ok(result) => return Some(result),
                Err(err) => {
                    tracing::debug!("node {node} failed for {method}: {err}");
                }
            }
        }
        tracing::warn!("all {} nodes exhausted for {method}", self.nodes.len());
        None
    }

    async fn call_node(
        &self,
        node: &str,
        request: &RpcRequest<'_>,
    ) -> std::result::Result<Value, NodeError> {
        let response = self.http.post(node).json(request).send().await?;
        if !response.status().is_success() {
            return Err(NodeError::Status(response.status()));
        }
        let body: RpcResponse = response.json().await?;
        if let Some(err) = body.error {
            return Err(NodeError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        body.result.ok_or(NodeError::MissingResult)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_envelope_shape() {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method: "sui_getTransactionBlock",
            params: json!(["digest"]),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["method"], "sui_getTransactionBlock");
        assert_eq!(value["params"], json!(["digest"]));
    }

    #[test]
    fn test_response_with_error_body() {
        let body: RpcResponse = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": -32602, "message": "Invalid params"}
        }))
        .unwrap();
        assert!(body.result.is_none());
        let err = body.error.unwrap();
        assert_eq!(err.code, -32602);
        assert_eq!(err.message, "Invalid params");
    }

    #[test]
    fn test_client_rejects_empty_node_list() {
        let config = RpcConfig {
            nodes: Vec::new(),
            request_timeout_secs: 15,
        };
        assert!(RpcClient::new(&config).is_err());
    }
}
