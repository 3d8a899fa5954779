//! Transaction record fetching.

use std::collections::HashMap;

use analyzer_core::TransactionRecord;
use serde_json::{json, Value};

use crate::client::RpcClient;

/// Result options requested with every transaction query; classification
/// needs events, balance changes, input (sender) and effects (gas).
fn query_options() -> Value {
    json!({
        "showEvents": true,
        "showBalanceChanges": true,
        "showInput": true,
        "showEffects": true,
    })
}

/// Source of raw transaction records, keyed by digest.
///
/// Absence is the only failure signal: a digest missing from the returned
/// map (or a `None` from `fetch_one`) means the record could not be
/// obtained. Implementations never abort a run.
#[allow(async_fn_in_trait)]
pub trait RecordSource {
    /// Fetch a batch of records; absent entries were not found.
    async fn fetch_many(&self, digests: &[String]) -> HashMap<String, TransactionRecord>;

    /// Fetch a single record.
    async fn fetch_one(&self, digest: &str) -> Option<TransactionRecord>;
}

/// Fetcher backed by the JSON-RPC client.
pub struct TransactionFetcher {
    client: RpcClient,
}

impl TransactionFetcher {
    pub fn new(client: RpcClient) -> Self {
        Self { client }
    }
}

impl RecordSource for TransactionFetcher {
    async fn fetch_many(&self, digests: &[String]) -> HashMap<String, TransactionRecord> {
        let params = json!([digests, query_options()]);
        let Some(result) = self
            .client
            .call("sui_multiGetTransactionBlocks", params)
            .await
        else {
            return HashMap::new();
        };
        let Value::Array(items) = result else {
            return HashMap::new();
        };

        let mut records = HashMap::with_capacity(items.len());
        for item in items {
            // Entries that fail to decode degrade to absence; the
            // orchestrator retries them individually.
            match serde_json::from_value::<TransactionRecord>(item) {
                Ok(record) if !record.digest.is_empty() => {
                    records.insert(record.digest.clone(), record);
                }
                Ok(_) => {}
                Err(err) => tracing::debug!("skipping undecodable batch entry: {err}"),
            }
        }
        records
    }

    async fn fetch_one(&self, digest: &str) -> Option<TransactionRecord> {
        let params = json!([digest, query_options()]);
        let result = self.client.call("sui_getTransactionBlock", params).await?;
        match serde_json::from_value(result) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::debug!("undecodable record for {digest}: {err}");
                None
            }
        }
    }
}
