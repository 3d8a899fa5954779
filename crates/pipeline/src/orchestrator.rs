//! Batch orchestration.
//!
//! Partitions the digest list into fixed-size batches, fetches each batch in
//! one call, retries stragglers individually, and classifies every record.
//! Output is one row per input digest, in input order; per-digest failures
//! never abort the run.

use std::time::Duration;

use analyzer_classify::classify;
use analyzer_core::{BatchConfig, Classification, ValidatorDirectory};
use analyzer_rpc::RecordSource;

/// Drives fetch → classify over an input digest list.
pub struct Orchestrator<'a, S> {
    source: &'a S,
    directory: &'a ValidatorDirectory,
    keyword: &'a str,
    config: BatchConfig,
}

impl<'a, S: RecordSource> Orchestrator<'a, S> {
    pub fn new(
        source: &'a S,
        directory: &'a ValidatorDirectory,
        keyword: &'a str,
        config: BatchConfig,
    ) -> Self {
        Self {
            source,
            directory,
            keyword,
            config,
        }
    }

    /// Classify every digest. Returns exactly one row per digest, in input
    /// order; digests unresolved after the batch call and one individual
    /// retry become Error rows.
    pub async fn run(&self, digests: &[String]) -> Vec<Classification> {
        let batch_size = self.config.batch_size.max(1);
        let total_batches = digests.len().div_ceil(batch_size);
        let mut results = Vec::with_capacity(digests.len());

        for (index, batch) in digests.chunks(batch_size).enumerate() {
            tracing::info!("processing batch {}/{}", index + 1, total_batches);
            let mut records = self.source.fetch_many(batch).await;

            for digest in batch {
                let record = match records.remove(digest) {
                    Some(record) => Some(record),
                    // Stragglers get one individual retry before giving up.
                    None => self.source.fetch_one(digest).await,
                };
                match record {
                    Some(record) => {
                        results.push(classify(Some(&record), self.directory, self.keyword));
                    }
                    None => {
                        tracing::warn!("no record for {digest}, emitting error row");
                        results.push(Classification::unavailable());
                    }
                }
            }

            // Courtesy pause for public nodes; skipped after the last batch.
            if index + 1 < total_batches && self.config.pause_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.pause_ms)).await;
            }
        }

        results
    }
}
