//! Command-line entry point for the Sui transaction analyzer.
//!
//! Reads a table of transaction digests, enriches each digest with its
//! classification, and writes the combined report.

use std::path::PathBuf;

use analyzer_core::{AnalyzerConfig, ValidatorDirectory};
use analyzer_pipeline::{read_table, write_report, Orchestrator};
use analyzer_rpc::{load_validator_directory, RpcClient, TransactionFetcher};
use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Enrich a table of Sui transaction digests with semantic classifications.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Input table: CSV, or TSV by extension, with a header row
    input: PathBuf,

    /// Name of the column holding transaction digests
    #[arg(short, long)]
    column: String,

    /// Validator keyword that populates the target-amount column
    #[arg(short, long, default_value = "Nansen")]
    keyword: String,

    /// Output CSV path
    #[arg(short, long, default_value = "sui_unified_results.csv")]
    output: PathBuf,

    /// Digests per RPC batch
    #[arg(long)]
    batch_size: Option<usize>,

    /// Pause between batches in milliseconds
    #[arg(long)]
    pause_ms: Option<u64>,

    /// Fullnode URL (repeatable); overrides the default node list
    #[arg(long = "node")]
    nodes: Vec<String>,

    /// Skip the validator directory query; names resolve to placeholders
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = AnalyzerConfig::default();
    if !cli.nodes.is_empty() {
        config.rpc.nodes = cli.nodes.clone();
    }
    if let Some(batch_size) = cli.batch_size {
        config.batch.batch_size = batch_size;
    }
    if let Some(pause_ms) = cli.pause_ms {
        config.batch.pause_ms = pause_ms;
    }

    let table =
        read_table(&cli.input).with_context(|| format!("reading {}", cli.input.display()))?;
    let digests = table.column(&cli.column)?;
    tracing::info!("{} digests loaded from column '{}'", digests.len(), cli.column);

    let client = RpcClient::new(&config.rpc)?;
    let directory = if cli.offline {
        tracing::warn!("offline mode: validator names resolve to placeholders");
        ValidatorDirectory::new()
    } else {
        load_validator_directory(&client).await
    };

    let fetcher = TransactionFetcher::new(client);
    let orchestrator = Orchestrator::new(&fetcher, &directory, &cli.keyword, config.batch.clone());
    let results = orchestrator.run(&digests).await;

    write_report(&cli.output, &table, &results, &cli.keyword)
        .with_context(|| format!("writing {}", cli.output.display()))?;
    tracing::info!("report written to {}", cli.output.display());

    Ok(())
}
