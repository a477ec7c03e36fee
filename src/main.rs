//! rustscopus - Scopus Literature-Search Harvester
//!
//! Queries the Elsevier Scopus Search API for a batch of topical queries,
//! normalizes the results into flat article records, and writes per-query,
//! combined, and statistics JSON files.
//!
//! ## Usage
//!
//! ```bash
//! export SCOPUS_API_KEY=...
//! rustscopus "research software citation" "CITATION.cff" --output ./scopus_results
//! rustscopus --queries-file queries.txt
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use rustscopus::harvest::{run_harvest, HarvestConfig};
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

/// Scopus Literature-Search Harvester
#[derive(Parser)]
#[command(name = "rustscopus")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Search queries (free text or pre-scoped Scopus expressions)
    queries: Vec<String>,

    /// File with one query per line ('#' comments and blank lines ignored)
    #[arg(long)]
    queries_file: Option<PathBuf>,

    /// Output directory for JSON files
    #[arg(short, long, default_value = "./scopus_results")]
    output: PathBuf,

    /// Results per query (Scopus caps this at 25)
    #[arg(long, default_value = "25")]
    count: usize,

    /// Seconds to pause between queries
    #[arg(long, default_value = "1")]
    delay_secs: u64,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .init();

    // Missing key is fatal before any query runs
    let api_key = std::env::var("SCOPUS_API_KEY")
        .context("SCOPUS_API_KEY environment variable is required")?;

    let mut queries = cli.queries;
    if let Some(path) = &cli.queries_file {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read queries file {:?}", path))?;
        queries.extend(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(String::from),
        );
    }

    if queries.is_empty() {
        anyhow::bail!("No queries given; pass them as arguments or via --queries-file");
    }

    let config = HarvestConfig {
        api_key,
        output_dir: cli.output,
        page_size: cli.count,
        delay: Duration::from_secs(cli.delay_secs),
        api_base: None,
    };

    println!("Harvesting {} queries into {}", queries.len(), config.output_dir.display());

    run_harvest(&config, &queries).await?;

    Ok(())
}
