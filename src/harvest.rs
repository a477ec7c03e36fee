//! Run orchestration.
//!
//! Walks the query list strictly in order, one query at a time: enhance,
//! fetch, normalize, export a per-query file, then pause for the configured
//! inter-query delay before the next request. The delay is a fixed courtesy
//! toward the API's rate limits, not adaptive backoff. After the loop one
//! combined results file and one statistics file are written.

use crate::error::Result;
use crate::export::Exporter;
use crate::normalize::{normalize_response, ArticleRecord};
use crate::query::enhance_query;
use crate::scopus::{ScopusClient, SearchOutcome};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

/// Maximum length of the safe filename stem derived from a query
const MAX_STEM_LEN: usize = 50;

/// Configuration for one harvester run.
///
/// Explicit state passed into the orchestrator; there are no process-wide
/// globals.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// Scopus API key
    pub api_key: String,
    /// Directory all JSON files are written into
    pub output_dir: PathBuf,
    /// Results requested per query (API caps this at 25)
    pub page_size: usize,
    /// Pause between consecutive queries
    pub delay: Duration,
    /// Override for the API base URL (tests, mirrors)
    pub api_base: Option<String>,
}

impl HarvestConfig {
    /// Defaults matching production use: 25 results per query, 1 s pacing,
    /// output under `./scopus_results`.
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            output_dir: PathBuf::from("./scopus_results"),
            page_size: 25,
            delay: Duration::from_secs(1),
            api_base: None,
        }
    }
}

/// Summary statistics for one query, success or failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryStat {
    pub original_query: String,
    pub enhanced_query: String,
    pub total_results: u64,
    pub processed_results: usize,
    /// Wall-clock seconds spent on fetch + normalize + export
    pub execution_time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Per-query export file: search metadata plus the normalized records.
#[derive(Debug, Serialize)]
struct QueryExport<'a> {
    search_metadata: SearchMetadata<'a>,
    articles: &'a [ArticleRecord],
}

#[derive(Debug, Serialize)]
struct SearchMetadata<'a> {
    original_query: &'a str,
    enhanced_query: &'a str,
    total_results: u64,
    processed_results: usize,
    search_timestamp: String,
}

/// Combined export file: run metadata plus every record from every query.
#[derive(Debug, Serialize)]
struct CombinedExport<'a> {
    export_metadata: ExportMetadata,
    articles: &'a [ArticleRecord],
}

#[derive(Debug, Serialize)]
struct ExportMetadata {
    export_timestamp: String,
    total_articles: usize,
    queries_processed: usize,
}

/// Statistics export file wrapper.
#[derive(Debug, Serialize)]
struct StatsExport<'a> {
    generated_at: String,
    query_statistics: &'a [QueryStat],
}

/// Outcome of a whole run, kept in memory until flushed to disk.
#[derive(Debug)]
pub struct RunReport {
    pub articles: Vec<ArticleRecord>,
    pub stats: Vec<QueryStat>,
    pub combined_path: Option<PathBuf>,
    pub stats_path: PathBuf,
}

/// Run the harvester over `queries` in list order.
///
/// Per-query fetch failures are recorded in the statistics and the run
/// continues; filesystem errors abort the run.
pub async fn run_harvest(config: &HarvestConfig, queries: &[String]) -> Result<RunReport> {
    let client = match &config.api_base {
        Some(base) => ScopusClient::with_base_url(config.api_key.clone(), base.clone())?,
        None => ScopusClient::new(config.api_key.clone())?,
    };
    let exporter = Exporter::new(&config.output_dir)?;

    let mut all_articles: Vec<ArticleRecord> = Vec::new();
    let mut stats: Vec<QueryStat> = Vec::new();

    for (idx, original) in queries.iter().enumerate() {
        let enhanced = enhance_query(original);
        println!(
            "\n[{}/{}] Searching: '{}'",
            idx + 1,
            queries.len(),
            original
        );
        info!(original = %original, enhanced = %enhanced, "Running query");

        let started = Instant::now();

        match client.search(&enhanced, 0, config.page_size).await {
            SearchOutcome::Results(response) | SearchOutcome::Empty(response) => {
                let records = normalize_response(&response, original, &enhanced);
                let total = response.total_results();
                println!(
                    "Found {} articles for query: '{}' ({} total matches)",
                    records.len(),
                    original,
                    total
                );

                let filename = format!(
                    "{}_{}.json",
                    safe_filename(original),
                    Local::now().format("%Y%m%d")
                );
                let export = QueryExport {
                    search_metadata: SearchMetadata {
                        original_query: original,
                        enhanced_query: &enhanced,
                        total_results: total,
                        processed_results: records.len(),
                        search_timestamp: Local::now().to_rfc3339(),
                    },
                    articles: &records,
                };
                let path = exporter.export(&export, &filename)?;
                println!("Saved {} records to {}", records.len(), path.display());

                stats.push(QueryStat {
                    original_query: original.clone(),
                    enhanced_query: enhanced,
                    total_results: total,
                    processed_results: records.len(),
                    execution_time: started.elapsed().as_secs_f64(),
                    error: None,
                });
                all_articles.extend(records);

                // pacing between queries, skipped after the last one
                if idx + 1 < queries.len() {
                    tokio::time::sleep(config.delay).await;
                }
            }
            SearchOutcome::Failed(reason) => {
                println!("Query failed: '{}' ({})", original, reason);
                stats.push(QueryStat {
                    original_query: original.clone(),
                    enhanced_query: enhanced,
                    total_results: 0,
                    processed_results: 0,
                    execution_time: started.elapsed().as_secs_f64(),
                    error: Some(reason),
                });
            }
        }
    }

    let run_stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();

    let combined_path = if all_articles.is_empty() {
        None
    } else {
        let export = CombinedExport {
            export_metadata: ExportMetadata {
                export_timestamp: Local::now().to_rfc3339(),
                total_articles: all_articles.len(),
                queries_processed: stats.len(),
            },
            articles: &all_articles,
        };
        let path = exporter.export(&export, &format!("combined_results_{}.json", run_stamp))?;
        println!(
            "\nSaved {} combined records to {}",
            all_articles.len(),
            path.display()
        );
        Some(path)
    };

    let stats_export = StatsExport {
        generated_at: Local::now().to_rfc3339(),
        query_statistics: &stats,
    };
    let stats_path = exporter.export(
        &stats_export,
        &format!("search_statistics_{}.json", run_stamp),
    )?;

    print_summary(&stats);

    Ok(RunReport {
        articles: all_articles,
        stats,
        combined_path,
        stats_path,
    })
}

/// Derive a filesystem-safe filename stem from a query string.
///
/// Keeps alphanumerics, spaces, hyphens, and underscores; collapses
/// whitespace runs to single underscores; truncates to 50 characters.
pub fn safe_filename(query: &str) -> String {
    let cleaned: String = query
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-' || *c == '_')
        .collect();

    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .take(MAX_STEM_LEN)
        .collect()
}

/// The top five queries by processed-result count, descending.
///
/// Zero-result queries are excluded; ties keep original list order.
pub fn top_queries(stats: &[QueryStat]) -> Vec<&QueryStat> {
    let mut ranked: Vec<&QueryStat> = stats.iter().filter(|s| s.processed_results > 0).collect();
    ranked.sort_by_key(|s| Reverse(s.processed_results));
    ranked.into_iter().take(5).collect()
}

/// Print the end-of-run operator summary.
fn print_summary(stats: &[QueryStat]) {
    let successful = stats.iter().filter(|s| s.processed_results > 0).count();
    let total_articles: usize = stats.iter().map(|s| s.processed_results).sum();

    println!("\n=== Harvest Summary ===");
    println!("Total queries: {}", stats.len());
    println!("Queries with results: {}", successful);
    println!("Total articles found: {}", total_articles);

    let ranked = top_queries(stats);
    if !ranked.is_empty() {
        println!("Top queries:");
        for (rank, stat) in ranked.iter().enumerate() {
            println!(
                "  {}. '{}' - {} articles",
                rank + 1,
                stat.original_query,
                stat.processed_results
            );
        }
    }
}
