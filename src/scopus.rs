//! Scopus Search API client.
//!
//! Issues one synchronous GET per query against the Elsevier Scopus Search
//! endpoint and deserializes the response. Failures are folded into an
//! explicit [`SearchOutcome`] so the orchestrator can treat a failed query as
//! "zero results" without sentinel values.
//!
//! API details:
//! - Endpoint: GET /content/search/scopus
//! - Max 25 results per page (API cap)
//! - Authentication: `apiKey` query parameter

use crate::error::{HarvestError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Scopus Search API base URL
const SCOPUS_API_BASE: &str = "https://api.elsevier.com/content/search/scopus";

/// Maximum results per page (Scopus limit)
pub const MAX_PAGE_SIZE: usize = 25;

/// Response fields requested from the API
const FIELD_LIST: &str = "dc:title,dc:creator,prism:publicationName,prism:coverDate,\
prism:doi,dc:description,citedby-count,authkeywords,dc:identifier";

/// Outcome of a single search request.
///
/// Distinguishes success-with-data, success-with-empty, and
/// failure-with-reason so callers never branch on a null sentinel.
#[derive(Debug)]
pub enum SearchOutcome {
    /// The API returned at least one entry
    Results(SearchResponse),
    /// The API answered but the results path is absent or empty
    Empty(SearchResponse),
    /// Transport, HTTP, or decode failure; the reason is operator-facing
    Failed(String),
}

/// Top-level Scopus search response
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "search-results")]
    pub search_results: Option<SearchResults>,
}

impl SearchResponse {
    /// Entries at the nested results path, empty when the path is absent.
    pub fn entries(&self) -> &[Entry] {
        self.search_results
            .as_ref()
            .and_then(|r| r.entry.as_deref())
            .unwrap_or_default()
    }

    /// Total result count reported by the API (string field), default 0.
    pub fn total_results(&self) -> u64 {
        self.search_results
            .as_ref()
            .and_then(|r| r.total_results.as_deref())
            .and_then(|t| t.parse().ok())
            .unwrap_or(0)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchResults {
    #[serde(rename = "opensearch:totalResults")]
    pub total_results: Option<String>,
    pub entry: Option<Vec<Entry>>,
}

/// One article entry in a Scopus result payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Entry {
    #[serde(rename = "dc:title")]
    pub title: Option<String>,
    #[serde(rename = "dc:creator")]
    pub creator: Option<String>,
    #[serde(rename = "prism:publicationName")]
    pub publication_name: Option<String>,
    #[serde(rename = "prism:coverDate")]
    pub cover_date: Option<String>,
    #[serde(rename = "prism:doi")]
    pub doi: Option<String>,
    #[serde(rename = "dc:description")]
    pub description: Option<String>,
    #[serde(rename = "citedby-count")]
    pub citedby_count: Option<String>,
    #[serde(rename = "authkeywords")]
    pub keywords: Option<String>,
    #[serde(rename = "dc:identifier")]
    pub identifier: Option<String>,
}

/// Scopus Search API client
pub struct ScopusClient {
    api_key: String,
    base_url: String,
    client: Client,
}

impl ScopusClient {
    /// Create a new client authenticating with the given API key.
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base_url(api_key, SCOPUS_API_BASE.to_string())
    }

    /// Create a client against a non-default base URL (tests, mirrors).
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| HarvestError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            base_url,
            client,
        })
    }

    /// Search Scopus for one page of results.
    ///
    /// `count` is clamped to the API cap of 25. Transport and HTTP errors are
    /// reported and folded into [`SearchOutcome::Failed`]; they never abort
    /// the run.
    pub async fn search(&self, query: &str, start: usize, count: usize) -> SearchOutcome {
        match self.try_search(query, start, count).await {
            Ok(response) => {
                if response.entries().is_empty() {
                    SearchOutcome::Empty(response)
                } else {
                    SearchOutcome::Results(response)
                }
            }
            Err(e) => {
                warn!(query = query, error = %e, "Scopus request failed");
                SearchOutcome::Failed(e.to_string())
            }
        }
    }

    async fn try_search(&self, query: &str, start: usize, count: usize) -> Result<SearchResponse> {
        let count = count.min(MAX_PAGE_SIZE);

        debug!(query = query, start = start, count = count, "Querying Scopus");

        let count_param = count.to_string();
        let start_param = start.to_string();
        let params = [
            ("query", query),
            ("apiKey", self.api_key.as_str()),
            ("count", count_param.as_str()),
            ("start", start_param.as_str()),
            ("sort", "-coverDate"),
            ("field", FIELD_LIST),
        ];

        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::Api {
                code: status.as_u16() as i32,
                message: format!("Scopus API error: {}", status),
            });
        }

        Ok(response.json::<SearchResponse>().await?)
    }
}
