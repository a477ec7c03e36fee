//! Result normalization.
//!
//! Maps a Scopus response document into flat [`ArticleRecord`]s with fixed
//! placeholder values for absent fields, stamped with the query pair and the
//! normalization timestamp for traceability.

use crate::scopus::{Entry, SearchResponse};
use chrono::Local;
use serde::{Deserialize, Serialize};

/// Flat article metadata record, one per API result entry.
///
/// Immutable after creation; only ever aggregated into larger collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub original_query: String,
    pub enhanced_query: String,
    pub title: String,
    pub creator: String,
    pub publication_name: String,
    pub cover_date: String,
    pub doi: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub cited_by_count: i64,
    pub keywords: String,
    pub scopus_id: String,
    pub search_timestamp: String,
}

/// Normalize a parsed Scopus response into article records.
///
/// Returns one record per entry at the nested results path, in response
/// order; an absent path yields an empty list, not an error.
pub fn normalize_response(
    response: &SearchResponse,
    original_query: &str,
    enhanced_query: &str,
) -> Vec<ArticleRecord> {
    response
        .entries()
        .iter()
        .map(|entry| normalize_entry(entry, original_query, enhanced_query))
        .collect()
}

fn normalize_entry(entry: &Entry, original_query: &str, enhanced_query: &str) -> ArticleRecord {
    ArticleRecord {
        original_query: original_query.to_string(),
        enhanced_query: enhanced_query.to_string(),
        title: entry.title.clone().unwrap_or_else(|| "No Title".to_string()),
        creator: entry
            .creator
            .clone()
            .unwrap_or_else(|| "No Creator".to_string()),
        publication_name: entry
            .publication_name
            .clone()
            .unwrap_or_else(|| "No Publication Name".to_string()),
        cover_date: entry
            .cover_date
            .clone()
            .unwrap_or_else(|| "No Date".to_string()),
        doi: entry.doi.clone().unwrap_or_else(|| "No DOI".to_string()),
        abstract_text: entry
            .description
            .clone()
            .unwrap_or_else(|| "No abstract".to_string()),
        cited_by_count: entry
            .citedby_count
            .as_deref()
            .and_then(|c| c.parse().ok())
            .unwrap_or(0),
        keywords: entry
            .keywords
            .clone()
            .unwrap_or_else(|| "No keywords".to_string()),
        scopus_id: extract_scopus_id(entry.identifier.as_deref()),
        search_timestamp: Local::now().to_rfc3339(),
    }
}

/// Extract the bare Scopus ID from a `dc:identifier` value.
///
/// Identifiers arrive as `SCOPUS_ID:85123456789`; the substring after the
/// last colon is the ID. A missing identifier yields the empty string.
fn extract_scopus_id(identifier: Option<&str>) -> String {
    identifier
        .and_then(|id| id.rsplit(':').next())
        .unwrap_or_default()
        .to_string()
}
