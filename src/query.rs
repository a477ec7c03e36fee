//! Query enhancement for Scopus search.
//!
//! Rewrites free-text queries into field-scoped boolean expressions so that
//! matches are restricted to title, abstract, and author keywords instead of
//! full-text. Queries already carrying Scopus field syntax pass through
//! untouched.

/// Scope markers that indicate a query is already field-scoped.
const SCOPE_MARKERS: &[&str] = &["TITLE(", "ABS(", "KEY(", "TITLE-ABS-KEY("];

/// Enhance a raw query string into a field-scoped Scopus expression.
///
/// - A query containing any recognized scope marker is returned unchanged.
/// - A multi-word query becomes `TITLE-ABS-KEY("w1" OR "w2" OR ...)`.
/// - A single-word (or empty) query is wrapped as `TITLE-ABS-KEY("...")`.
///
/// Total over all inputs; the empty string yields the degenerate
/// `TITLE-ABS-KEY("")`, which Scopus rejects at search time.
pub fn enhance_query(query: &str) -> String {
    if SCOPE_MARKERS.iter().any(|marker| query.contains(marker)) {
        return query.to_string();
    }

    let terms: Vec<&str> = query.split_whitespace().collect();

    if terms.len() > 1 {
        let joined = terms
            .iter()
            .map(|t| format!("\"{}\"", t))
            .collect::<Vec<_>>()
            .join(" OR ");
        format!("TITLE-ABS-KEY({})", joined)
    } else {
        format!("TITLE-ABS-KEY(\"{}\")", query.trim())
    }
}
