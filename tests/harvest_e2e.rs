//! End-to-end harvester run against a mocked Scopus API.

use rustscopus::harvest::{run_harvest, HarvestConfig};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn two_entry_body() -> Value {
    json!({
        "search-results": {
            "opensearch:totalResults": "2",
            "entry": [
                {
                    "dc:title": "Making software citable",
                    "dc:creator": "Druskat S.",
                    "prism:publicationName": "JOSS",
                    "prism:coverDate": "2021-08-01",
                    "prism:doi": "10.21105/joss.03001",
                    "dc:description": "The CITATION.cff format.",
                    "citedby-count": "12",
                    "authkeywords": "citation | software",
                    "dc:identifier": "SCOPUS_ID:85111111111"
                },
                {
                    "dc:title": "Citation File Format adoption",
                    "prism:coverDate": "2022-01-15",
                    "dc:identifier": "SCOPUS_ID:85222222222"
                }
            ]
        }
    })
}

#[tokio::test]
async fn harvest_writes_per_query_combined_and_stats_files() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("query", "TITLE-ABS-KEY(\"CITATION.cff\")"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_entry_body()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("query", "TITLE-ABS-KEY(\"codemeta\")"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let output = tempfile::tempdir().expect("tempdir");
    let config = HarvestConfig {
        api_key: "test-key".to_string(),
        output_dir: output.path().to_path_buf(),
        page_size: 25,
        delay: Duration::ZERO,
        api_base: Some(server.uri()),
    };
    let queries = vec!["CITATION.cff".to_string(), "codemeta".to_string()];

    let report = run_harvest(&config, &queries).await.expect("run succeeds");

    // combined collection holds exactly the two records from the first query
    assert_eq!(report.articles.len(), 2);
    assert_eq!(report.articles[0].title, "Making software citable");
    assert_eq!(report.articles[0].scopus_id, "85111111111");
    assert_eq!(report.articles[1].creator, "No Creator");
    assert_eq!(report.articles[1].doi, "No DOI");

    // one stat per query, in list order
    assert_eq!(report.stats.len(), 2);
    assert_eq!(report.stats[0].processed_results, 2);
    assert_eq!(report.stats[0].total_results, 2);
    assert!(report.stats[0].error.is_none());
    assert_eq!(report.stats[1].processed_results, 0);
    assert!(report.stats[1].error.is_some());

    // exactly three files: one per-query, one combined, one statistics
    let mut files: Vec<String> = std::fs::read_dir(output.path())
        .expect("read output dir")
        .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    files.sort();
    assert_eq!(files.len(), 3);

    let per_query = files
        .iter()
        .find(|f| f.starts_with("CITATIONcff_"))
        .expect("per-query file present");
    let parsed: Value = read_json(output.path().join(per_query));
    assert_eq!(parsed["articles"].as_array().expect("articles").len(), 2);
    assert_eq!(parsed["search_metadata"]["processed_results"], 2);
    assert_eq!(
        parsed["search_metadata"]["enhanced_query"],
        "TITLE-ABS-KEY(\"CITATION.cff\")"
    );

    // no per-query file for the failed query
    assert!(!files.iter().any(|f| f.starts_with("codemeta_")));

    let combined_path = report.combined_path.expect("combined file written");
    let combined: Value = read_json(combined_path);
    assert_eq!(combined["articles"].as_array().expect("articles").len(), 2);
    assert_eq!(combined["export_metadata"]["total_articles"], 2);
    assert_eq!(combined["export_metadata"]["queries_processed"], 2);

    let stats: Value = read_json(report.stats_path);
    let entries = stats["query_statistics"].as_array().expect("stats");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["processed_results"], 2);
    assert!(entries[0].get("error").is_none());
    assert_eq!(entries[1]["processed_results"], 0);
    assert!(entries[1]["error"].as_str().expect("error marker").contains("500"));
}

#[tokio::test]
async fn harvest_with_no_records_still_writes_statistics() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let output = tempfile::tempdir().expect("tempdir");
    let config = HarvestConfig {
        api_key: "bad-key".to_string(),
        output_dir: output.path().to_path_buf(),
        page_size: 25,
        delay: Duration::ZERO,
        api_base: Some(server.uri()),
    };
    let queries = vec!["anything".to_string()];

    let report = run_harvest(&config, &queries).await.expect("run succeeds");

    assert!(report.articles.is_empty());
    assert!(report.combined_path.is_none());
    assert!(report.stats_path.exists());

    let stats: Value = read_json(report.stats_path);
    assert_eq!(stats["query_statistics"].as_array().expect("stats").len(), 1);
}

#[tokio::test]
async fn harvest_requests_carry_fixed_parameter_set() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("apiKey", "test-key"))
        .and(query_param("count", "25"))
        .and(query_param("start", "0"))
        .and(query_param("sort", "-coverDate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_entry_body()))
        .expect(1)
        .mount(&server)
        .await;

    let output = tempfile::tempdir().expect("tempdir");
    let config = HarvestConfig {
        api_key: "test-key".to_string(),
        output_dir: output.path().to_path_buf(),
        // over-asking is clamped to the API cap
        page_size: 100,
        delay: Duration::ZERO,
        api_base: Some(server.uri()),
    };

    let report = run_harvest(&config, &["CITATION.cff".to_string()])
        .await
        .expect("run succeeds");
    assert_eq!(report.articles.len(), 2);
}

fn read_json(path: impl AsRef<std::path::Path>) -> Value {
    let raw = std::fs::read_to_string(path).expect("read file");
    serde_json::from_str(&raw).expect("parse json")
}
