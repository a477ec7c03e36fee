//! # rustscopus
//!
//! Scopus Literature-Search Harvester
//!
//! ## Modules
//!
//! - [`query`] - Query enhancement into field-scoped Scopus expressions
//! - [`scopus`] - Scopus Search API client
//! - [`normalize`] - Response-to-record normalization
//! - [`export`] - JSON export to the output directory
//! - [`harvest`] - Sequential run orchestration
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rustscopus::harvest::{run_harvest, HarvestConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = HarvestConfig::new("secret-key".to_string());
//!     let queries = vec!["research software citation".to_string()];
//!     let report = run_harvest(&config, &queries).await?;
//!     println!("Harvested {} articles", report.articles.len());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod export;
pub mod harvest;
pub mod normalize;
pub mod query;
pub mod scopus;

pub use error::{HarvestError, Result};
