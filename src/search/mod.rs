//! Elasticsearch access for log documents
//!
//! All indexing, tokenization, storage and ranking happen inside the
//! cluster. This module only shapes requests and decodes responses:
//!
//! ```text
//! ┌──────────────────────┐   PUT /{index}/_doc/{id}     ┌───────────────┐
//! │  LogStore            │ ───────────────────────────▶ │               │
//! │  (ElasticsearchClient│   POST /{index}/_search      │ Elasticsearch │
//! │   / InMemoryLogStore)│ ───────────────────────────▶ │               │
//! └──────────────────────┘   ?track_total_hits=true     └───────────────┘
//!            ▲
//!            │ query document
//! ┌──────────────────────┐
//! │  SearchParams        │  one `match` per non-empty filter,
//! │  └─ QueryBuilder     │  one inclusive `range` on timestamp,
//! └──────────────────────┘  combined under `bool.must`
//! ```
//!
//! # Example
//!
//! ```no_run
//! use log_ingestor::config::ElasticsearchConfig;
//! use log_ingestor::search::{ElasticsearchClient, LogStore, SearchParams};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ElasticsearchClient::new(&ElasticsearchConfig::default())?;
//!
//!     let query = SearchParams::new()
//!         .with_level("error")
//!         .with_date_range("2023-09-10T00:00:00Z", "2023-09-15T23:59:59Z")
//!         .to_query();
//!
//!     let response = client.search_logs(&query).await?;
//!     println!("Found {} logs", response.hits.hits.len());
//!
//!     Ok(())
//! }
//! ```

mod client;
mod document;
mod error;
mod memory;
mod query;
mod store;
pub mod tls;

pub use client::ElasticsearchClient;
pub use document::{Hit, Hits, SearchResponse, TotalHits};
pub use error::{SearchError, SearchResult};
pub use memory::InMemoryLogStore;
pub use query::{must_clauses, QueryBuilder, SearchParams, TIMESTAMP_FIELD};
pub use store::LogStore;
