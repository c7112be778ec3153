//! Elasticsearch REST client

use crate::config::ElasticsearchConfig;
use crate::models::LogData;
use crate::search::document::SearchResponse;
use crate::search::error::{SearchError, SearchResult};
use crate::search::store::LogStore;
use crate::search::tls;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

/// Long-lived handle to one Elasticsearch index
///
/// Wraps a pooled `reqwest::Client`; clone it or share it behind an `Arc`
/// rather than rebuilding it per request.
#[derive(Clone)]
pub struct ElasticsearchClient {
    client: Client,
    base_url: String,
    index: String,
    username: String,
    password: String,
}

impl ElasticsearchClient {
    /// Build a client from configuration
    pub fn new(config: &ElasticsearchConfig) -> SearchResult<Self> {
        if config.index.trim().is_empty() {
            return Err(SearchError::InvalidConfiguration(
                "elasticsearch.index must not be empty".to_string(),
            ));
        }

        let mut builder = Client::builder().timeout(Duration::from_secs(config.timeout_secs));

        if let Some(fingerprint) = config.fingerprint() {
            builder = builder.use_preconfigured_tls(tls::pinned_client_config(fingerprint)?);
        }

        let client = builder
            .build()
            .map_err(|e| SearchError::ClientInit(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            index: config.index.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// Cluster base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        if self.username.is_empty() {
            request
        } else {
            request.basic_auth(&self.username, Some(&self.password))
        }
    }

    /// `PUT /{index}/_doc/{id}`
    pub async fn index_document(&self, document_id: &str, log: &LogData) -> SearchResult<()> {
        let body = serde_json::to_vec(log).map_err(|e| SearchError::Encode(e.to_string()))?;
        let url = format!("{}/{}/_doc/{}", self.base_url, self.index, document_id);

        let response = self
            .authorized(self.client.put(&url))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                document_id = %document_id,
                status = status.as_u16(),
                body = %body,
                "Elasticsearch rejected document"
            );
            return Err(SearchError::IndexingFailed {
                document_id: document_id.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        debug!(document_id = %document_id, index = %self.index, "Document indexed");
        Ok(())
    }

    /// `POST /{index}/_search?track_total_hits=true`
    pub async fn search(&self, query: &Value) -> SearchResult<SearchResponse> {
        let body = serde_json::to_vec(query).map_err(|e| SearchError::Encode(e.to_string()))?;
        let url = format!("{}/{}/_search", self.base_url, self.index);

        let response = self
            .authorized(self.client.post(&url))
            .query(&[("track_total_hits", "true")])
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %body, "Search query failed");
            return Err(SearchError::SearchFailed {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            error!(error = %e, "Failed to parse search response");
            SearchError::Decode(e.to_string())
        })
    }
}

#[async_trait]
impl LogStore for ElasticsearchClient {
    async fn index_log(&self, document_id: &str, log: &LogData) -> SearchResult<()> {
        self.index_document(document_id, log).await
    }

    async fn search_logs(&self, query: &Value) -> SearchResult<SearchResponse> {
        self.search(query).await
    }

    fn index_name(&self) -> &str {
        &self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = ElasticsearchConfig {
            url: "http://localhost:9200/".to_string(),
            ..Default::default()
        };
        let client = ElasticsearchClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9200");
        assert_eq!(client.index_name(), "logs");
    }

    #[test]
    fn test_empty_index_is_rejected() {
        let config = ElasticsearchConfig {
            index: " ".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            ElasticsearchClient::new(&config),
            Err(SearchError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_bad_fingerprint_fails_construction() {
        let config = ElasticsearchConfig {
            certificate_fingerprint: Some("not-hex".to_string()),
            ..Default::default()
        };
        assert!(ElasticsearchClient::new(&config).is_err());
    }
}
