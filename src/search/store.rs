use crate::models::LogData;
use crate::search::document::SearchResponse;
use crate::search::error::SearchResult;
use async_trait::async_trait;
use serde_json::Value;

/// Backend that persists log documents and answers queries
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Index a single log record under the given document ID
    async fn index_log(&self, document_id: &str, log: &LogData) -> SearchResult<()>;

    /// Execute a query document and return the hit envelope
    async fn search_logs(&self, query: &Value) -> SearchResult<SearchResponse>;

    /// Name of the index this store writes to
    fn index_name(&self) -> &str;
}
