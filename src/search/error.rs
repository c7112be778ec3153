//! Error types for search engine operations

use crate::error::AppError;

/// Result type for search operations
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Errors that can occur while talking to Elasticsearch
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// HTTP client could not be built
    #[error("Client initialization failed: {0}")]
    ClientInit(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Request body could not be encoded
    #[error("Failed to encode request: {0}")]
    Encode(String),

    /// Response body could not be decoded
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Engine unreachable or request aborted
    #[error("Request to search engine failed: {0}")]
    Transport(String),

    /// Document indexing failed
    #[error("Failed to index document with ID={document_id} (status {status})")]
    IndexingFailed {
        document_id: String,
        status: u16,
        body: String,
    },

    /// Search execution failed
    #[error("Search execution failed (status {status})")]
    SearchFailed { status: u16, body: String },
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SearchError::Decode(err.to_string())
        } else {
            SearchError::Transport(err.to_string())
        }
    }
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::ClientInit(msg) | SearchError::InvalidConfiguration(msg) => {
                AppError::Configuration(msg)
            }
            SearchError::Encode(msg) | SearchError::Decode(msg) => AppError::Serialization(msg),
            SearchError::Transport(msg) => AppError::Network(msg),
            err @ (SearchError::IndexingFailed { .. } | SearchError::SearchFailed { .. }) => {
                AppError::SearchEngine(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_indexing_failure_maps_to_server_error() {
        let err = SearchError::IndexingFailed {
            document_id: "abc".to_string(),
            status: 400,
            body: "mapper_parsing_exception".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to index document with ID=abc (status 400)");

        let app: AppError = err.into();
        assert_eq!(app.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(app.error_code(), "SEARCH_ENGINE_ERROR");
    }

    #[test]
    fn test_transport_failure_maps_to_network() {
        let app: AppError = SearchError::Transport("connection refused".to_string()).into();
        assert!(matches!(app, AppError::Network(_)));
        assert_eq!(app.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
