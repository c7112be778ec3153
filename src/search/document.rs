//! Wire types for Elasticsearch search responses

use crate::models::LogData;
use serde::{Deserialize, Serialize};

/// Hit envelope returned by `_search` and relayed to callers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub hits: Hits,
}

impl SearchResponse {
    /// Wrap already-decoded hits, as an in-process store would return them
    pub fn from_hits(hits: Vec<Hit>) -> Self {
        let total = TotalHits {
            value: hits.len() as u64,
            relation: "eq".to_string(),
        };
        Self {
            hits: Hits {
                total: Some(total),
                hits,
            },
        }
    }

    /// Iterate the stored log records
    pub fn sources(&self) -> impl Iterator<Item = &LogData> {
        self.hits.hits.iter().map(|hit| &hit.source)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hits {
    /// Present because searches are sent with `track_total_hits=true`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<TotalHits>,

    #[serde(default)]
    pub hits: Vec<Hit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalHits {
    pub value: u64,
    pub relation: String,
}

/// One matching document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "_source")]
    pub source: LogData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_engine_envelope() {
        let body = r#"{
            "took": 3,
            "timed_out": false,
            "_shards": {"total": 1, "successful": 1, "skipped": 0, "failed": 0},
            "hits": {
                "total": {"value": 1, "relation": "eq"},
                "max_score": 1.2,
                "hits": [{
                    "_index": "logs",
                    "_id": "0b6a",
                    "_score": 1.2,
                    "_source": {"level": "error", "message": "Failed to connect to DB", "resourceId": "server-1234"}
                }]
            }
        }"#;

        let response: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.hits.total.as_ref().unwrap().value, 1);
        assert_eq!(response.hits.hits[0].id.as_deref(), Some("0b6a"));
        assert_eq!(response.sources().next().unwrap().resource_id, "server-1234");

        // Engine bookkeeping fields are dropped when relayed.
        let relayed = serde_json::to_value(&response).unwrap();
        assert!(relayed.get("took").is_none());
        assert!(relayed["hits"]["hits"][0].get("_score").is_none());
    }

    #[test]
    fn test_decode_source_with_null_metadata() {
        let body = r#"{
            "hits": {
                "total": {"value": 1, "relation": "eq"},
                "hits": [{
                    "_id": "legacy-1",
                    "_source": {"level": "warn", "message": "old", "metadata": null, "commit": null}
                }]
            }
        }"#;

        let response: SearchResponse = serde_json::from_str(body).unwrap();
        let source = response.sources().next().unwrap();
        assert_eq!(source.level, "warn");
        assert!(source.metadata.is_empty());
        assert!(source.commit.is_empty());
    }
}
