use crate::models::LogData;
use crate::search::document::{Hit, SearchResponse};
use crate::search::error::{SearchError, SearchResult};
use crate::search::query::{must_clauses, TIMESTAMP_FIELD};
use crate::search::store::LogStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

/// In-process log store (for local runs and testing)
///
/// `match` clauses are evaluated as exact equality and `range` clauses on
/// `timestamp` as inclusive RFC 3339 bounds. Writes can be made to fail from a
/// given attempt onwards to exercise partial-batch behaviour, and searches can
/// be made to fail outright.
#[derive(Clone)]
pub struct InMemoryLogStore {
    index: String,
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    documents: Vec<(String, LogData)>,
    queries: Vec<Value>,
    write_attempts: usize,
    fail_from_attempt: Option<usize>,
    fail_searches: bool,
}

impl InMemoryLogStore {
    pub fn new() -> Self {
        Self {
            index: "logs".to_string(),
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Reject every write from the given zero-based attempt onwards
    pub fn fail_writes_from(self, attempt: usize) -> Self {
        self.inner.lock().fail_from_attempt = Some(attempt);
        self
    }

    /// Reject every search as an unavailable cluster would
    pub fn fail_searches(self) -> Self {
        self.inner.lock().fail_searches = true;
        self
    }

    /// Documents written so far, in write order
    pub fn documents(&self) -> Vec<(String, LogData)> {
        self.inner.lock().documents.clone()
    }

    /// Number of write calls received, successful or not
    pub fn write_attempts(&self) -> usize {
        self.inner.lock().write_attempts
    }

    /// Query documents received by `search_logs`, oldest first
    pub fn queries(&self) -> Vec<Value> {
        self.inner.lock().queries.clone()
    }
}

impl Default for InMemoryLogStore {
    fn default() -> Self {
        Self::new()
    }
}

fn clause_matches(clause: &Value, document: &Value) -> bool {
    if let Some(fields) = clause.get("match").and_then(Value::as_object) {
        return fields
            .iter()
            .all(|(field, expected)| document.get(field) == Some(expected));
    }

    if let Some(bounds) = clause.pointer(&format!("/range/{}", TIMESTAMP_FIELD)) {
        let parse = |v: Option<&Value>| {
            v.and_then(Value::as_str)
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|d| d.with_timezone(&Utc))
        };
        let at = parse(document.get(TIMESTAMP_FIELD));
        let (gte, lte) = (parse(bounds.get("gte")), parse(bounds.get("lte")));
        return match (at, gte, lte) {
            (Some(at), Some(gte), Some(lte)) => gte <= at && at <= lte,
            _ => false,
        };
    }

    false
}

#[async_trait]
impl LogStore for InMemoryLogStore {
    async fn index_log(&self, document_id: &str, log: &LogData) -> SearchResult<()> {
        let mut inner = self.inner.lock();
        let attempt = inner.write_attempts;
        inner.write_attempts += 1;

        if inner.fail_from_attempt.is_some_and(|from| attempt >= from) {
            return Err(SearchError::IndexingFailed {
                document_id: document_id.to_string(),
                status: 500,
                body: "injected failure".to_string(),
            });
        }

        inner.documents.push((document_id.to_string(), log.clone()));
        Ok(())
    }

    async fn search_logs(&self, query: &Value) -> SearchResult<SearchResponse> {
        let mut inner = self.inner.lock();
        inner.queries.push(query.clone());

        if inner.fail_searches {
            return Err(SearchError::SearchFailed {
                status: 503,
                body: "injected failure".to_string(),
            });
        }

        let clauses = must_clauses(query);
        let mut hits = Vec::new();
        for (id, log) in &inner.documents {
            let document =
                serde_json::to_value(log).map_err(|e| SearchError::Encode(e.to_string()))?;
            if clauses.iter().all(|clause| clause_matches(clause, &document)) {
                hits.push(Hit {
                    id: Some(id.clone()),
                    source: log.clone(),
                });
            }
        }

        Ok(SearchResponse::from_hits(hits))
    }

    fn index_name(&self) -> &str {
        &self.index
    }
}
