//! Search query building

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Field holding the event time of a log document
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// Filters accepted by `GET /search`
///
/// Every parameter is optional; empty values mean "unconstrained", not
/// "match the empty string".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub level: Option<String>,
    pub resource_id: Option<String>,
    pub trace_id: Option<String>,
    pub span_id: Option<String>,
    pub commit: Option<String>,
    pub message: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn with_span_id(mut self, span_id: impl Into<String>) -> Self {
        self.span_id = Some(span_id.into());
        self
    }

    pub fn with_commit(mut self, commit: impl Into<String>) -> Self {
        self.commit = Some(commit.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_date_range(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_date = Some(start.into());
        self.end_date = Some(end.into());
        self
    }

    /// Collect filters from decoded query-string pairs
    ///
    /// The first value of a repeated key wins; unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "level" => &mut params.level,
                "resourceId" => &mut params.resource_id,
                "traceId" => &mut params.trace_id,
                "spanId" => &mut params.span_id,
                "commit" => &mut params.commit,
                "message" => &mut params.message,
                "startDate" => &mut params.start_date,
                "endDate" => &mut params.end_date,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        params
    }

    /// Build the Elasticsearch query document for these filters
    pub fn to_query(&self) -> Value {
        QueryBuilder::new()
            .match_field("level", self.level.as_deref())
            .match_field("resourceId", self.resource_id.as_deref())
            .match_field("traceId", self.trace_id.as_deref())
            .match_field("spanId", self.span_id.as_deref())
            .match_field("commit", self.commit.as_deref())
            .match_field("message", self.message.as_deref())
            .date_range(
                TIMESTAMP_FIELD,
                self.start_date.as_deref(),
                self.end_date.as_deref(),
            )
            .build()
    }
}

/// Accumulates conjunctive clauses into a `bool.must` query
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    must: Vec<Value>,
}

impl QueryBuilder {
    /// Create a builder with no clauses
    pub fn new() -> Self {
        Self { must: Vec::new() }
    }

    /// Add a `match` clause unless the value is absent or empty
    pub fn match_field(mut self, field: &str, value: Option<&str>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.must.push(json!({ "match": { field: value } }));
        }
        self
    }

    /// Add an inclusive `range` clause, only when both bounds are non-empty
    pub fn date_range(mut self, field: &str, gte: Option<&str>, lte: Option<&str>) -> Self {
        let gte = gte.filter(|v| !v.is_empty());
        let lte = lte.filter(|v| !v.is_empty());
        if let (Some(gte), Some(lte)) = (gte, lte) {
            self.must.push(json!({
                "range": { field: { "gte": gte, "lte": lte } }
            }));
        }
        self
    }

    /// Number of clauses collected so far
    pub fn clause_count(&self) -> usize {
        self.must.len()
    }

    /// Produce `{"query": {"bool": {"must": [...]}}}`
    pub fn build(self) -> Value {
        json!({
            "query": {
                "bool": {
                    "must": self.must
                }
            }
        })
    }
}

/// Borrow the `must` clause list out of a built query document
pub fn must_clauses(query: &Value) -> &[Value] {
    query
        .pointer("/query/bool/must")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_params_build_empty_must() {
        let query = SearchParams::new().to_query();
        assert_eq!(query, json!({ "query": { "bool": { "must": [] } } }));
    }

    #[test]
    fn test_single_param_builds_one_clause_on_same_field() {
        let cases = [
            (SearchParams::new().with_level("error"), "level", "error"),
            (SearchParams::new().with_resource_id("server-1234"), "resourceId", "server-1234"),
            (SearchParams::new().with_trace_id("abc-xyz-123"), "traceId", "abc-xyz-123"),
            (SearchParams::new().with_span_id("span-456"), "spanId", "span-456"),
            (SearchParams::new().with_message("Failed to connect"), "message", "Failed to connect"),
        ];

        for (params, field, value) in cases {
            let query = params.to_query();
            let clauses = must_clauses(&query);
            assert_eq!(clauses.len(), 1, "field {}", field);
            assert_eq!(clauses[0], json!({ "match": { field: value } }));
        }
    }

    #[test]
    fn test_commit_matches_commit_field_not_span_id() {
        let query = SearchParams::new().with_commit("5e5342f").to_query();
        let clauses = must_clauses(&query);

        assert_eq!(clauses, &[json!({ "match": { "commit": "5e5342f" } })]);
        assert!(clauses[0].pointer("/match/spanId").is_none());
    }

    #[test]
    fn test_empty_value_adds_no_clause() {
        let params = SearchParams {
            level: Some(String::new()),
            message: Some(String::new()),
            ..Default::default()
        };
        assert!(must_clauses(&params.to_query()).is_empty());
    }

    #[test]
    fn test_date_range_requires_both_bounds() {
        let both = SearchParams::new()
            .with_date_range("2023-09-10T00:00:00Z", "2023-09-15T23:59:59Z")
            .to_query();
        assert_eq!(
            must_clauses(&both),
            &[json!({
                "range": {
                    "timestamp": {
                        "gte": "2023-09-10T00:00:00Z",
                        "lte": "2023-09-15T23:59:59Z"
                    }
                }
            })]
        );

        let start_only = SearchParams {
            start_date: Some("2023-09-10T00:00:00Z".to_string()),
            ..Default::default()
        };
        assert!(must_clauses(&start_only.to_query()).is_empty());

        let blank_end = SearchParams {
            start_date: Some("2023-09-10T00:00:00Z".to_string()),
            end_date: Some(String::new()),
            ..Default::default()
        };
        assert!(must_clauses(&blank_end.to_query()).is_empty());
    }

    #[test]
    fn test_clauses_are_conjunctive_in_fixed_order() {
        let query = SearchParams::new()
            .with_message("timeout")
            .with_level("error")
            .with_date_range("now-1d", "now")
            .to_query();

        let clauses = must_clauses(&query);
        assert_eq!(clauses.len(), 3);
        assert!(clauses[0].pointer("/match/level").is_some());
        assert!(clauses[1].pointer("/match/message").is_some());
        assert!(clauses[2].pointer("/range/timestamp").is_some());
    }

    #[test]
    fn test_query_string_names_are_camel_case() {
        let params: SearchParams =
            serde_json::from_value(json!({ "resourceId": "r1", "startDate": "a", "endDate": "b" }))
                .unwrap();
        assert_eq!(params.resource_id.as_deref(), Some("r1"));
        assert_eq!(params.start_date.as_deref(), Some("a"));
        assert_eq!(params.end_date.as_deref(), Some("b"));
    }

    #[test]
    fn test_from_pairs_keeps_first_value_of_repeated_key() {
        let params = SearchParams::from_pairs(vec![
            ("level", "error"),
            ("traceId", "t-1"),
            ("level", "info"),
            ("unknown", "x"),
        ]);

        assert_eq!(params.level.as_deref(), Some("error"));
        assert_eq!(params.trace_id.as_deref(), Some("t-1"));
        assert!(params.message.is_none());
        assert_eq!(
            must_clauses(&params.to_query()),
            &[json!({ "match": { "level": "error" } }), json!({ "match": { "traceId": "t-1" } })]
        );
    }

    #[test]
    fn test_builder_counts_clauses() {
        let builder = QueryBuilder::new()
            .match_field("level", Some("warn"))
            .match_field("message", None);
        assert_eq!(builder.clause_count(), 1);
    }
}
