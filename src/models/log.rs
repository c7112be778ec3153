use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// A single structured log record as submitted to `POST /ingest` and stored
/// as the `_source` of an Elasticsearch document.
///
/// Missing or `null` fields fall back to their empty value and unknown fields
/// are ignored, so partially populated records are accepted as-is. Older
/// documents store `"metadata": null`, which decodes to an empty map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogData {
    /// Severity level (e.g. "error", "info")
    #[serde(default, deserialize_with = "null_as_default")]
    pub level: String,

    /// Free-text log message
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,

    /// Emitting resource (service, host, pod)
    #[serde(default, deserialize_with = "null_as_default")]
    pub resource_id: String,

    /// Time the event occurred
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    /// Distributed trace identifier
    #[serde(default, deserialize_with = "null_as_default")]
    pub trace_id: String,

    /// Span identifier within the trace
    #[serde(default, deserialize_with = "null_as_default")]
    pub span_id: String,

    /// Source revision of the emitting code
    #[serde(default, deserialize_with = "null_as_default")]
    pub commit: String,

    /// Arbitrary string attributes
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: HashMap<String, String>,
}

/// Decode `null` as the type's default instead of failing
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl LogData {
    pub fn new(level: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            message: message.into(),
            timestamp: Some(Utc::now()),
            ..Default::default()
        }
    }

    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = resource_id.into();
        self
    }

    pub fn with_trace(mut self, trace_id: impl Into<String>, span_id: impl Into<String>) -> Self {
        self.trace_id = trace_id.into();
        self.span_id = span_id.into();
        self
    }

    pub fn with_commit(mut self, commit: impl Into<String>) -> Self {
        self.commit = commit.into();
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
