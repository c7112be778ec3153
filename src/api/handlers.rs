use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::LogData;
use crate::search::{SearchParams, SearchResponse};
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Serialize;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        index: state.store().index_name().to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub index: String,
    pub uptime_seconds: u64,
}

/// Ingest a JSON array of log records
///
/// The body is decoded as a whole before any write, so a malformed batch
/// writes nothing. Content type is not checked.
pub async fn ingest_logs(State(state): State<AppState>, body: Bytes) -> Result<Json<IngestResponse>> {
    let logs: Vec<LogData> =
        serde_json::from_slice(&body).map_err(|e| AppError::Validation(e.to_string()))?;

    let report = state.ingestor.ingest(&logs).await?;

    Ok(Json(IngestResponse {
        message: "Log ingested successfully".to_string(),
        count: report.document_ids.len(),
    }))
}

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub message: String,
    pub count: usize,
}

/// Search logs by optional field filters and timestamp range
///
/// A repeated parameter uses its first value.
pub async fn search_logs(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<SearchResponse>> {
    let query = SearchParams::from_pairs(pairs).to_query();
    tracing::debug!(query = %query, "Executing search");

    match state.store().search_logs(&query).await {
        Ok(response) => {
            metrics::record_search(true);
            Ok(Json(response))
        }
        Err(e) => {
            metrics::record_search(false);
            Err(e.into())
        }
    }
}

/// Prometheus scrape endpoint
pub async fn metrics_export() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        metrics::gather_metrics(),
    )
}
