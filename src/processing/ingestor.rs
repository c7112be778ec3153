use crate::error::Result;
use crate::metrics::{INGEST_FAILURES_TOTAL, LOGS_INGESTED_TOTAL};
use crate::models::LogData;
use crate::search::LogStore;
use std::sync::Arc;
use uuid::Uuid;

/// Outcome of a fully written batch
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    /// Generated document IDs, in input order
    pub document_ids: Vec<String>,
}

/// Writes log batches one document at a time
///
/// Records are indexed in input order, each under a fresh UUID v4. The first
/// failure aborts the batch: earlier documents stay written, later ones are
/// never attempted.
pub struct LogIngestor {
    store: Arc<dyn LogStore>,
}

impl LogIngestor {
    pub fn new(store: Arc<dyn LogStore>) -> Self {
        Self { store }
    }

    /// Get a reference to the log store
    pub fn store(&self) -> &Arc<dyn LogStore> {
        &self.store
    }

    /// Index every record of a batch
    pub async fn ingest(&self, logs: &[LogData]) -> Result<IngestReport> {
        let mut document_ids = Vec::with_capacity(logs.len());

        for (position, log) in logs.iter().enumerate() {
            let document_id = Uuid::new_v4().to_string();

            if let Err(e) = self.store.index_log(&document_id, log).await {
                INGEST_FAILURES_TOTAL.inc();
                tracing::error!(
                    index = %self.store.index_name(),
                    document_id = %document_id,
                    position,
                    written = document_ids.len(),
                    remaining = logs.len() - position,
                    error = %e,
                    "Aborting ingest batch"
                );
                return Err(e.into());
            }

            LOGS_INGESTED_TOTAL.inc();
            document_ids.push(document_id);
        }

        tracing::info!(
            index = %self.store.index_name(),
            count = document_ids.len(),
            "Log batch ingested"
        );

        Ok(IngestReport { document_ids })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::search::InMemoryLogStore;
    use std::collections::HashSet;

    fn batch(n: usize) -> Vec<LogData> {
        (0..n)
            .map(|i| LogData::new("info", format!("message {}", i)))
            .collect()
    }

    #[tokio::test]
    async fn test_each_record_gets_distinct_id() {
        let store = InMemoryLogStore::new();
        let ingestor = LogIngestor::new(Arc::new(store.clone()));

        let report = ingestor.ingest(&batch(5)).await.unwrap();

        let unique: HashSet<_> = report.document_ids.iter().collect();
        assert_eq!(unique.len(), 5);
        assert_eq!(store.write_attempts(), 5);

        let written: Vec<_> = store.documents().into_iter().map(|(id, _)| id).collect();
        assert_eq!(written, report.document_ids);
    }

    #[tokio::test]
    async fn test_records_written_in_input_order() {
        let store = InMemoryLogStore::new();
        let ingestor = LogIngestor::new(Arc::new(store.clone()));

        ingestor.ingest(&batch(3)).await.unwrap();

        let messages: Vec<_> = store
            .documents()
            .into_iter()
            .map(|(_, log)| log.message)
            .collect();
        assert_eq!(messages, vec!["message 0", "message 1", "message 2"]);
    }

    #[tokio::test]
    async fn test_failure_aborts_remaining_records() {
        let store = InMemoryLogStore::new().fail_writes_from(2);
        let ingestor = LogIngestor::new(Arc::new(store.clone()));

        let err = ingestor.ingest(&batch(5)).await.unwrap_err();

        assert!(matches!(err, AppError::SearchEngine(_)));
        // Two committed, the third attempted and rejected, the rest untouched.
        assert_eq!(store.documents().len(), 2);
        assert_eq!(store.write_attempts(), 3);
    }

    #[tokio::test]
    async fn test_empty_batch_is_a_no_op() {
        let store = InMemoryLogStore::new();
        let ingestor = LogIngestor::new(Arc::new(store.clone()));

        let report = ingestor.ingest(&[]).await.unwrap();
        assert!(report.document_ids.is_empty());
        assert_eq!(store.write_attempts(), 0);
    }
}
