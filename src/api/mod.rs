pub mod handlers;
pub mod routes;

pub use routes::*;

use crate::processing::LogIngestor;
use crate::search::LogStore;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub ingestor: Arc<LogIngestor>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(store: Arc<dyn LogStore>) -> Self {
        Self {
            ingestor: Arc::new(LogIngestor::new(store)),
            started_at: Instant::now(),
        }
    }

    /// Store shared by ingestion and search
    pub fn store(&self) -> &Arc<dyn LogStore> {
        self.ingestor.store()
    }
}
