mod ingestor;

pub use ingestor::{IngestReport, LogIngestor};
