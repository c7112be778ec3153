//! Prometheus metrics for the ingestion gateway.
//!
//! Counters are always incremented; they are only exported once
//! [`init_metrics`] has registered them, which `main` does when
//! `observability.prometheus_enabled` is set.
//!
//! # Example
//! ```no_run
//! use log_ingestor::metrics::{gather_metrics, init_metrics, LOGS_INGESTED_TOTAL};
//!
//! init_metrics().unwrap();
//! LOGS_INGESTED_TOTAL.inc();
//! println!("{}", gather_metrics());
//! ```

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Opts, Registry};

const NAMESPACE: &str = "log_ingestor";

lazy_static! {
    /// Global Prometheus registry for all metrics
    pub static ref PROMETHEUS_REGISTRY: Registry = Registry::new();

    /// Log records written to the engine
    pub static ref LOGS_INGESTED_TOTAL: Counter = Counter::with_opts(
        Opts::new("logs_ingested_total", "Total number of log records indexed")
            .namespace(NAMESPACE)
    ).expect("Failed to create LOGS_INGESTED_TOTAL metric");

    /// Ingest batches aborted by a per-record failure
    pub static ref INGEST_FAILURES_TOTAL: Counter = Counter::with_opts(
        Opts::new("ingest_failures_total", "Total number of aborted ingest batches")
            .namespace(NAMESPACE)
    ).expect("Failed to create INGEST_FAILURES_TOTAL metric");

    /// Search requests forwarded to the engine
    ///
    /// Labels: outcome (success, error)
    pub static ref SEARCH_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("search_requests_total", "Total number of search requests")
            .namespace(NAMESPACE),
        &["outcome"]
    ).expect("Failed to create SEARCH_REQUESTS_TOTAL metric");
}

fn register(collector: Box<dyn prometheus::core::Collector>) -> Result<(), prometheus::Error> {
    match PROMETHEUS_REGISTRY.register(collector) {
        Ok(()) | Err(prometheus::Error::AlreadyReg) => Ok(()),
        Err(e) => Err(e),
    }
}

/// Register all metrics with the global registry; safe to call repeatedly
pub fn init_metrics() -> Result<(), prometheus::Error> {
    register(Box::new(LOGS_INGESTED_TOTAL.clone()))?;
    register(Box::new(INGEST_FAILURES_TOTAL.clone()))?;
    register(Box::new(SEARCH_REQUESTS_TOTAL.clone()))?;
    Ok(())
}

/// Record the outcome of one search request
pub fn record_search(success: bool) {
    let outcome = if success { "success" } else { "error" };
    SEARCH_REQUESTS_TOTAL.with_label_values(&[outcome]).inc();
}

/// Render the registry in Prometheus text format
pub fn gather_metrics() -> String {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = PROMETHEUS_REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::from("# Error encoding metrics\n");
    }

    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!("Failed to convert metrics to string: {}", e);
        String::from("# Error converting metrics\n")
    })
}
