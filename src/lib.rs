//! HTTP gateway that indexes structured log batches into Elasticsearch and
//! translates query-string filters into Elasticsearch queries.

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod processing;
pub mod search;

pub use error::{AppError, Result};
