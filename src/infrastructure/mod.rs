//! Infrastructure Layer
//!
//! Contains implementations for external concerns:
//! - Scoring model weight stores (JSON files, cached, retried)
//! - Prometheus metrics

pub mod metrics;
pub mod models;
