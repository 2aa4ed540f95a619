//! # Observability
//!
//! Prometheus metrics. Logging goes through `tracing` directly.
//!
//! - `metrics`: Prometheus metrics collection

pub mod metrics;
