//! Prometheus metrics backend for tally command execution.
//!
//! This crate provides a [`PrometheusMetrics`] implementation of
//! [`tally_core::metrics::MetricsBackend`] that exposes command metrics in
//! Prometheus format.
//!
//! ## Metrics
//! - `tally_commands_started_total{command}` - Counter
//! - `tally_commands_completed_total{command, outcome}` - Counter
//! - `tally_command_duration_seconds{command}` - Histogram
//! - `tally_command_errors_total{command, error_kind}` - Counter
//!
//! ## HTTP server
//! This crate does NOT serve a `/metrics` endpoint. Gather and encode with
//! your application's HTTP framework:
//!
//! ```rust,ignore
//! let families = metrics.gather();
//! let encoder = prometheus::TextEncoder::new();
//! let mut buffer = vec![];
//! encoder.encode(&families, &mut buffer)?;
//! ```

mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};
