use std::sync::Arc;

use prometheus::{CounterVec, HistogramVec, Opts, Registry, proto::MetricFamily};

use tally_core::metrics::{CommandOutcome, MetricsBackend};

/// Prometheus metrics backend for tally.
///
/// Implements [`MetricsBackend`] and exposes prometheus metrics that can be scraped via HTTP endpoint.
///
/// ## Metrics
/// - `tally_commands_started_total{command}` - Counter of started command runs
/// - `tally_commands_completed_total{command, outcome}` - Counter of completed command runs
/// - `tally_command_duration_seconds{command}` - Histogram of command execution time
/// - `tally_command_errors_total{command, error_kind}` - Counter of command errors
///
/// ## Label cardinality
/// All labels are bounded (low cardinality):
/// - `command`: registered command names, e.g. "inc"
/// - `outcome`: "success", "failure", "canceled", "timeout"
/// - `error_kind`: "config", "transport", "status", "decode"
#[derive(Clone)]
pub struct PrometheusMetrics {
    commands_started: CounterVec,
    commands_completed: CounterVec,
    command_duration: HistogramVec,
    command_errors: CounterVec,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    /// Create a new prometheus metrics backend with custom registry.
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let commands_started = CounterVec::new(
            Opts::new(
                "commands_started_total",
                "Total number of command runs started",
            )
            .namespace("tally"),
            &["command"],
        )?;
        registry.register(Box::new(commands_started.clone()))?;

        let commands_completed = CounterVec::new(
            Opts::new(
                "commands_completed_total",
                "Total number of command runs completed",
            )
            .namespace("tally"),
            &["command", "outcome"],
        )?;
        registry.register(Box::new(commands_completed.clone()))?;

        let command_duration = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "command_duration_seconds",
                "Command execution duration in seconds",
            )
            .namespace("tally")
            .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 30.0, 60.0]),
            &["command"],
        )?;
        registry.register(Box::new(command_duration.clone()))?;

        let command_errors = CounterVec::new(
            Opts::new("command_errors_total", "Total command-level errors").namespace("tally"),
            &["command", "error_kind"],
        )?;
        registry.register(Box::new(command_errors.clone()))?;

        Ok(Self {
            commands_started,
            commands_completed,
            command_duration,
            command_errors,
            registry,
        })
    }

    /// Create a new prometheus metrics backend with default registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    /// Gather all metrics for exposition.
    ///
    /// Use this to implement `/metrics` HTTP endpoint.
    ///
    /// # Example
    /// ```rust,ignore
    /// let metrics = PrometheusMetrics::new()?;
    /// let metrics_families = metrics.gather();
    /// let encoder = prometheus::TextEncoder::new();
    /// encoder.encode(&metrics_families, &mut buffer)?;
    /// ```
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Get reference to underlying prometheus registry.
    ///
    /// Useful for registering custom metrics alongside tally metrics.
    #[allow(dead_code)]
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_command_started(&self, command: &str) {
        self.commands_started.with_label_values(&[command]).inc();
    }

    fn record_command_completed(&self, command: &str, outcome: CommandOutcome, duration_ms: u64) {
        self.commands_completed
            .with_label_values(&[command, outcome.as_label()])
            .inc();

        let duration_seconds = duration_ms as f64 / 1000.0;
        self.command_duration
            .with_label_values(&[command])
            .observe(duration_seconds);
    }

    fn record_command_error(&self, command: &str, error_kind: &str) {
        self.command_errors
            .with_label_values(&[command, error_kind])
            .inc();
    }
}
