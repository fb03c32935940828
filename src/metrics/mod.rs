//! Metrics collection for observability

use once_cell::sync::Lazy;
use prometheus::{
    exponential_buckets, register_counter_vec_with_registry, register_counter_with_registry,
    register_histogram_vec_with_registry, register_histogram_with_registry, Counter, CounterVec,
    Histogram, HistogramOpts, HistogramVec, Opts, Registry,
};
use std::sync::Arc;

/// Global metrics registry
pub static METRICS: Lazy<Arc<Metrics>> = Lazy::new(|| {
    Arc::new(Metrics::new().expect("Failed to initialize metrics"))
});

/// Metrics collector
pub struct Metrics {
    registry: Registry,

    // Completion provider metrics
    pub completion_requests: CounterVec,
    pub completion_duration: HistogramVec,

    // Extraction service metrics
    pub extraction_requests: CounterVec,

    // Pipeline metrics
    pub summarize_runs: CounterVec,
    pub chunk_outcomes: CounterVec,
    pub input_tokens: Histogram,
    pub rebound_truncations: Counter,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let registry = Registry::new();

        let completion_requests = register_counter_vec_with_registry!(
            Opts::new("completion_requests_total", "Total completion calls"),
            &["mode", "status"],
            registry
        )?;

        let completion_duration = register_histogram_vec_with_registry!(
            HistogramOpts::new(
                "completion_duration_seconds",
                "Completion provider call duration in seconds"
            )
            .buckets(exponential_buckets(0.25, 2.0, 11)?),
            &["mode"],
            registry
        )?;

        let extraction_requests = register_counter_vec_with_registry!(
            Opts::new("extraction_requests_total", "Total page extraction requests"),
            &["status"],
            registry
        )?;

        let summarize_runs = register_counter_vec_with_registry!(
            Opts::new("summarize_runs_total", "Total summarization runs"),
            &["strategy"],
            registry
        )?;

        let chunk_outcomes = register_counter_vec_with_registry!(
            Opts::new("chunk_outcomes_total", "Intermediate chunk outcomes"),
            &["outcome"],
            registry
        )?;

        let input_tokens = register_histogram_with_registry!(
            HistogramOpts::new("summarize_input_tokens", "Input size per run in tokens")
                .buckets(exponential_buckets(256.0, 2.0, 10)?),
            registry
        )?;

        let rebound_truncations = register_counter_with_registry!(
            Opts::new(
                "rebound_truncations_total",
                "Combined intermediate summaries truncated before the final call"
            ),
            registry
        )?;

        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        Ok(Self {
            registry,
            completion_requests,
            completion_duration,
            extraction_requests,
            summarize_runs,
            chunk_outcomes,
            input_tokens,
            rebound_truncations,
        })
    }

    /// Record a completion call; `status` is "success", "placeholder" or an error code
    pub fn record_completion(&self, mode: &str, status: &str) {
        self.completion_requests
            .with_label_values(&[mode, status])
            .inc();
    }

    /// Record a page extraction request
    pub fn record_extraction(&self, success: bool) {
        let status = if success { "success" } else { "error" };
        self.extraction_requests.with_label_values(&[status]).inc();
    }

    /// Record the start of a run once its strategy is known
    pub fn record_run(&self, strategy: &str, tokens: usize) {
        self.summarize_runs.with_label_values(&[strategy]).inc();
        self.input_tokens.observe(tokens as f64);
    }

    /// Record one chunk's outcome
    pub fn record_chunk(&self, outcome: &str) {
        self.chunk_outcomes.with_label_values(&[outcome]).inc();
    }

    /// Record a rebound truncation
    pub fn record_rebound(&self) {
        self.rebound_truncations.inc();
    }

    /// Export metrics in Prometheus text format
    pub fn export_prometheus(&self) -> String {
        use prometheus::Encoder;

        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).unwrap_or_default();

        String::from_utf8(buffer).unwrap_or_default()
    }
}
