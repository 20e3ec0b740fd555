//! Prometheus instruments for the prediction path

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};
use std::time::Duration;
use tracing::error;

/// Counters and latency histogram shared by every prediction operation on
/// both transports. Owns its registry so tests can run in parallel without
/// colliding on global collector names.
pub struct Metrics {
    registry: Registry,
    inference_total: IntCounter,
    errors_total: IntCounter,
    duration_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let inference_total = IntCounter::new(
            "argus_inference_total",
            "Total prediction calls served across both transports",
        )
        .expect("static metric name");
        let errors_total = IntCounter::new(
            "argus_prediction_errors_total",
            "Prediction calls that ended in an error",
        )
        .expect("static metric name");
        let duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "argus_prediction_duration_seconds",
            "End-to-end prediction latency in seconds",
        ))
        .expect("static metric name");

        registry
            .register(Box::new(inference_total.clone()))
            .expect("fresh registry");
        registry
            .register(Box::new(errors_total.clone()))
            .expect("fresh registry");
        registry
            .register(Box::new(duration_seconds.clone()))
            .expect("fresh registry");

        Self {
            registry,
            inference_total,
            errors_total,
            duration_seconds,
        }
    }

    /// Record one prediction call. Batch elements count individually.
    pub fn record_prediction(&self, duration: Duration, failed: bool) {
        self.inference_total.inc();
        if failed {
            self.errors_total.inc();
        }
        self.duration_seconds.observe(duration.as_secs_f64());
    }

    /// Render the registry in the Prometheus text exposition format.
    pub fn render(&self) -> String {
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buffer) {
            error!("failed to encode metrics: {}", e);
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exposition_contains_instruments() {
        let metrics = Metrics::new();
        metrics.record_prediction(Duration::from_millis(12), false);
        metrics.record_prediction(Duration::from_millis(40), true);

        let text = metrics.render();
        assert!(text.contains("argus_inference_total 2"));
        assert!(text.contains("argus_prediction_errors_total 1"));
        assert!(text.contains("argus_prediction_duration_seconds_count 2"));
    }

    #[test]
    fn test_registries_are_independent() {
        let a = Metrics::new();
        let b = Metrics::new();
        a.record_prediction(Duration::from_millis(5), false);

        assert!(a.render().contains("argus_inference_total 1"));
        assert!(b.render().contains("argus_inference_total 0"));
    }
}
