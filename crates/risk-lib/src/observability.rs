//! Observability infrastructure for the prediction service
//!
//! Prometheus metrics: prediction latency, prediction counts by risk level,
//! validation/prediction error counters, and the model-loaded gauge.

use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge,
    Histogram, IntCounter, IntCounterVec, IntGauge,
};
use std::sync::OnceLock;

/// Default histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<ServiceMetricsInner> = OnceLock::new();

/// Inner metrics structure that holds the actual Prometheus metrics
struct ServiceMetricsInner {
    prediction_latency_seconds: Histogram,
    predictions_total: IntCounterVec,
    validation_errors_total: IntCounter,
    prediction_errors_total: IntCounter,
    model_loaded: IntGauge,
}

impl ServiceMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram!(
                "risk_api_prediction_latency_seconds",
                "Time spent validating and scoring one request",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            predictions_total: register_int_counter_vec!(
                "risk_api_predictions_total",
                "Total number of successful predictions by risk level",
                &["risk_level"]
            )
            .expect("Failed to register predictions_total"),

            validation_errors_total: register_int_counter!(
                "risk_api_validation_errors_total",
                "Total number of requests rejected by input validation"
            )
            .expect("Failed to register validation_errors_total"),

            prediction_errors_total: register_int_counter!(
                "risk_api_prediction_errors_total",
                "Total number of requests failed by the scoring stage"
            )
            .expect("Failed to register prediction_errors_total"),

            model_loaded: register_int_gauge!(
                "risk_api_model_loaded",
                "Whether the model artifact was loaded at startup (1) or not (0)"
            )
            .expect("Failed to register model_loaded"),
        }
    }
}

/// Service metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct ServiceMetrics {
    _private: (),
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(ServiceMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &ServiceMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    /// Record a request-scoring latency observation
    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner().prediction_latency_seconds.observe(duration_secs);
    }

    /// Count a successful prediction for a risk level
    pub fn inc_predictions(&self, risk_level: &str) {
        self.inner()
            .predictions_total
            .with_label_values(&[risk_level])
            .inc();
    }

    /// Count a request rejected by validation
    pub fn inc_validation_errors(&self) {
        self.inner().validation_errors_total.inc();
    }

    /// Count a request failed by the scoring stage
    pub fn inc_prediction_errors(&self) {
        self.inner().prediction_errors_total.inc();
    }

    /// Record whether the model artifact loaded at startup
    pub fn set_model_loaded(&self, loaded: bool) {
        self.inner().model_loaded.set(i64::from(loaded));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_share_global_state() {
        let a = ServiceMetrics::new();
        let b = a.clone();
        a.set_model_loaded(true);
        b.inc_predictions("Low");
        b.observe_prediction_latency(0.001);
        // Registration happens once; second handle must not re-register
        let _c = ServiceMetrics::new();
    }
}
