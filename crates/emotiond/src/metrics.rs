//! Prometheus metrics for the analyze endpoint.
//!
//! `emotion_normalize_total{stage="fallback"}` is the signal for upstream
//! output drift: callers always get a renderable result, so a rising
//! fallback share is the only visible symptom.

use emotion_common::ParseStage;
use prometheus::{
    register_histogram_with_registry, register_int_counter_vec_with_registry, Encoder,
    Histogram, IntCounterVec, Registry, TextEncoder,
};
use std::sync::Arc;

/// Analyze endpoint metrics
#[derive(Clone)]
pub struct AnalyzeMetrics {
    pub requests_total: IntCounterVec,
    pub normalize_total: IntCounterVec,
    pub upstream_latency_seconds: Histogram,

    registry: Arc<Registry>,
}

impl AnalyzeMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let requests_total = register_int_counter_vec_with_registry!(
            "emotion_requests_total",
            "Analyze requests by input mode and outcome",
            &["mode", "outcome"],
            registry
        )?;

        let normalize_total = register_int_counter_vec_with_registry!(
            "emotion_normalize_total",
            "Model responses by the normalization step that recovered them",
            &["stage"],
            registry
        )?;

        let upstream_latency_seconds = register_histogram_with_registry!(
            "emotion_upstream_latency_seconds",
            "Latency of successful AI gateway calls in seconds",
            vec![0.25, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0],
            registry
        )?;

        Ok(Self {
            requests_total,
            normalize_total,
            upstream_latency_seconds,
            registry: Arc::new(registry),
        })
    }

    /// `mode` is "unknown" when the request body never parsed
    pub fn record_request(&self, mode: &str, outcome: &str) {
        self.requests_total.with_label_values(&[mode, outcome]).inc();
    }

    pub fn record_stage(&self, stage: ParseStage) {
        self.normalize_total
            .with_label_values(&[stage.as_str()])
            .inc();
    }

    pub fn observe_upstream_latency(&self, seconds: f64) {
        self.upstream_latency_seconds.observe(seconds);
    }

    /// Text exposition of every registered metric
    pub fn render(&self) -> prometheus::Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_render() {
        let metrics = AnalyzeMetrics::new().unwrap();
        metrics.record_request("WEBCAM", "ok");
        metrics.record_stage(ParseStage::Fallback);
        metrics.record_stage(ParseStage::Fallback);
        metrics.observe_upstream_latency(0.3);

        let text = metrics.render().unwrap();
        assert!(text.contains(r#"emotion_requests_total{mode="WEBCAM",outcome="ok"} 1"#));
        assert!(text.contains(r#"emotion_normalize_total{stage="fallback"} 2"#));
        assert!(text.contains("emotion_upstream_latency_seconds_count 1"));
    }

    #[test]
    fn test_registries_are_independent() {
        let a = AnalyzeMetrics::new().unwrap();
        let b = AnalyzeMetrics::new().unwrap();
        a.record_stage(ParseStage::Direct);
        assert!(!b.render().unwrap().contains(r#"stage="direct""#));
    }
}
