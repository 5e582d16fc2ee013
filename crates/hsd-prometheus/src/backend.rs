use std::sync::Arc;

use prometheus::{
    CounterVec, Encoder, HistogramOpts, HistogramVec, IntGauge, Opts, Registry, TextEncoder,
    proto::MetricFamily,
};

use hsd_core::{MetricsBackend, PollOutcome};

/// Prometheus metrics backend for the discovery service.
///
/// ## Metrics
/// - `hsd_polls_total{outcome}` - Counter of served polls
/// - `hsd_poll_duration_seconds{outcome}` - Histogram of fetch + extract time
/// - `hsd_targets` - Targets returned by the last successful poll
/// - `hsd_upstream_errors_total{kind}` - Counter of inventory read failures
///
/// ## Label cardinality
/// All labels are bounded:
/// - `outcome`: "success", "failure", "timeout", "canceled"
/// - `kind`: "transport", "status", "decode", "timeout", "canceled"
#[derive(Clone)]
pub struct PrometheusMetrics {
    polls: CounterVec,
    poll_duration: HistogramVec,
    targets: IntGauge,
    upstream_errors: CounterVec,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    /// Create a new prometheus metrics backend with custom registry.
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let polls = CounterVec::new(
            Opts::new("polls_total", "Total number of discovery polls").namespace("hsd"),
            &["outcome"],
        )?;
        registry.register(Box::new(polls.clone()))?;

        let poll_duration = HistogramVec::new(
            HistogramOpts::new(
                "poll_duration_seconds",
                "Time spent reading the inventory and extracting targets",
            )
            .namespace("hsd")
            .buckets(vec![0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
            &["outcome"],
        )?;
        registry.register(Box::new(poll_duration.clone()))?;

        let targets = IntGauge::with_opts(
            Opts::new("targets", "Targets returned by the last successful poll").namespace("hsd"),
        )?;
        registry.register(Box::new(targets.clone()))?;

        let upstream_errors = CounterVec::new(
            Opts::new("upstream_errors_total", "Total inventory read failures").namespace("hsd"),
            &["kind"],
        )?;
        registry.register(Box::new(upstream_errors.clone()))?;

        Ok(Self {
            polls,
            poll_duration,
            targets,
            upstream_errors,
            registry,
        })
    }

    /// Create a new prometheus metrics backend with default registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    /// Gather all metrics for exposition.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Render all metrics in the text exposition format.
    pub fn encode_text(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    /// Get reference to underlying prometheus registry.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_poll(&self, outcome: PollOutcome, duration_ms: u64) {
        self.polls.with_label_values(&[outcome.as_label()]).inc();

        let duration_seconds = duration_ms as f64 / 1000.0;
        self.poll_duration
            .with_label_values(&[outcome.as_label()])
            .observe(duration_seconds);
    }

    fn record_targets(&self, count: usize) {
        self.targets.set(count as i64);
    }

    fn record_upstream_error(&self, kind: &str) {
        self.upstream_errors.with_label_values(&[kind]).inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family<'a>(families: &'a [MetricFamily], name: &str) -> &'a MetricFamily {
        families
            .iter()
            .find(|f| f.name() == name)
            .unwrap_or_else(|| panic!("metric {name} not found"))
    }

    #[test]
    fn can_create_prometheus_metrics() {
        let _metrics = PrometheusMetrics::new().expect("failed to create metrics");
    }

    #[test]
    fn record_poll_increments_counter_and_histogram() {
        let metrics = PrometheusMetrics::new().unwrap();

        metrics.record_poll(PollOutcome::Success, 12);
        metrics.record_poll(PollOutcome::Success, 30);
        metrics.record_poll(PollOutcome::Failure, 5);

        let families = metrics.gather();
        assert_eq!(family(&families, "hsd_polls_total").get_metric().len(), 2);
        assert_eq!(
            family(&families, "hsd_poll_duration_seconds").get_metric().len(),
            2
        );
    }

    #[test]
    fn record_targets_sets_gauge_to_last_value() {
        let metrics = PrometheusMetrics::new().unwrap();

        metrics.record_targets(7);
        metrics.record_targets(3);

        let text = metrics.encode_text().unwrap();
        assert!(text.contains("hsd_targets 3"), "{text}");
    }

    #[test]
    fn record_upstream_error_counts_per_kind() {
        let metrics = PrometheusMetrics::new().unwrap();

        metrics.record_upstream_error("status");
        metrics.record_upstream_error("status");
        metrics.record_upstream_error("decode");

        let families = metrics.gather();
        assert_eq!(
            family(&families, "hsd_upstream_errors_total").get_metric().len(),
            2
        );
    }

    #[test]
    fn encode_text_renders_exposition_format() {
        let metrics = PrometheusMetrics::new().unwrap();
        metrics.record_poll(PollOutcome::Timeout, 10_000);

        let text = metrics.encode_text().unwrap();
        assert!(text.contains("# TYPE hsd_polls_total counter"));
        assert!(text.contains(r#"hsd_polls_total{outcome="timeout"} 1"#));
    }

    #[test]
    fn duplicate_registration_fails() {
        let registry = Arc::new(Registry::new());
        let _first = PrometheusMetrics::new_with_registry(registry.clone()).unwrap();
        assert!(PrometheusMetrics::new_with_registry(registry).is_err());
    }
}
