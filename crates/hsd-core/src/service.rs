use std::time::Instant;

use tracing::{debug, error, info};

use hsd_model::DiscoveryRecord;

use crate::{
    context::PollContext,
    error::FetchError,
    extract::extract_targets,
    fetch::InventorySource,
    metrics::{MetricsHandle, PollOutcome, noop_metrics},
};

/// Fetch-then-extract pipeline serving one poll at a time.
///
/// Holds no per-poll state; any number of polls may run concurrently.
pub struct DiscoveryService<S> {
    source: S,
    metrics: MetricsHandle,
}

impl<S> DiscoveryService<S>
where
    S: InventorySource,
{
    /// Create a service reading from `source`, with no-op metrics.
    pub fn new(source: S) -> Self {
        Self {
            source,
            metrics: noop_metrics(),
        }
    }

    /// Replace the metrics backend.
    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolve the current target list.
    pub async fn discover(&self, ctx: &PollContext) -> Result<Vec<DiscoveryRecord>, FetchError> {
        let started = Instant::now();
        let result = self.source.fetch(ctx).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(snapshot) => {
                let records = extract_targets(&snapshot);

                self.metrics.record_poll(PollOutcome::Success, elapsed_ms);
                self.metrics.record_targets(records.len());
                info!(
                    nodes = snapshot.len(),
                    targets = records.len(),
                    elapsed_ms,
                    "success response with targets"
                );
                Ok(records)
            }
            Err(err) => {
                self.metrics.record_poll(err.outcome(), elapsed_ms);
                match err {
                    // The poller went away; upstream did nothing wrong.
                    FetchError::Canceled => debug!(elapsed_ms, "poll canceled"),
                    ref err => {
                        self.metrics.record_upstream_error(err.kind());
                        error!(kind = err.kind(), elapsed_ms, "inventory fetch failed: {err}");
                    }
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use hsd_model::{InventorySnapshot, Node};

    use super::*;
    use crate::metrics::MetricsBackend;

    struct Canned(fn() -> Result<InventorySnapshot, FetchError>);

    #[async_trait]
    impl InventorySource for Canned {
        async fn fetch(&self, _: &PollContext) -> Result<InventorySnapshot, FetchError> {
            (self.0)()
        }
    }

    struct Stalled;

    #[async_trait]
    impl InventorySource for Stalled {
        async fn fetch(&self, ctx: &PollContext) -> Result<InventorySnapshot, FetchError> {
            ctx.run(async {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(InventorySnapshot::default())
            })
            .await
        }
    }

    #[derive(Default)]
    struct Recorded {
        polls: Mutex<Vec<PollOutcome>>,
        targets: Mutex<Vec<usize>>,
        errors: Mutex<Vec<String>>,
    }

    impl MetricsBackend for Recorded {
        fn record_poll(&self, outcome: PollOutcome, _: u64) {
            self.polls.lock().unwrap().push(outcome);
        }

        fn record_targets(&self, count: usize) {
            self.targets.lock().unwrap().push(count);
        }

        fn record_upstream_error(&self, kind: &str) {
            self.errors.lock().unwrap().push(kind.to_string());
        }
    }

    fn one_node() -> Result<InventorySnapshot, FetchError> {
        Ok(InventorySnapshot::new(vec![Node {
            given_name: "db1".into(),
            ip_addresses: vec!["10.0.0.5".into()],
            valid_tags: vec!["tag:scrape_9090_node_exporter".into(), "tag:env_prod".into()],
            ..Default::default()
        }]))
    }

    fn upstream_500() -> Result<InventorySnapshot, FetchError> {
        Err(FetchError::Status {
            status: 500,
            body: "boom".into(),
        })
    }

    #[tokio::test]
    async fn discover_extracts_and_records_success() {
        let metrics = Arc::new(Recorded::default());
        let svc = DiscoveryService::new(Canned(one_node)).with_metrics(metrics.clone());

        let records = svc.discover(&PollContext::default()).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].targets, vec!["10.0.0.5:9090".to_string()]);
        assert_eq!(*metrics.polls.lock().unwrap(), vec![PollOutcome::Success]);
        assert_eq!(*metrics.targets.lock().unwrap(), vec![1]);
        assert!(metrics.errors.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn discover_propagates_upstream_failure() {
        let metrics = Arc::new(Recorded::default());
        let svc = DiscoveryService::new(Canned(upstream_500)).with_metrics(metrics.clone());

        let err = svc.discover(&PollContext::default()).await.unwrap_err();

        assert!(matches!(err, FetchError::Status { status: 500, .. }));
        assert_eq!(*metrics.polls.lock().unwrap(), vec![PollOutcome::Failure]);
        assert_eq!(*metrics.errors.lock().unwrap(), vec!["status".to_string()]);
        assert!(metrics.targets.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn discover_classifies_timeout() {
        let metrics = Arc::new(Recorded::default());
        let svc = DiscoveryService::new(Stalled).with_metrics(metrics.clone());

        let ctx = PollContext::with_timeout(Duration::from_secs(2));
        let err = svc.discover(&ctx).await.unwrap_err();

        assert!(matches!(err, FetchError::Timeout { .. }));
        assert_eq!(*metrics.polls.lock().unwrap(), vec![PollOutcome::Timeout]);
        assert_eq!(*metrics.errors.lock().unwrap(), vec!["timeout".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn canceled_poll_is_not_an_upstream_error() {
        let metrics = Arc::new(Recorded::default());
        let svc = DiscoveryService::new(Stalled).with_metrics(metrics.clone());

        let ctx = PollContext::with_timeout(Duration::from_secs(60));
        ctx.cancel();
        let err = svc.discover(&ctx).await.unwrap_err();

        assert!(matches!(err, FetchError::Canceled));
        assert_eq!(*metrics.polls.lock().unwrap(), vec![PollOutcome::Canceled]);
        assert!(metrics.errors.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_polls_are_independent() {
        let svc = Arc::new(DiscoveryService::new(Canned(one_node)));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let svc = svc.clone();
                tokio::spawn(async move { svc.discover(&PollContext::default()).await })
            })
            .collect();

        for h in handles {
            let records = h.await.unwrap().unwrap();
            assert_eq!(records.len(), 1);
        }
    }
}
