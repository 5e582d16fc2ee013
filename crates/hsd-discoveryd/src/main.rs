mod config;

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use hsd_api::{DiscoveryApi, MetricsApi};
use hsd_core::{DiscoveryService, HeadscaleClient};
use hsd_observe::{init_local_offset, init_logger};
use hsd_prometheus::PrometheusMetrics;

use crate::config::DaemonConfig;

fn main() -> anyhow::Result<()> {
    // before the runtime spawns threads
    init_local_offset();

    let cfg = DaemonConfig::from_env().context("invalid configuration")?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(Arc::new(cfg)))
}

async fn run(cfg: Arc<DaemonConfig>) -> anyhow::Result<()> {
    // 1) logger
    init_logger(&cfg.logger)?;

    // 2) upstream client + pipeline
    let client = HeadscaleClient::new(&cfg.api_url, cfg.api_key.clone())?;
    let upstream = client.url().to_string();
    let mut service = DiscoveryService::new(client);

    // 3) optional metrics listener
    let mut metrics_server = None;
    if let Some(addr) = cfg.metrics_addr {
        let metrics = Arc::new(PrometheusMetrics::new()?);
        service = service.with_metrics(metrics.clone());

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("cant listen on {addr}"))?;
        metrics_server = Some((listener, MetricsApi::new(metrics).router()));
        info!(%addr, "metrics endpoint enabled");
    }

    // 4) discovery listener
    let router = DiscoveryApi::new(Arc::new(service))
        .with_upstream_timeout(cfg.upstream_timeout)
        .router();
    let listener = TcpListener::bind(cfg.listen_addr)
        .await
        .with_context(|| format!("cant start server on {}", cfg.listen_addr))?;
    info!(
        listen = %cfg.listen_addr,
        %upstream,
        timeout_ms = cfg.upstream_timeout.as_millis() as u64,
        "serving discovery targets"
    );

    // 5) serve until a shutdown signal
    let shutdown = CancellationToken::new();
    tokio::spawn(watch_signals(shutdown.clone()));

    let discovery = async {
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown.clone().cancelled_owned())
            .await
            .context("discovery server failed")
    };
    let metrics = async {
        match metrics_server {
            Some((listener, router)) => axum::serve(listener, router)
                .with_graceful_shutdown(shutdown.clone().cancelled_owned())
                .await
                .context("metrics server failed"),
            None => Ok(()),
        }
    };
    tokio::try_join!(discovery, metrics)?;

    info!("shutdown complete");
    Ok(())
}

async fn watch_signals(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("cant listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("cant listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received ctrl-c, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
    shutdown.cancel();
}
