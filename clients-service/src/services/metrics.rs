//! Prometheus export for clients-service.
//!
//! The exporter runs its own listener so the service router keeps only its
//! two routes.

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use service_core::error::AppError;
use std::net::SocketAddr;

/// Install the Prometheus recorder, scraped at `0.0.0.0:<port>/metrics`.
///
/// Without a port no recorder is installed and the `metrics` macros are no-ops.
pub fn init_metrics(port: Option<u16>) -> Result<(), AppError> {
    let Some(port) = port else {
        tracing::info!("Metrics export disabled");
        return Ok(());
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| {
            tracing::error!("Failed to install Prometheus exporter on {}: {}", addr, e);
            AppError::InternalError(anyhow::anyhow!("Metrics exporter error: {}", e))
        })?;

    tracing::info!("Prometheus exporter listening on {}", addr);
    Ok(())
}

/// Count a `/clients` lookup by outcome (`ok` or `error`).
pub fn record_clients_count(outcome: &'static str) {
    counter!("clients_count_requests_total", "outcome" => outcome).increment(1);
}
