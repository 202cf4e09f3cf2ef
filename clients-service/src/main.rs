use clients_service::config::ClientsConfig;
use clients_service::services::init_metrics;
use clients_service::startup::{shutdown_signal, Application};
use service_core::observability::{init_tracing, shutdown_tracing};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Nothing is bound or dialled until the whole configuration is valid.
    let config = ClientsConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_tracing(
        "clients-service",
        &config.telemetry.log_level,
        config.telemetry.otlp_endpoint.as_deref(),
    );

    let result = run(config).await;
    shutdown_tracing();
    result
}

async fn run(config: ClientsConfig) -> std::io::Result<()> {
    init_metrics(config.telemetry.metrics_port).map_err(|e| {
        tracing::error!("Failed to initialize metrics: {}", e);
        std::io::Error::other(format!("Metrics error: {}", e))
    })?;

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to start clients-service: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    app.run_until_stopped(shutdown_signal()).await
}
