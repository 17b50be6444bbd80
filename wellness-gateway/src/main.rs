use service_core::middleware::metrics::init_metrics;
use service_core::observability::init_tracing;
use wellness_gateway::config::GatewayConfig;
use wellness_gateway::startup::Application;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    // Span export is opt-in; logs always go to stdout.
    let otlp_endpoint = std::env::var("OTLP_ENDPOINT").ok();
    init_tracing("wellness-gateway", "info", otlp_endpoint.as_deref());
    init_metrics().map_err(|e| {
        tracing::error!("Failed to initialize metrics: {}", e);
        std::io::Error::other(format!("Metrics error: {}", e))
    })?;

    let config = GatewayConfig::load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    tracing::info!(
        port = config.common.port,
        ml_service = %config.ml_service.url,
        model = %config.gemini.model,
        "Starting wellness gateway"
    );

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    app.run_until_stopped().await
}
