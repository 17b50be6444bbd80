//! Application startup and lifecycle management.

use crate::config::{CorsConfig, GatewayConfig};
use crate::handlers::{chat, health, metrics, predict};
use crate::services::providers::gemini::{GeminiChatProvider, GeminiConfig};
use crate::services::providers::ChatProvider;
use crate::services::PredictionClient;
use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::{request_id_middleware, REQUEST_ID_HEADER},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub prediction_client: PredictionClient,
    pub chat_provider: Arc<dyn ChatProvider>,
}

impl AppState {
    pub fn from_config(config: GatewayConfig) -> Result<Self, AppError> {
        if !config.gemini.has_api_key() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "Gemini API key not configured"
            )));
        }

        let timeout = config.upstream.timeout();

        let prediction_client =
            PredictionClient::new(&config.ml_service.url, timeout).map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("Failed to build ML client: {}", e))
            })?;
        tracing::info!(
            endpoint = %prediction_client.base_url(),
            timeout_secs = config.upstream.timeout_secs,
            "Initialized ML inference client"
        );

        let gemini = GeminiChatProvider::new(GeminiConfig {
            api_key: config.gemini.api_key.clone(),
            api_base: config.gemini.api_base.clone(),
            model: config.gemini.model.clone(),
            timeout,
        })
        .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;
        tracing::info!(model = %config.gemini.model, "Initialized Gemini chat provider");

        Ok(Self {
            config: Arc::new(config),
            prediction_client,
            chat_provider: Arc::new(gemini),
        })
    }

    #[cfg(test)]
    pub(crate) fn for_tests(chat_provider: Arc<dyn ChatProvider>) -> Self {
        use crate::config::{GeminiSettings, MlServiceConfig, UpstreamConfig};
        use secrecy::Secret;

        let config = GatewayConfig {
            common: service_core::config::Config { port: 0 },
            ml_service: MlServiceConfig {
                url: "http://127.0.0.1:9".to_string(),
            },
            gemini: GeminiSettings {
                api_key: Secret::new("test-key".to_string()),
                api_base: "http://127.0.0.1:9".to_string(),
                model: "gemini-test".to_string(),
            },
            upstream: UpstreamConfig { timeout_secs: 1 },
            cors: CorsConfig::default(),
        };

        Self {
            prediction_client: PredictionClient::new(
                &config.ml_service.url,
                config.upstream.timeout(),
            )
            .expect("client builds"),
            config: Arc::new(config),
            chat_provider,
        }
    }
}

fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    if cors.allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::HeaderName::from_static(REQUEST_ID_HEADER)])
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(metrics::metrics))
        .route("/api/health", get(health::api_health))
        .route("/api/predict", post(predict::predict))
        .route("/api/assess", post(predict::assess))
        .route("/api/chat", post(chat::chat))
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri().path(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: GatewayConfig) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let state = AppState::from_config(config)?;

        // Port 0 = random port for testing
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Wellness gateway listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}
