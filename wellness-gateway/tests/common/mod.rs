#![allow(dead_code)]

use secrecy::Secret;
use service_core::config::Config as CoreConfig;
use wellness_gateway::config::{
    CorsConfig, GatewayConfig, GeminiSettings, MlServiceConfig, UpstreamConfig,
};
use wellness_gateway::startup::Application;
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "test-gemini-key";
pub const TEST_MODEL: &str = "gemini-test";

/// Path the Gemini mock must answer on for the test model.
pub fn generate_content_path() -> String {
    format!("/models/{}:generateContent", TEST_MODEL)
}

/// A form submission that passes validation.
pub fn valid_metrics() -> serde_json::Value {
    serde_json::json!({
        "age": 52,
        "bmi": 31.4,
        "bp_systolic": 145,
        "fasting_glucose": 118,
        "familyHistory": "1",
        "activityLevel": "0"
    })
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub ml_server: MockServer,
    pub gemini_server: MockServer,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let ml_server = MockServer::start().await;
        let gemini_server = MockServer::start().await;
        let ml_url = ml_server.uri();

        Self::spawn_with(ml_server, gemini_server, ml_url).await
    }

    /// Spawn with the ML service pointed at `ml_url` instead of the mock.
    pub async fn spawn_with_ml_url(ml_url: String) -> Self {
        let ml_server = MockServer::start().await;
        let gemini_server = MockServer::start().await;

        Self::spawn_with(ml_server, gemini_server, ml_url).await
    }

    async fn spawn_with(ml_server: MockServer, gemini_server: MockServer, ml_url: String) -> Self {
        let config = GatewayConfig {
            common: CoreConfig { port: 0 }, // Random port for testing
            ml_service: MlServiceConfig { url: ml_url },
            gemini: GeminiSettings {
                api_key: Secret::new(TEST_API_KEY.to_string()),
                api_base: gemini_server.uri(),
                model: TEST_MODEL.to_string(),
            },
            upstream: UpstreamConfig { timeout_secs: 5 },
            cors: CorsConfig::default(),
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the liveness endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            ml_server,
            gemini_server,
            client,
        }
    }

    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_raw(&self, path: &str, body: &str) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .header("content-type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
