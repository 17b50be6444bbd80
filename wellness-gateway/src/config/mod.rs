use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use service_core::config::{self as core_config, get_env, is_production};
use service_core::error::AppError;
use std::time::Duration;

/// Default per-call timeout applied to both upstreams.
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub ml_service: MlServiceConfig,
    pub gemini: GeminiSettings,
    pub upstream: UpstreamConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MlServiceConfig {
    /// Base URL of the ML inference server, e.g. `http://localhost:3002`.
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    pub api_key: Secret<String>,
    /// REST base, e.g. `https://generativelanguage.googleapis.com/v1beta`.
    pub api_base: String,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    pub timeout_secs: u64,
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CorsConfig {
    /// Allowed origins. Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl GatewayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = is_production();

        let api_key = get_env("GEMINI_API_KEY", None, is_prod)?;
        if api_key.trim().is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "GEMINI_API_KEY is set but empty"
            )));
        }

        let timeout_secs = get_env(
            "UPSTREAM_TIMEOUT_SECS",
            Some(&DEFAULT_UPSTREAM_TIMEOUT_SECS.to_string()),
            is_prod,
        )?
        .parse::<u64>()
        .map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!(
                "UPSTREAM_TIMEOUT_SECS must be a whole number of seconds: {}",
                e
            ))
        })?;
        if timeout_secs == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "UPSTREAM_TIMEOUT_SECS must be greater than zero"
            )));
        }

        Ok(GatewayConfig {
            common: common_config,
            ml_service: MlServiceConfig {
                url: get_env("ML_SERVICE_URL", Some("http://localhost:3002"), is_prod)?,
            },
            gemini: GeminiSettings {
                api_key: Secret::new(api_key),
                api_base: get_env(
                    "GEMINI_API_BASE",
                    Some("https://generativelanguage.googleapis.com/v1beta"),
                    is_prod,
                )?,
                model: get_env(
                    "GEMINI_MODEL",
                    Some("gemini-2.5-flash-preview-05-20"),
                    is_prod,
                )?,
            },
            upstream: UpstreamConfig { timeout_secs },
            cors: CorsConfig {
                allowed_origins: parse_origins(&get_env(
                    "CORS_ALLOWED_ORIGINS",
                    Some("*"),
                    is_prod,
                )?),
            },
        })
    }
}

impl GeminiSettings {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.expose_secret().is_empty()
    }
}

/// Split a comma-separated origin list. `*` anywhere in the list means any
/// origin.
fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();

    if origins.iter().any(|o| o == "*") {
        Vec::new()
    } else {
        origins
    }
}
