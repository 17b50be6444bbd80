//! Client for the ML inference server.
//!
//! The gateway forwards the prediction payload exactly as it received it and
//! relays the server's JSON body without touching it.

use crate::services::metrics::{record_upstream_call, UpstreamOutcome, UPSTREAM_ML};
use axum::body::Bytes;
use reqwest::Client;
use serde::de::IgnoredAny;
use service_core::observability::TracedClientExt;
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictionError {
    /// The ML server answered with a non-success status.
    #[error("ML server returned status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The ML server could not be reached or timed out.
    #[error("ML server unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// The ML server answered 2xx with a body that is not JSON.
    #[error("ML server sent a malformed body: {0}")]
    Malformed(String),
}

impl PredictionError {
    fn outcome(&self) -> UpstreamOutcome {
        match self {
            PredictionError::Rejected { .. } => UpstreamOutcome::Rejected,
            PredictionError::Transport(_) => UpstreamOutcome::Unreachable,
            PredictionError::Malformed(_) => UpstreamOutcome::Invalid,
        }
    }
}

#[derive(Clone)]
pub struct PredictionClient {
    client: Client,
    base_url: String,
}

impl PredictionClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Forward `payload` to `POST {base}/api/predict` and return the raw
    /// response body. Single attempt, no retry.
    pub async fn predict(
        &self,
        payload: &serde_json::Value,
        request_id: Option<&str>,
    ) -> Result<Bytes, PredictionError> {
        let started = Instant::now();
        let result = self.send_prediction(payload, request_id).await;

        let outcome = match &result {
            Ok(_) => UpstreamOutcome::Success,
            Err(e) => e.outcome(),
        };
        record_upstream_call(UPSTREAM_ML, outcome, started.elapsed());

        result
    }

    async fn send_prediction(
        &self,
        payload: &serde_json::Value,
        request_id: Option<&str>,
    ) -> Result<Bytes, PredictionError> {
        let url = format!("{}/api/predict", self.base_url);

        tracing::debug!(url = %url, "Forwarding prediction request to ML server");

        let response = self
            .client
            .traced_post(&url)
            .json(payload)
            .send_with_request_id(request_id)
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PredictionError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;

        serde_json::from_slice::<IgnoredAny>(&body)
            .map_err(|e| PredictionError::Malformed(e.to_string()))?;

        Ok(body)
    }

    /// Probe the ML server's own health endpoint.
    pub async fn health_check(&self) -> Result<(), PredictionError> {
        let url = format!("{}/api/health", self.base_url);

        let response = self.client.traced_get(&url).send().await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(PredictionError::Rejected {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            })
        }
    }
}
