//! Upstream call metrics for the gateway.
//!
//! Recorded through the `metrics` facade; the Prometheus recorder installed
//! by `service_core::middleware::metrics::init_metrics` renders them on
//! `/metrics`.

use metrics::{counter, histogram};
use std::time::Duration;

pub const UPSTREAM_ML: &str = "ml_inference";
pub const UPSTREAM_GEMINI: &str = "gemini";

/// How an upstream call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamOutcome {
    Success,
    Rejected,
    Invalid,
    Unreachable,
}

impl UpstreamOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamOutcome::Success => "success",
            UpstreamOutcome::Rejected => "rejected",
            UpstreamOutcome::Invalid => "invalid",
            UpstreamOutcome::Unreachable => "unreachable",
        }
    }
}

pub fn record_upstream_call(upstream: &'static str, outcome: UpstreamOutcome, elapsed: Duration) {
    let labels = [("upstream", upstream), ("outcome", outcome.as_str())];

    counter!("upstream_requests_total", &labels).increment(1);
    histogram!("upstream_request_duration_seconds", &labels).record(elapsed.as_secs_f64());
}
