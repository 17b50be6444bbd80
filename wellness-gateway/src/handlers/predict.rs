use crate::models::{HealthMetrics, PredictionResult, RiskAssessment};
use crate::services::{assess as build_assessment, PredictionError};
use crate::startup::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};
use service_core::error::AppError;
use service_core::middleware::tracing::RequestId;
use validator::Validate;

const INVALID_INPUT: &str = "Invalid prediction input";
const ML_PREDICTION_FAILED: &str = "ML prediction failed";

/// `POST /api/predict`: validate and forward to the ML server, relaying its
/// body verbatim.
#[tracing::instrument(skip_all)]
pub async fn predict(
    State(state): State<AppState>,
    request_id: Option<Extension<RequestId>>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let prediction = forward_prediction(&state, request_id.as_ref(), body).await?;

    Ok((
        [(header::CONTENT_TYPE, "application/json")],
        prediction,
    )
        .into_response())
}

/// `POST /api/assess`: same upstream call as `predict`, answered with the
/// classified risk assessment instead of the raw prediction.
#[tracing::instrument(skip_all)]
pub async fn assess(
    State(state): State<AppState>,
    request_id: Option<Extension<RequestId>>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<RiskAssessment>, AppError> {
    let prediction = forward_prediction(&state, request_id.as_ref(), body).await?;

    let result: PredictionResult = serde_json::from_slice(&prediction).map_err(|e| {
        tracing::error!(error = %e, "ML server response is not a prediction result");
        AppError::InternalError(anyhow::anyhow!("Unexpected ML response shape: {}", e))
    })?;

    let assessment = build_assessment(&result);
    tracing::info!(
        probability_percent = assessment.probability_percent,
        tier = ?assessment.tier,
        "Risk assessment computed"
    );

    Ok(Json(assessment))
}

async fn forward_prediction(
    state: &AppState,
    request_id: Option<&Extension<RequestId>>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Bytes, AppError> {
    let Json(payload) = body.map_err(|e| {
        tracing::warn!(error = %e, "Rejected prediction body");
        AppError::BadRequest(anyhow::anyhow!(INVALID_INPUT))
    })?;

    // Serde would also fill the struct from an array by position.
    if !payload.is_object() {
        tracing::warn!("Prediction payload is not a JSON object");
        return Err(AppError::BadRequest(anyhow::anyhow!(INVALID_INPUT)));
    }

    let metrics: HealthMetrics = serde_json::from_value(payload.clone()).map_err(|e| {
        tracing::warn!(error = %e, "Prediction payload has wrong field types");
        AppError::BadRequest(anyhow::anyhow!(INVALID_INPUT))
    })?;

    metrics.validate().map_err(|e| {
        tracing::warn!(error = %e, "Prediction payload failed validation");
        AppError::BadRequest(anyhow::anyhow!(INVALID_INPUT))
    })?;

    state
        .prediction_client
        .predict(&payload, request_id.map(|Extension(id)| id.as_str()))
        .await
        .map_err(map_prediction_error)
}

fn map_prediction_error(err: PredictionError) -> AppError {
    match err {
        PredictionError::Rejected { status, body } => {
            tracing::error!(status, upstream_body = %body, "ML server rejected prediction");
            AppError::UpstreamRejected {
                status,
                message: ML_PREDICTION_FAILED.to_string(),
            }
        }
        PredictionError::Transport(e) => {
            tracing::error!(error = %e, "Prediction Error: ML server unreachable");
            AppError::InternalError(anyhow::Error::new(e))
        }
        PredictionError::Malformed(detail) => {
            tracing::error!(error = %detail, "Prediction Error: malformed ML response");
            AppError::InternalError(anyhow::anyhow!(detail))
        }
    }
}
