//! Risk classification of a predicted probability.

use crate::models::{PredictionResult, RiskAssessment, RiskTier};
use crate::services::contributions::normalize_contributions;

/// Probability at which the tier becomes Medium.
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.40;
/// Probability at which the tier becomes High.
pub const HIGH_RISK_THRESHOLD: f64 = 0.70;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskClassification {
    pub probability_percent: u8,
    pub tier: RiskTier,
}

/// Rounded percentage, clamped to 0..=100. NaN counts as 0.
pub fn probability_percent(probability: f64) -> u8 {
    if probability.is_nan() {
        return 0;
    }
    (probability * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Tier for a probability. Thresholds compare against the exact value so
/// 0.4 is Medium and 0.7 is High regardless of float rounding in `p * 100`.
pub fn tier_for(probability: f64) -> RiskTier {
    if probability.is_nan() || probability < MEDIUM_RISK_THRESHOLD {
        RiskTier::Low
    } else if probability < HIGH_RISK_THRESHOLD {
        RiskTier::Medium
    } else {
        RiskTier::High
    }
}

pub fn classify(probability: f64) -> RiskClassification {
    RiskClassification {
        probability_percent: probability_percent(probability),
        tier: tier_for(probability),
    }
}

/// Build the view data for a prediction.
pub fn assess(prediction: &PredictionResult) -> RiskAssessment {
    let classification = classify(prediction.probability);
    let tier = classification.tier;

    RiskAssessment {
        probability_percent: classification.probability_percent,
        tier,
        label: tier.label(),
        style_token: tier.style_token(),
        advice: tier.advice(),
        contributing_factors: normalize_contributions(prediction.feature_importance.iter()),
    }
}
