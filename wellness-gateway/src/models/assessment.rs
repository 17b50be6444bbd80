use serde::Serialize;

/// Discretized risk classification of a predicted probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low Risk",
            RiskTier::Medium => "Medium Risk",
            RiskTier::High => "High Risk",
        }
    }

    /// Presentation token the UI maps onto its own colour scheme.
    pub fn style_token(&self) -> &'static str {
        match self {
            RiskTier::Low => "success",
            RiskTier::Medium => "warning",
            RiskTier::High => "danger",
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            RiskTier::Low => {
                "Your risk level is low. Continue to maintain a healthy lifestyle, including a \
                 balanced diet and regular physical activity. Regular check-ups are still \
                 recommended."
            }
            RiskTier::Medium => {
                "You are at a medium risk. It is advisable to focus on lifestyle modifications. \
                 Increase physical activity, monitor your diet closely, and consider consulting \
                 a doctor for personalized advice."
            }
            RiskTier::High => {
                "You are at a high risk. It is strongly recommended to consult a healthcare \
                 professional for a comprehensive evaluation and guidance. Immediate lifestyle \
                 changes in diet and exercise are crucial."
            }
        }
    }
}

/// One bar of the "key contributing factors" chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributingFactor {
    pub name: String,
    /// Importance weight multiplied by the chart scale.
    pub scaled_contribution: f64,
}

/// View data for a prediction result.
///
/// `tier` is decided on the exact probability while `probability_percent`
/// is rounded for display, so a probability just under a threshold (0.396)
/// shows as 40% with a Low tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub probability_percent: u8,
    pub tier: RiskTier,
    pub label: &'static str,
    pub style_token: &'static str,
    pub advice: &'static str,
    pub contributing_factors: Vec<ContributingFactor>,
}
