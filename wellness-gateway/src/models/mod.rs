//! Request/response models for the gateway endpoints.

pub mod assessment;
pub mod chat;
pub mod health_metrics;
pub mod prediction;

pub use assessment::{ContributingFactor, RiskAssessment, RiskTier};
pub use chat::{ChatMessage, ChatRequest, ChatResponse, ChatRole, Transcript};
pub use health_metrics::{FormNumber, HealthMetrics};
pub use prediction::{FeatureImportance, PredictionResult};
