pub mod contributions;
pub mod metrics;
pub mod prediction_client;
pub mod providers;
pub mod risk;

pub use contributions::{normalize_contributions, CONTRIBUTION_SCALE};
pub use prediction_client::{PredictionClient, PredictionError};
pub use risk::{assess, classify, RiskClassification};
