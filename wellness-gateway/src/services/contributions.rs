//! Feature-importance → contributing-factor list.

use crate::models::ContributingFactor;

/// Multiplier applied to every importance weight.
pub const CONTRIBUTION_SCALE: f64 = 40.0;

/// Scale every importance by [`CONTRIBUTION_SCALE`] and order by descending
/// contribution. The sort is stable, so equal contributions keep the input
/// order. Nothing is dropped or added.
pub fn normalize_contributions<'a, I>(importances: I) -> Vec<ContributingFactor>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut factors: Vec<ContributingFactor> = importances
        .into_iter()
        .map(|(name, importance)| ContributingFactor {
            name: name.to_string(),
            scaled_contribution: importance * CONTRIBUTION_SCALE,
        })
        .collect();

    factors.sort_by(|a, b| b.scaled_contribution.total_cmp(&a.scaled_contribution));
    factors
}
