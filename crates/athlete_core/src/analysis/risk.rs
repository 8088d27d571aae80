//! # Risk Scorer
//!
//! Weighted sum of anomaly flags plus a prior-injury point, mapped through
//! the configured category table. Weights and cut-offs come only from
//! [`RiskConfig`].

use crate::config::RiskConfig;
use crate::models::{MetricValues, RiskCategory};

/// Saturates at `u32::MAX` so oversized weights land in the top band.
pub fn score(anomaly: &MetricValues<bool>, prior_injury_count: u32, config: &RiskConfig) -> u32 {
    let anomaly_points = anomaly
        .iter()
        .filter(|(_, flagged)| **flagged)
        .map(|(metric, _)| config.weights.weight(metric))
        .fold(0u32, u32::saturating_add);

    let injury_points = if prior_injury_count > 0 {
        config.prior_injury_weight
    } else {
        0
    };

    anomaly_points.saturating_add(injury_points)
}

/// Category of the highest band whose `min_score` the score reaches.
/// A validated table always has a 0 band; `Low` is the fallback otherwise.
pub fn categorize(score: u32, config: &RiskConfig) -> RiskCategory {
    config
        .categories
        .iter()
        .filter(|t| score >= t.min_score)
        .max_by_key(|t| t.min_score)
        .map(|t| t.category)
        .unwrap_or(RiskCategory::Low)
}
