//! Risk scoring weights and the score → category table
//!
//! All tuning for the risk scorer lives here; the scorer itself only reads
//! this structure.

use crate::models::{Metric, RiskCategory};
use serde::{Deserialize, Serialize};

/// Points added per true anomaly flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyWeights {
    /// Capacity anomaly (default: 3)
    pub capacity: u32,
    /// Distance spike (default: 2)
    pub distance: u32,
    /// Sprint spike (default: 2)
    pub sprints: u32,
    /// Heart rate (default: 0)
    pub heart_rate: u32,
}

impl Default for AnomalyWeights {
    fn default() -> Self {
        Self {
            capacity: 3,
            distance: 2,
            sprints: 2,
            heart_rate: 0,
        }
    }
}

impl AnomalyWeights {
    pub fn weight(&self, metric: Metric) -> u32 {
        match metric {
            Metric::Capacity => self.capacity,
            Metric::Distance => self.distance,
            Metric::Sprints => self.sprints,
            Metric::HeartRate => self.heart_rate,
        }
    }
}

/// Scores `>= min_score` (and below the next entry) map to `category`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryThreshold {
    pub min_score: u32,
    pub category: RiskCategory,
}

impl CategoryThreshold {
    pub const fn new(min_score: u32, category: RiskCategory) -> Self {
        Self {
            min_score,
            category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    pub weights: AnomalyWeights,
    /// Added once when the athlete has any earlier injury (default: 1)
    pub prior_injury_weight: u32,
    /// Score → category table; must contain a 0 entry
    pub categories: Vec<CategoryThreshold>,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            weights: AnomalyWeights::default(),
            prior_injury_weight: 1,
            categories: vec![
                CategoryThreshold::new(6, RiskCategory::VeryHigh),
                CategoryThreshold::new(4, RiskCategory::High),
                CategoryThreshold::new(2, RiskCategory::Moderate),
                CategoryThreshold::new(0, RiskCategory::Low),
            ],
        }
    }
}

impl RiskConfig {
    /// Table of the first-generation scorer (5 / 3 / 1 / 0)
    pub fn legacy() -> Self {
        Self {
            categories: vec![
                CategoryThreshold::new(5, RiskCategory::VeryHigh),
                CategoryThreshold::new(3, RiskCategory::High),
                CategoryThreshold::new(1, RiskCategory::Moderate),
                CategoryThreshold::new(0, RiskCategory::Low),
            ],
            ..Self::default()
        }
    }

    /// Checks that the table partitions every score exactly once and is
    /// ordinal (a higher band never maps to a lower category).
    pub fn validate(&self) -> Result<(), String> {
        if self.categories.is_empty() {
            return Err("risk.categories must not be empty".to_string());
        }

        let mut sorted = self.categories.clone();
        sorted.sort_by_key(|t| t.min_score);

        if sorted[0].min_score != 0 {
            return Err(format!(
                "risk.categories must start at score 0 (lowest entry is {})",
                sorted[0].min_score
            ));
        }

        for pair in sorted.windows(2) {
            if pair[0].min_score == pair[1].min_score {
                return Err(format!(
                    "risk.categories has duplicate min_score {}",
                    pair[0].min_score
                ));
            }
            if pair[1].category < pair[0].category {
                return Err(format!(
                    "risk.categories is not ordinal: score {} maps to {} but score {} maps to {}",
                    pair[0].min_score, pair[0].category, pair[1].min_score, pair[1].category
                ));
            }
        }

        Ok(())
    }
}
