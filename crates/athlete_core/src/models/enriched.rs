use super::observation::{MetricValues, RawObservation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal injury-risk label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskCategory {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl RiskCategory {
    pub fn display_text(&self) -> &'static str {
        match self {
            RiskCategory::Low => "Low",
            RiskCategory::Moderate => "Moderate",
            RiskCategory::High => "High",
            RiskCategory::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_text())
    }
}

/// A raw observation plus everything the engine derives for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedObservation {
    pub raw: RawObservation,
    /// Registry id, the raw label when unresolved, `None` when the label was empty
    pub canonical_id: Option<String>,
    /// `None` when the window holds no reading for the metric
    pub rolling_mean: MetricValues<Option<f64>>,
    pub rolling_stddev: MetricValues<Option<f64>>,
    pub anomaly: MetricValues<bool>,
    pub acute_load: f64,
    pub chronic_load: f64,
    pub load_ratio: f64,
    pub days_since_last_injury: Option<i64>,
    pub prior_injury_count: u32,
    pub risk_score: u32,
    pub risk_category: RiskCategory,
}

impl EnrichedObservation {
    pub fn any_anomaly(&self) -> bool {
        self.anomaly.iter().any(|(_, flag)| *flag)
    }
}
