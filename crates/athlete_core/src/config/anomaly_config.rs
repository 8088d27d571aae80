//! Anomaly detection parameters

use crate::models::Metric;
use serde::{Deserialize, Serialize};

/// Which side of the rolling baseline counts as anomalous
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Below mean - k·sd or above mean + k·sd
    Symmetric,
    /// Above mean + k·sd only
    HighOnly,
    /// Never flagged
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyConfig {
    /// Standard-deviation multiplier (k, default: 2.0)
    pub k: f64,
    /// Capacity estimate direction (default: symmetric)
    pub capacity: Direction,
    /// Distance direction (default: high_only)
    pub distance: Direction,
    /// Sprint count direction (default: high_only)
    pub sprints: Direction,
    /// Heart rate direction (default: ignored)
    pub heart_rate: Direction,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            k: 2.0,
            capacity: Direction::Symmetric,
            distance: Direction::HighOnly,
            sprints: Direction::HighOnly,
            heart_rate: Direction::Ignored,
        }
    }
}

impl AnomalyConfig {
    pub fn direction(&self, metric: Metric) -> Direction {
        match metric {
            Metric::Capacity => self.capacity,
            Metric::Distance => self.distance,
            Metric::Sprints => self.sprints,
            Metric::HeartRate => self.heart_rate,
        }
    }
}
