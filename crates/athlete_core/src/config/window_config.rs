//! Rolling-window and workload window sizes

use serde::{Deserialize, Serialize};

/// Trailing observation window for rolling baselines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Observations per window, current one included (W, default: 7)
    pub size: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { size: 7 }
    }
}

/// Acute/chronic workload windows (calendar days)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadConfig {
    /// Short window (A, default: 7 days)
    pub acute_days: i64,
    /// Long window (C, default: 28 days)
    pub chronic_days: i64,
    /// Decimal places for load columns at output (default: 2)
    pub output_decimals: u32,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            acute_days: 7,
            chronic_days: 28,
            output_decimals: 2,
        }
    }
}
