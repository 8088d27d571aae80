//! # Anomaly Detector
//!
//! Flags a reading that leaves its own rolling band `mean ± k·stddev`.
//! Comparisons are strict, so a zero-variance window can only flag a value
//! that differs from the mean itself. Missing readings and windows without
//! statistics never flag.

use super::window::RollingStats;
use crate::config::{AnomalyConfig, Direction};
use crate::models::{Metric, MetricValues};

pub fn is_anomalous(
    value: Option<f64>,
    stats: Option<RollingStats>,
    direction: Direction,
    k: f64,
) -> bool {
    let (value, stats) = match (value, stats) {
        (Some(v), Some(s)) => (v, s),
        _ => return false,
    };

    let upper = stats.mean + k * stats.stddev;
    let lower = stats.mean - k * stats.stddev;

    match direction {
        Direction::Symmetric => value < lower || value > upper,
        Direction::HighOnly => value > upper,
        Direction::Ignored => false,
    }
}

/// Flags for every tracked metric of one observation.
pub fn detect(
    readings: &MetricValues<Option<f64>>,
    stats: &MetricValues<Option<RollingStats>>,
    config: &AnomalyConfig,
) -> MetricValues<bool> {
    MetricValues::from_fn(|metric: Metric| {
        is_anomalous(
            *readings.get(metric),
            *stats.get(metric),
            config.direction(metric),
            config.k,
        )
    })
}
