//! # Workload Ratio Calculator
//!
//! Acute (short) and chronic (long) trailing sums of the load metric over
//! calendar days, and their ratio.
//!
//! An observation dated `d` is inside an `N`-day window ending at `t` when
//! `0 <= t - d < N` days, i.e. the window covers `t` and the `N - 1` days
//! before it. Only observations already processed count, so a later row on
//! the same date does not leak into an earlier one.

use crate::config::WorkloadConfig;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Full-precision workload figures at one observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkloadSnapshot {
    pub acute_load: f64,
    pub chronic_load: f64,
    /// `acute / chronic`, or 0 when chronic is 0
    pub load_ratio: f64,
}

impl WorkloadSnapshot {
    pub fn rounded(&self, decimals: u32) -> Self {
        Self {
            acute_load: round_to(self.acute_load, decimals),
            chronic_load: round_to(self.chronic_load, decimals),
            load_ratio: round_to(self.load_ratio, decimals),
        }
    }
}

pub fn load_ratio(acute: f64, chronic: f64) -> f64 {
    if chronic > 0.0 {
        acute / chronic
    } else {
        0.0
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Per-athlete running window of dated loads.
#[derive(Debug, Clone)]
pub struct WorkloadTracker {
    acute_days: i64,
    chronic_days: i64,
    /// Loads inside the chronic window, oldest first
    entries: VecDeque<(NaiveDate, f64)>,
}

impl WorkloadTracker {
    pub fn new(config: &WorkloadConfig) -> Self {
        Self {
            acute_days: config.acute_days,
            chronic_days: config.chronic_days,
            entries: VecDeque::new(),
        }
    }

    /// Record the next observation (ascending dates) and return the sums.
    /// A missing load adds nothing but still advances the window.
    pub fn push(&mut self, date: NaiveDate, load: Option<f64>) -> WorkloadSnapshot {
        if let Some(load) = load {
            self.entries.push_back((date, load));
        }

        while let Some(&(oldest, _)) = self.entries.front() {
            if (date - oldest).num_days() >= self.chronic_days {
                self.entries.pop_front();
            } else {
                break;
            }
        }

        let mut acute = 0.0;
        let mut chronic = 0.0;
        for &(d, load) in &self.entries {
            chronic += load;
            if (date - d).num_days() < self.acute_days {
                acute += load;
            }
        }

        WorkloadSnapshot {
            acute_load: acute,
            chronic_load: chronic,
            load_ratio: load_ratio(acute, chronic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2002, 3, 1).unwrap() + chrono::Duration::days(n as i64 - 1)
    }

    fn tracker() -> WorkloadTracker {
        WorkloadTracker::new(&WorkloadConfig::default())
    }

    #[test]
    fn test_first_observation_ratio_is_one() {
        let snap = tracker().push(day(1), Some(9.5));
        assert_eq!(snap.acute_load, 9.5);
        assert_eq!(snap.chronic_load, 9.5);
        assert_eq!(snap.load_ratio, 1.0);
    }

    #[test]
    fn test_zero_chronic_load_gives_zero_ratio() {
        let mut t = tracker();
        let snap = t.push(day(1), None);
        assert_eq!(snap.load_ratio, 0.0);
        let snap = t.push(day(2), Some(0.0));
        assert_eq!(snap.chronic_load, 0.0);
        assert_eq!(snap.load_ratio, 0.0);
        assert!(!snap.load_ratio.is_nan());
    }

    #[test]
    fn test_acute_window_boundary() {
        let mut t = tracker();
        t.push(day(1), Some(10.0));
        // day 7 is 6 days later: still acute
        let snap = t.push(day(7), Some(5.0));
        assert_eq!(snap.acute_load, 15.0);
        // day 8 is 7 days after day 1: only chronic
        let snap = t.push(day(8), Some(1.0));
        assert_eq!(snap.acute_load, 6.0);
        assert_eq!(snap.chronic_load, 16.0);
    }

    #[test]
    fn test_chronic_window_evicts_old_loads() {
        let mut t = tracker();
        t.push(day(1), Some(10.0));
        let snap = t.push(day(28), Some(2.0));
        assert_eq!(snap.chronic_load, 12.0);
        let snap = t.push(day(29), Some(3.0));
        assert_eq!(snap.chronic_load, 5.0);
    }

    #[test]
    fn test_spike_raises_ratio() {
        let mut t = tracker();
        for d in (1..=22).step_by(3) {
            t.push(day(d), Some(8.0));
        }
        let snap = t.push(day(25), Some(20.0));
        assert!(snap.load_ratio > 0.3);
        assert!(snap.acute_load <= snap.chronic_load);
    }

    #[test]
    fn test_max_decimals_never_produce_nan() {
        let decimals = crate::config::MAX_OUTPUT_DECIMALS;
        let mut t = tracker();
        let snap = t.push(day(1), None).rounded(decimals);
        assert_eq!(snap.load_ratio, 0.0);
        assert_eq!(snap.acute_load, 0.0);
        let snap = t.push(day(2), Some(5.0)).rounded(decimals);
        assert_eq!(snap.acute_load, 5.0);
        assert_eq!(snap.load_ratio, 1.0);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(0.125, 2), 0.13);
        assert_eq!(round_to(2.0 / 3.0, 2), 0.67);
        let snap = WorkloadSnapshot {
            acute_load: 10.004,
            chronic_load: 30.0,
            load_ratio: 10.004 / 30.0,
        }
        .rounded(2);
        assert_eq!(snap.acute_load, 10.0);
        assert_eq!(snap.load_ratio, 0.33);
    }
}
