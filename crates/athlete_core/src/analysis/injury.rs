//! # Injury History Tracker
//!
//! Running injury count and last injury date for one athlete, walked in
//! chronological order. Outputs for an observation are read *before* its own
//! injury flag is applied, so an injury shows up from the next observation on.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Injury history as seen by one observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjuryHistory {
    /// Injuries strictly before this observation
    pub prior_injury_count: u32,
    /// Calendar days since the most recent earlier injury
    pub days_since_last_injury: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InjuryState {
    count: u32,
    last_injury: Option<NaiveDate>,
}

impl InjuryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn last_injury(&self) -> Option<NaiveDate> {
        self.last_injury
    }

    /// History at `date`, then fold in this observation's injury flag.
    pub fn observe(&mut self, date: NaiveDate, injury_occurred: bool) -> InjuryHistory {
        let history = InjuryHistory {
            prior_injury_count: self.count,
            days_since_last_injury: self.last_injury.map(|last| (date - last).num_days()),
        };

        if injury_occurred {
            self.count += 1;
            self.last_injury = Some(date);
        }

        history
    }
}
