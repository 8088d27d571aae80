//! # Analysis Module
//!
//! Per-athlete analytics over one chronologically ordered sequence.
//!
//! - `window` - rolling mean / sample stddev per metric
//! - `anomaly` - band checks against the rolling baseline
//! - `workload` - acute / chronic load sums and their ratio
//! - `injury` - prior injury count and days since last injury
//! - `risk` - score and category
//!
//! [`EntityState`] carries every running accumulator for one athlete; a
//! sequence is enriched by a single ordered fold over it.

pub mod anomaly;
pub mod injury;
pub mod risk;
pub mod window;
pub mod workload;

pub use injury::{InjuryHistory, InjuryState};
pub use window::{MetricWindows, RingBuffer, RollingStats, RollingWindow};
pub use workload::{WorkloadSnapshot, WorkloadTracker};

use crate::config::EngineConfig;
use crate::models::{EnrichedObservation, Metric, RawObservation};
use crate::sequence::EntitySequence;

/// Running state of one athlete's fold
#[derive(Debug, Clone)]
pub struct EntityState {
    windows: MetricWindows,
    workload: WorkloadTracker,
    injuries: InjuryState,
}

impl EntityState {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            windows: MetricWindows::new(config.window.size),
            workload: WorkloadTracker::new(&config.workload),
            injuries: InjuryState::new(),
        }
    }

    /// Enrich the next observation. Callers must feed observations in
    /// ascending timestamp order.
    pub fn step(
        &mut self,
        canonical_id: Option<&str>,
        obs: &RawObservation,
        config: &EngineConfig,
    ) -> EnrichedObservation {
        let stats = self.windows.push(&obs.metrics);
        let anomaly = anomaly::detect(&obs.metrics, &stats, &config.anomaly);

        let load = self
            .workload
            .push(obs.timestamp, obs.metric(Metric::LOAD))
            .rounded(config.workload.output_decimals);

        let history = self.injuries.observe(obs.timestamp, obs.injury_occurred);

        let risk_score = risk::score(&anomaly, history.prior_injury_count, &config.risk);
        let risk_category = risk::categorize(risk_score, &config.risk);

        EnrichedObservation {
            raw: obs.clone(),
            canonical_id: canonical_id.map(str::to_string),
            rolling_mean: stats.map(|_, s| s.map(|s| s.mean)),
            rolling_stddev: stats.map(|_, s| s.map(|s| s.stddev)),
            anomaly,
            acute_load: load.acute_load,
            chronic_load: load.chronic_load,
            load_ratio: load.load_ratio,
            days_since_last_injury: history.days_since_last_injury,
            prior_injury_count: history.prior_injury_count,
            risk_score,
            risk_category,
        }
    }
}

/// Enrich one athlete's ordered sequence.
pub fn enrich_sequence(sequence: &EntitySequence, config: &EngineConfig) -> Vec<EnrichedObservation> {
    let id = sequence.canonical_id.as_deref();
    sequence
        .observations
        .iter()
        .scan(EntityState::new(config), |state, obs| {
            Some(state.step(id, obs, config))
        })
        .collect()
}
