//! # Engine
//!
//! raw rows → identity reconciliation → temporal sequencing → per-athlete
//! fold (rolling stats, workload, injury history, anomalies, risk) →
//! enriched rows.
//!
//! Athletes are independent, so their folds run in parallel once there are
//! enough of them; each fold is strictly sequential in time. Output order
//! is the sequencer's order either way.

use crate::analysis::enrich_sequence;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::identity::{IndelRatio, MatchMethod, Reconciler, Resolution, SimilarityMatcher};
use crate::models::{EnrichedObservation, RawObservation};
use crate::report::ReconciliationReport;
use crate::sequence::{sequence, EntitySequence};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

/// Below this many athletes the folds run on the calling thread.
const PARALLEL_MIN_ENTITIES: usize = 8;

/// Result of one engine run
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Grouped by canonical id (sorted), chronological within each athlete;
    /// rows without an id last, in input order
    pub rows: Vec<EnrichedObservation>,
    pub reconciliation: ReconciliationReport,
    pub entity_count: usize,
}

pub struct Engine<M = IndelRatio> {
    config: EngineConfig,
    reconciler: Reconciler<M>,
}

impl Engine<IndelRatio> {
    /// Validates the configuration up front; a built engine cannot fail.
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_matcher(config, IndelRatio)
    }
}

impl<M: SimilarityMatcher> Engine<M> {
    pub fn with_matcher(config: EngineConfig, matcher: M) -> Result<Self> {
        config.validate()?;
        let reconciler = Reconciler::with_matcher(&config.identity, matcher);
        Ok(Self { config, reconciler })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn reconciler(&self) -> &Reconciler<M> {
        &self.reconciler
    }

    /// Resolve every distinct label once.
    pub fn reconcile(&self, observations: &[RawObservation]) -> ReconciliationReport {
        let (_, report) = self.resolve_labels(observations);
        report
    }

    pub fn run(&self, observations: Vec<RawObservation>) -> RunOutput {
        let row_count = observations.len();
        let (resolved, reconciliation) = self.resolve_labels(&observations);

        let keyed = observations.into_iter().map(|obs| {
            let canonical = raw_key(&obs)
                .and_then(|k| resolved.get(k))
                .and_then(|r| r.canonical.clone());
            (canonical, obs)
        });
        let sequences = sequence(keyed);
        let entity_count = sequences
            .iter()
            .filter(|s| s.canonical_id.is_some())
            .count();

        let rows = self.enrich_all(&sequences);

        info!(
            rows = row_count,
            entities = entity_count,
            unresolved_rows = reconciliation.counts.unresolved,
            unlabelled_rows = reconciliation.counts.missing,
            "engine run complete"
        );

        RunOutput {
            rows,
            reconciliation,
            entity_count,
        }
    }

    fn enrich_all(&self, sequences: &[EntitySequence]) -> Vec<EnrichedObservation> {
        let enrich = |seq: &EntitySequence| {
            debug!(
                entity = seq.canonical_id.as_deref().unwrap_or("<unlabelled>"),
                observations = seq.len(),
                "enriching sequence"
            );
            enrich_sequence(seq, &self.config)
        };

        let per_entity: Vec<Vec<EnrichedObservation>> = if sequences.len() >= PARALLEL_MIN_ENTITIES
        {
            sequences.par_iter().map(enrich).collect()
        } else {
            sequences.iter().map(enrich).collect()
        };

        per_entity.into_iter().flatten().collect()
    }

    fn resolve_labels(
        &self,
        observations: &[RawObservation],
    ) -> (FxHashMap<String, Resolution>, ReconciliationReport) {
        let mut resolved: FxHashMap<String, Resolution> = FxHashMap::default();
        let mut rows_per_label: FxHashMap<String, usize> = FxHashMap::default();
        let mut missing_rows = 0usize;

        for obs in observations {
            match raw_key(obs) {
                Some(label) => {
                    *rows_per_label.entry(label.to_string()).or_insert(0) += 1;
                    if !resolved.contains_key(label) {
                        let resolution = self.reconciler.classify(Some(label));
                        if let MatchMethod::Unresolved { best_score } = resolution.method {
                            warn!(
                                label,
                                best_score = best_score.unwrap_or(0),
                                threshold = self.reconciler.threshold(),
                                "no confident roster match; keeping raw label"
                            );
                        }
                        resolved.insert(label.to_string(), resolution);
                    }
                }
                None => missing_rows += 1,
            }
        }

        if missing_rows > 0 {
            warn!(rows = missing_rows, "rows without an athlete label");
        }

        let mut triples: Vec<(Option<String>, Resolution, usize)> = resolved
            .iter()
            .map(|(label, res)| {
                let rows = rows_per_label.get(label).copied().unwrap_or(0);
                (Some(label.clone()), res.clone(), rows)
            })
            .collect();
        if missing_rows > 0 {
            triples.push((None, self.reconciler.classify(None), missing_rows));
        }

        (resolved, ReconciliationReport::from_resolutions(triples))
    }
}

/// Raw label text of a row whose label is not blank. Memo key: equal raw
/// text resolves identically.
fn raw_key(obs: &RawObservation) -> Option<&str> {
    obs.label().and(obs.raw_entity_label.as_deref())
}

/// One-shot run with the default similarity metric.
pub fn run(observations: Vec<RawObservation>, config: EngineConfig) -> Result<RunOutput> {
    Ok(Engine::new(config)?.run(observations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Metric, Position, RiskCategory};
    use crate::report::{output_digest, summarize};
    use chrono::NaiveDate;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2002, 3, 1).unwrap() + chrono::Duration::days(n as i64 - 1)
    }

    fn squad_feed() -> Vec<RawObservation> {
        let roster = crate::models::default_roster();
        let mut rows = Vec::new();
        for d in (1..=60).step_by(3) {
            for (i, entity) in roster.iter().enumerate() {
                let label = if entity.id == "Ronaldo" && d % 5 == 0 {
                    "Ronaldo Fenômeno".to_string()
                } else {
                    entity.id.clone()
                };
                let wobble = ((d as usize * 7 + i * 13) % 11) as f64;
                let mut obs = RawObservation::new(label, day(d), entity.position)
                    .with_metric(Metric::Capacity, 50.0 + wobble / 2.0)
                    .with_metric(Metric::Distance, 8.0 + wobble / 5.0)
                    .with_metric(Metric::Sprints, 20.0 + wobble)
                    .with_metric(Metric::HeartRate, 150.0 + wobble);
                if (d as usize + i) % 37 == 0 {
                    obs = obs.with_injury("Contusao", 2);
                }
                rows.push(obs.with_index(rows.len()));
            }
        }
        rows
    }

    #[test]
    fn test_run_is_deterministic() {
        let a = run(squad_feed(), EngineConfig::default()).unwrap();
        let b = run(squad_feed(), EngineConfig::default()).unwrap();
        assert_eq!(a.rows, b.rows);
        assert_eq!(output_digest(&a.rows).unwrap(), output_digest(&b.rows).unwrap());
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let engine = Engine::new(EngineConfig::default()).unwrap();
        let out = engine.run(squad_feed());
        assert!(out.entity_count >= PARALLEL_MIN_ENTITIES);

        let seqs = sequence(
            squad_feed()
                .into_iter()
                .map(|o| (engine.reconciler().resolve(o.raw_entity_label.as_deref()), o)),
        );
        let sequential: Vec<EnrichedObservation> = seqs
            .iter()
            .flat_map(|s| enrich_sequence(s, engine.config()))
            .collect();
        assert_eq!(out.rows, sequential);
    }

    #[test]
    fn test_alias_rows_join_canonical_history() {
        let out = run(squad_feed(), EngineConfig::default()).unwrap();
        assert_eq!(out.entity_count, 23);
        assert_eq!(out.rows.len(), squad_feed().len());

        let ronaldo: Vec<_> = out
            .rows
            .iter()
            .filter(|r| r.canonical_id.as_deref() == Some("Ronaldo"))
            .collect();
        assert_eq!(ronaldo.len(), 20);
        assert!(ronaldo
            .iter()
            .any(|r| r.raw.raw_entity_label.as_deref() == Some("Ronaldo Fenômeno")));
        assert!(ronaldo.windows(2).all(|w| w[0].raw.timestamp <= w[1].raw.timestamp));
        assert!(out.reconciliation.counts.alias > 0);
    }

    #[test]
    fn test_unresolved_and_unlabelled_rows_survive() {
        let rows = vec![
            RawObservation::new("Pelé", day(1), Position::Forward).with_index(0),
            RawObservation::new("", day(2), Position::Forward).with_index(1),
            RawObservation::new("Cafu", day(3), Position::RightBack).with_index(2),
        ];
        let out = run(rows, EngineConfig::default()).unwrap();
        assert_eq!(out.rows.len(), 3);

        let ids: Vec<Option<&str>> = out.rows.iter().map(|r| r.canonical_id.as_deref()).collect();
        assert_eq!(ids, vec![Some("Cafu"), Some("Pelé"), None]);
        assert!(!Engine::new(EngineConfig::default())
            .unwrap()
            .reconciler()
            .is_canonical("Pelé"));
        assert_eq!(out.reconciliation.counts.unresolved, 1);
        assert_eq!(out.reconciliation.counts.missing, 1);
    }

    #[test]
    fn test_padded_labels_merge_and_unresolved_text_is_kept() {
        let rows = vec![
            RawObservation::new(" Cafu ", day(1), Position::RightBack).with_index(0),
            RawObservation::new("Cafu", day(2), Position::RightBack).with_index(1),
            RawObservation::new("Pelé ", day(3), Position::Forward).with_index(2),
        ];
        let out = run(rows, EngineConfig::default()).unwrap();

        let ids: Vec<Option<&str>> = out.rows.iter().map(|r| r.canonical_id.as_deref()).collect();
        assert_eq!(ids, vec![Some("Cafu"), Some("Cafu"), Some("Pelé ")]);
        assert_eq!(out.entity_count, 2);
        assert_eq!(out.reconciliation.counts.exact, 2);
        assert_eq!(out.reconciliation.unresolved().count(), 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.workload.chronic_days = 3;
        assert!(Engine::new(cfg).is_err());
    }

    #[test]
    fn test_scenario_entity_b_injury_history() {
        let rows: Vec<RawObservation> = (1..=12)
            .map(|d| {
                let o = RawObservation::new("Belletti", day(d), Position::RightBack)
                    .with_metric(Metric::Distance, 9.0)
                    .with_index(d as usize);
                if d == 5 {
                    o.with_injury("Entorse_Leve", 3)
                } else {
                    o
                }
            })
            .collect();
        let out = run(rows, EngineConfig::default()).unwrap();
        let at = |d: u32| out.rows.iter().find(|r| r.raw.timestamp == day(d)).unwrap();

        assert_eq!(at(4).days_since_last_injury, None);
        assert_eq!(at(5).prior_injury_count, 0);
        assert_eq!(at(6).prior_injury_count, 1);
        assert_eq!(at(12).days_since_last_injury, Some(7));
        assert_eq!(at(12).prior_injury_count, 1);

        let summary = summarize(&out.rows);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].total_injuries, 1);
        assert_eq!(summary[0].latest_risk_category, RiskCategory::Low);
        assert_eq!(summary[0].days_since_last_injury, Some(7));
    }

    #[test]
    fn test_reverse_input_order_does_not_change_output() {
        let forward = run(squad_feed(), EngineConfig::default()).unwrap();
        let mut reversed_feed = squad_feed();
        reversed_feed.reverse();
        let reversed = run(reversed_feed, EngineConfig::default()).unwrap();
        // the sequencer restores chronological order before any window runs
        assert_eq!(forward.rows, reversed.rows);
    }
}
