//! Run reports
//!
//! - [`ReconciliationReport`] - how every distinct raw label was resolved
//! - [`EntitySummary`] - latest risk picture per athlete
//! - [`output_digest`] - SHA-256 of the enriched rows (reproducibility check)

use crate::error::Result;
use crate::identity::{MatchMethod, Resolution};
use crate::models::{EnrichedObservation, RiskCategory};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Resolution of one distinct raw label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelResolution {
    /// `None` for the null/blank label
    pub raw_label: Option<String>,
    pub canonical_id: Option<String>,
    pub method: MatchMethod,
    /// Rows carrying this label
    pub rows: usize,
}

impl LabelResolution {
    /// Label was rewritten to a different canonical id
    pub fn is_rewritten(&self) -> bool {
        self.method.is_resolved() && self.raw_label != self.canonical_id
    }
}

/// Row counts per resolution method
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationCounts {
    pub exact: usize,
    pub alias: usize,
    pub fuzzy: usize,
    pub unresolved: usize,
    pub missing: usize,
}

impl ReconciliationCounts {
    pub fn total(&self) -> usize {
        self.exact + self.alias + self.fuzzy + self.unresolved + self.missing
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    /// Sorted by raw label, null label first
    pub labels: Vec<LabelResolution>,
    pub counts: ReconciliationCounts,
}

impl ReconciliationReport {
    /// Build from `(raw label, resolution, row count)` triples.
    pub fn from_resolutions(
        resolutions: impl IntoIterator<Item = (Option<String>, Resolution, usize)>,
    ) -> Self {
        let mut counts = ReconciliationCounts::default();
        let mut labels: Vec<LabelResolution> = resolutions
            .into_iter()
            .map(|(raw_label, resolution, rows)| {
                match resolution.method {
                    MatchMethod::Exact => counts.exact += rows,
                    MatchMethod::Alias => counts.alias += rows,
                    MatchMethod::Fuzzy { .. } => counts.fuzzy += rows,
                    MatchMethod::Unresolved { .. } => counts.unresolved += rows,
                    MatchMethod::Missing => counts.missing += rows,
                }
                LabelResolution {
                    raw_label,
                    canonical_id: resolution.canonical,
                    method: resolution.method,
                    rows,
                }
            })
            .collect();
        labels.sort_by(|a, b| a.raw_label.cmp(&b.raw_label));

        Self { labels, counts }
    }

    /// Labels mapped onto a different registry id (aliases and fuzzy fixes)
    pub fn rewritten(&self) -> impl Iterator<Item = &LabelResolution> {
        self.labels.iter().filter(|l| l.is_rewritten())
    }

    pub fn unresolved(&self) -> impl Iterator<Item = &LabelResolution> {
        self.labels
            .iter()
            .filter(|l| matches!(l.method, MatchMethod::Unresolved { .. }))
    }
}

/// Latest state of one athlete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySummary {
    pub canonical_id: String,
    pub observations: usize,
    pub first_date: NaiveDate,
    pub latest_date: NaiveDate,
    pub latest_risk_score: u32,
    pub latest_risk_category: RiskCategory,
    pub prior_injury_count: u32,
    pub days_since_last_injury: Option<i64>,
    /// Injuries including the latest observation's own flag
    pub total_injuries: u32,
    pub peak_load_ratio: f64,
    pub anomalous_observations: usize,
    pub observations_by_category: BTreeMap<RiskCategory, usize>,
}

/// One summary per canonical id, sorted by id. Rows without a canonical id
/// are skipped. Expects rows grouped per athlete in chronological order, as
/// the engine emits them.
pub fn summarize(rows: &[EnrichedObservation]) -> Vec<EntitySummary> {
    let mut by_id: BTreeMap<&str, Vec<&EnrichedObservation>> = BTreeMap::new();
    for row in rows {
        if let Some(id) = row.canonical_id.as_deref() {
            by_id.entry(id).or_default().push(row);
        }
    }

    by_id
        .into_iter()
        .filter_map(|(id, rows)| {
            let first = rows.first()?;
            let last = rows.last()?;

            let mut observations_by_category = BTreeMap::new();
            for row in &rows {
                *observations_by_category.entry(row.risk_category).or_insert(0) += 1;
            }

            Some(EntitySummary {
                canonical_id: id.to_string(),
                observations: rows.len(),
                first_date: first.raw.timestamp,
                latest_date: last.raw.timestamp,
                latest_risk_score: last.risk_score,
                latest_risk_category: last.risk_category,
                prior_injury_count: last.prior_injury_count,
                days_since_last_injury: last.days_since_last_injury,
                total_injuries: last.prior_injury_count + u32::from(last.raw.injury_occurred),
                peak_load_ratio: rows.iter().map(|r| r.load_ratio).fold(0.0, f64::max),
                anomalous_observations: rows.iter().filter(|r| r.any_anomaly()).count(),
                observations_by_category,
            })
        })
        .collect()
}

/// Hex SHA-256 over the JSON form of the rows.
pub fn output_digest(rows: &[EnrichedObservation]) -> Result<String> {
    let bytes = serde_json::to_vec(rows)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}
