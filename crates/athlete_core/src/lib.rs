//! # athlete_core - Deterministic Athlete Performance & Injury-Risk Engine
//!
//! Turns a multi-source feed of per-athlete observations into an enriched
//! per-observation view: reconciled identity, rolling baselines, anomaly
//! flags, acute:chronic workload, injury history and a risk category.
//!
//! ## Features
//! - Identical input + configuration = byte-identical output
//! - No look-ahead: every derived value uses only the athlete's past and present
//! - Every constant (windows, multiplier, weights, cut-offs, threshold) is configuration
//! - JSON API for batch callers

// Doc formatting lints - purely cosmetic
#![allow(clippy::doc_lazy_continuation)]
// Config structs are mutated field by field in tests and presets
#![allow(clippy::field_reassign_with_default)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod identity;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod sequence;

pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use identity::{MatchMethod, Reconciler, Resolution};
pub use models::{
    CanonicalEntity, EnrichedObservation, Metric, MetricValues, Position, RawObservation,
    RiskCategory, Source,
};
pub use pipeline::{run, Engine, RunOutput};
pub use report::{output_digest, summarize, EntitySummary, ReconciliationReport};

use serde::{Deserialize, Serialize};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;

/// JSON request: observations plus an optional config (default when absent)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRequest {
    #[serde(default = "default_schema_version")]
    pub schema_version: u8,
    #[serde(default)]
    pub config: Option<EngineConfig>,
    pub observations: Vec<RawObservation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub schema_version: u8,
    pub rows: Vec<EnrichedObservation>,
    pub summaries: Vec<EntitySummary>,
    pub reconciliation: ReconciliationReport,
    /// Hex SHA-256 of `rows`
    pub digest: String,
}

fn default_schema_version() -> u8 {
    SCHEMA_VERSION
}

/// Run the engine over a JSON [`ProcessRequest`] and return a JSON
/// [`ProcessResponse`].
pub fn process_json(request: &str) -> Result<String> {
    let request: ProcessRequest = serde_json::from_str(request)?;
    if request.schema_version != SCHEMA_VERSION {
        return Err(EngineError::InvalidConfig(format!(
            "unsupported schema_version {} (expected {})",
            request.schema_version, SCHEMA_VERSION
        )));
    }

    let engine = Engine::new(request.config.unwrap_or_default())?;
    let output = engine.run(request.observations);

    let response = ProcessResponse {
        schema_version: SCHEMA_VERSION,
        summaries: summarize(&output.rows),
        digest: output_digest(&output.rows)?,
        rows: output.rows,
        reconciliation: output.reconciliation,
    };
    Ok(serde_json::to_string(&response)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(extra_config: Option<serde_json::Value>) -> String {
        let mut observations = Vec::new();
        for d in 1..=10 {
            observations.push(json!({
                "raw_entity_label": if d % 4 == 0 { "Roberto Carlo" } else { "Roberto Carlos" },
                "timestamp": format!("2002-05-{:02}", d),
                "position": "left_back",
                "metrics": { "capacity": 55.0, "distance": 10.0 + d as f64 / 10.0 },
                "injury_occurred": d == 3,
            }));
        }
        observations.push(json!({
            "raw_entity_label": null,
            "timestamp": "2002-05-02",
            "position": "forward",
        }));

        let mut req = json!({ "schema_version": 1, "observations": observations });
        if let Some(cfg) = extra_config {
            req["config"] = cfg;
        }
        req.to_string()
    }

    #[test]
    fn test_process_json_basic() {
        let out = process_json(&request(None)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(parsed["schema_version"], 1);
        assert_eq!(parsed["rows"].as_array().unwrap().len(), 11);
        assert_eq!(parsed["summaries"].as_array().unwrap().len(), 1);
        assert_eq!(parsed["summaries"][0]["canonical_id"], "Roberto Carlos");
        assert_eq!(parsed["summaries"][0]["total_injuries"], 1);
        assert_eq!(parsed["reconciliation"]["counts"]["fuzzy"], 2);
        assert_eq!(parsed["reconciliation"]["counts"]["missing"], 1);
        assert_eq!(parsed["digest"].as_str().unwrap().len(), 64);
    }

    #[test]
    fn test_process_json_determinism() {
        let req = request(None);
        assert_eq!(process_json(&req).unwrap(), process_json(&req).unwrap());
    }

    #[test]
    fn test_process_json_honours_config() {
        let strict = process_json(&request(Some(json!({ "identity": { "threshold": 99 } }))))
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&strict).unwrap();
        assert_eq!(parsed["reconciliation"]["counts"]["fuzzy"], 0);
        assert_eq!(parsed["reconciliation"]["counts"]["unresolved"], 2);
        assert_eq!(parsed["summaries"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_process_json_rejects_bad_input() {
        assert!(process_json("not json").is_err());
        let wrong_schema = json!({ "schema_version": 9, "observations": [] }).to_string();
        assert!(process_json(&wrong_schema).unwrap_err().is_config_error());
        let bad_cfg = json!({
            "observations": [],
            "config": { "window": { "size": 0 } }
        })
        .to_string();
        assert!(process_json(&bad_cfg).is_err());
    }
}
