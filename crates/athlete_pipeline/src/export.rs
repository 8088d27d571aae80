//! Enriched-row export
//!
//! Flattens [`EnrichedObservation`] into one column per metric statistic so
//! the output loads straight into a table. Row order is whatever the engine
//! produced (canonical id, then timestamp, then input order).

use anyhow::{Context, Result};
use athlete_core::models::{EnrichedObservation, RiskCategory};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{}' (expected csv or json)", other)),
        }
    }
}

impl OutputFormat {
    /// Guess from a file extension; CSV unless it ends in `.json`.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => OutputFormat::Json,
            _ => OutputFormat::Csv,
        }
    }
}

/// One flat output record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRow {
    pub canonical_id: Option<String>,
    pub raw_label: Option<String>,
    pub date: NaiveDate,
    pub position: String,
    pub source: String,
    pub input_index: usize,
    pub minutes_played: Option<u32>,

    pub capacity: Option<f64>,
    pub capacity_mean: Option<f64>,
    pub capacity_stddev: Option<f64>,
    pub capacity_anomaly: bool,
    pub distance: Option<f64>,
    pub distance_mean: Option<f64>,
    pub distance_stddev: Option<f64>,
    pub distance_anomaly: bool,
    pub sprints: Option<f64>,
    pub sprints_mean: Option<f64>,
    pub sprints_stddev: Option<f64>,
    pub sprints_anomaly: bool,
    pub heart_rate: Option<f64>,
    pub heart_rate_mean: Option<f64>,
    pub heart_rate_stddev: Option<f64>,
    pub heart_rate_anomaly: bool,

    pub acute_load: f64,
    pub chronic_load: f64,
    pub load_ratio: f64,

    pub injury_occurred: bool,
    pub injury_type: Option<String>,
    pub absence_days: Option<i32>,
    pub prior_injury_count: u32,
    pub days_since_last_injury: Option<i64>,

    pub risk_score: u32,
    pub risk_category: RiskCategory,
}

impl From<&EnrichedObservation> for EnrichedRow {
    fn from(row: &EnrichedObservation) -> Self {
        let raw = &row.raw;
        Self {
            canonical_id: row.canonical_id.clone(),
            raw_label: raw.raw_entity_label.clone(),
            date: raw.timestamp,
            position: raw.position.to_string(),
            source: raw.source.to_string(),
            input_index: raw.input_index,
            minutes_played: raw.minutes_played,

            capacity: raw.metrics.capacity,
            capacity_mean: row.rolling_mean.capacity,
            capacity_stddev: row.rolling_stddev.capacity,
            capacity_anomaly: row.anomaly.capacity,
            distance: raw.metrics.distance,
            distance_mean: row.rolling_mean.distance,
            distance_stddev: row.rolling_stddev.distance,
            distance_anomaly: row.anomaly.distance,
            sprints: raw.metrics.sprints,
            sprints_mean: row.rolling_mean.sprints,
            sprints_stddev: row.rolling_stddev.sprints,
            sprints_anomaly: row.anomaly.sprints,
            heart_rate: raw.metrics.heart_rate,
            heart_rate_mean: row.rolling_mean.heart_rate,
            heart_rate_stddev: row.rolling_stddev.heart_rate,
            heart_rate_anomaly: row.anomaly.heart_rate,

            acute_load: row.acute_load,
            chronic_load: row.chronic_load,
            load_ratio: row.load_ratio,

            injury_occurred: raw.injury_occurred,
            injury_type: raw.injury_type.clone(),
            absence_days: raw.absence_days,
            prior_injury_count: row.prior_injury_count,
            days_since_last_injury: row.days_since_last_injury,

            risk_score: row.risk_score,
            risk_category: row.risk_category,
        }
    }
}

pub fn flatten(rows: &[EnrichedObservation]) -> Vec<EnrichedRow> {
    rows.iter().map(EnrichedRow::from).collect()
}

pub fn write_csv<W: Write>(writer: W, rows: &[EnrichedObservation]) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    for row in rows {
        out.serialize(EnrichedRow::from(row))?;
    }
    out.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(writer: W, rows: &[EnrichedObservation]) -> Result<()> {
    serde_json::to_writer_pretty(writer, &flatten(rows))?;
    Ok(())
}

/// Write rows to `path` in the given format.
pub fn write_rows(path: &Path, rows: &[EnrichedObservation], format: OutputFormat) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    match format {
        OutputFormat::Csv => write_csv(&mut writer, rows),
        OutputFormat::Json => write_json(&mut writer, rows),
    }
    .with_context(|| format!("Failed to write rows to {}", path.display()))?;
    writer.flush()?;
    Ok(())
}

/// Write any serializable report as pretty JSON.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
