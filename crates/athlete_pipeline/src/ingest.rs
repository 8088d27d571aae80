//! Multi-source CSV ingestion
//!
//! The feed arrives as one CSV per department (fitness coach, medical
//! department, match data) with the same columns. Files are read in the
//! order given and concatenated; `input_index` runs over the concatenation.
//!
//! Headers may be the Portuguese squad-sheet names or English equivalents:
//!
//! | Portuguese                  | English           |
//! |-----------------------------|-------------------|
//! | `Nome_Jogador`              | `athlete`         |
//! | `Posicao`                   | `position`        |
//! | `Data`                      | `date`            |
//! | `Minutos_Jogados`           | `minutes_played`  |
//! | `Distancia_Percorrida_(km)` | `distance_km`     |
//! | `Num_Sprints`               | `sprints`         |
//! | `VO2_Max_Estimado`          | `vo2_max`         |
//! | `FC_Media_(bpm)`            | `heart_rate_bpm`  |
//! | `Lesao_Ocorreu`             | `injury_occurred` |
//! | `Tipo_Lesao`                | `injury_type`     |
//! | `Tempo_Ausencia`            | `absence_days`    |
//! | `Fonte`                     | `source`          |

use athlete_core::models::{Metric, MetricValues, Position, RawObservation, Source};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to read CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path}:{line}: missing required field '{field}'")]
    MissingField {
        path: PathBuf,
        line: u64,
        field: &'static str,
    },

    #[error("{path}:{line}: invalid value '{value}' for field '{field}'")]
    InvalidField {
        path: PathBuf,
        line: u64,
        field: &'static str,
        value: String,
    },
}

/// One CSV record, every cell still text
#[derive(Debug, Default, Deserialize)]
struct CsvRow {
    #[serde(default, alias = "Nome_Jogador")]
    athlete: Option<String>,
    #[serde(default, alias = "Posicao")]
    position: Option<String>,
    #[serde(default, alias = "Data")]
    date: Option<String>,
    #[serde(default, alias = "Minutos_Jogados")]
    minutes_played: Option<String>,
    #[serde(default, alias = "Distancia_Percorrida_(km)")]
    distance_km: Option<String>,
    #[serde(default, alias = "Num_Sprints")]
    sprints: Option<String>,
    #[serde(default, alias = "VO2_Max_Estimado")]
    vo2_max: Option<String>,
    #[serde(default, alias = "FC_Media_(bpm)")]
    heart_rate_bpm: Option<String>,
    #[serde(default, alias = "Lesao_Ocorreu")]
    injury_occurred: Option<String>,
    #[serde(default, alias = "Tipo_Lesao")]
    injury_type: Option<String>,
    #[serde(default, alias = "Tempo_Ausencia")]
    absence_days: Option<String>,
    #[serde(default, alias = "Fonte")]
    source: Option<String>,
}

/// Field-level parse context: which file and line a cell came from.
struct Cell<'a> {
    path: &'a Path,
    line: u64,
}

impl Cell<'_> {
    fn invalid(&self, field: &'static str, value: &str) -> IngestError {
        IngestError::InvalidField {
            path: self.path.to_path_buf(),
            line: self.line,
            field,
            value: value.to_string(),
        }
    }

    fn missing(&self, field: &'static str) -> IngestError {
        IngestError::MissingField {
            path: self.path.to_path_buf(),
            line: self.line,
            field,
        }
    }

    fn date(&self, field: &'static str, raw: Option<&str>) -> Result<NaiveDate, IngestError> {
        let raw = non_empty(raw).ok_or_else(|| self.missing(field))?;
        // "2002-06-30", "2002-06-30 18:00:00" and "2002-06-30T18:00:00" all give the date
        let day_part = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(day_part, "%Y-%m-%d").map_err(|_| self.invalid(field, raw))
    }

    fn number(&self, field: &'static str, raw: Option<&str>) -> Result<Option<f64>, IngestError> {
        match non_empty(raw) {
            None => Ok(None),
            Some(s) => s
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Some)
                .ok_or_else(|| self.invalid(field, s)),
        }
    }

    /// Whole numbers, also when written as floats (`90.0`); a fractional
    /// part or an out-of-range value is invalid.
    fn integer<T: TryFrom<i64>>(
        &self,
        field: &'static str,
        raw: Option<&str>,
    ) -> Result<Option<T>, IngestError> {
        let s = match non_empty(raw) {
            None => return Ok(None),
            Some(s) => s,
        };
        let whole = s.parse::<i64>().ok().or_else(|| {
            s.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && v.fract() == 0.0 && v.abs() <= MAX_WHOLE_FLOAT)
                .map(|v| v as i64)
        });
        whole
            .and_then(|v| T::try_from(v).ok())
            .map(Some)
            .ok_or_else(|| self.invalid(field, s))
    }

    fn flag(&self, field: &'static str, raw: Option<&str>) -> Result<bool, IngestError> {
        match non_empty(raw).map(str::to_lowercase).as_deref() {
            None => Ok(false),
            Some("true" | "1" | "yes" | "sim") => Ok(true),
            Some("false" | "0" | "no" | "nao" | "não") => Ok(false),
            Some(other) => Err(self.invalid(field, other)),
        }
    }
}

/// Largest float that still holds every integer exactly (2^53).
const MAX_WHOLE_FLOAT: f64 = 9_007_199_254_740_992.0;

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn to_observation(
    row: CsvRow,
    cell: &Cell<'_>,
    input_index: usize,
) -> Result<RawObservation, IngestError> {
    let position_raw = non_empty(row.position.as_deref()).ok_or_else(|| cell.missing("position"))?;
    let position: Position = position_raw
        .parse()
        .map_err(|_| cell.invalid("position", position_raw))?;

    let metrics = MetricValues {
        capacity: cell.number("vo2_max", row.vo2_max.as_deref())?,
        distance: cell.number("distance_km", row.distance_km.as_deref())?,
        sprints: cell.number("sprints", row.sprints.as_deref())?,
        heart_rate: cell.number("heart_rate_bpm", row.heart_rate_bpm.as_deref())?,
    };

    Ok(RawObservation {
        raw_entity_label: row.athlete.filter(|s| !s.trim().is_empty()),
        timestamp: cell.date("date", row.date.as_deref())?,
        position,
        metrics,
        minutes_played: cell.integer("minutes_played", row.minutes_played.as_deref())?,
        injury_occurred: cell.flag("injury_occurred", row.injury_occurred.as_deref())?,
        injury_type: non_empty(row.injury_type.as_deref()).map(str::to_string),
        absence_days: cell.integer("absence_days", row.absence_days.as_deref())?,
        source: non_empty(row.source.as_deref())
            .map(Source::parse_lenient)
            .unwrap_or_default(),
        input_index,
    })
}

/// Read one CSV. `first_index` is the `input_index` of its first record.
pub fn read_csv(path: &Path, first_index: usize) -> Result<Vec<RawObservation>, IngestError> {
    let csv_err = |source| IngestError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .flexible(false)
        .from_path(path)
        .map_err(csv_err)?;
    let headers = reader.headers().map_err(csv_err)?.clone();

    let mut observations = Vec::new();
    let mut record = csv::StringRecord::new();
    while reader.read_record(&mut record).map_err(csv_err)? {
        let cell = Cell {
            path,
            line: record.position().map(|p| p.line()).unwrap_or(0),
        };
        let row: CsvRow = record.deserialize(Some(&headers)).map_err(csv_err)?;
        observations.push(to_observation(row, &cell, first_index + observations.len())?);
    }

    debug!(path = %path.display(), rows = observations.len(), "read csv");
    Ok(observations)
}

/// Read several CSVs and concatenate them in argument order.
pub fn read_sources<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<RawObservation>, IngestError> {
    let mut all = Vec::new();
    for path in paths {
        let rows = read_csv(path.as_ref(), all.len())?;
        all.extend(rows);
    }
    info!(files = paths.len(), rows = all.len(), "ingested sources");
    Ok(all)
}

/// Count of rows that carry a reading for `metric`.
pub fn coverage(observations: &[RawObservation], metric: Metric) -> usize {
    observations
        .iter()
        .filter(|o| o.metric(metric).is_some())
        .count()
}
