//! Raw observation model
//!
//! One row of the multi-source feed: who (raw label), when, where on the
//! pitch, the four tracked metrics and the injury columns.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Playing position category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    #[serde(alias = "Goleiro")]
    Goalkeeper,
    #[serde(alias = "Lateral-direito")]
    RightBack,
    #[serde(alias = "Zagueiro")]
    CentreBack,
    #[serde(alias = "Lateral-esquerdo")]
    LeftBack,
    #[serde(alias = "Volante")]
    DefensiveMidfielder,
    #[serde(alias = "Meio-campista")]
    Midfielder,
    #[serde(alias = "Atacante")]
    Forward,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "goalkeeper",
            Position::RightBack => "right_back",
            Position::CentreBack => "centre_back",
            Position::LeftBack => "left_back",
            Position::DefensiveMidfielder => "defensive_midfielder",
            Position::Midfielder => "midfielder",
            Position::Forward => "forward",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = String;

    /// Accepts English names and the Portuguese squad-sheet labels,
    /// case-insensitive, with `-`, `_` and spaces treated alike.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '_' { '-' } else { c })
            .collect();

        match key.as_str() {
            "goalkeeper" | "gk" | "goleiro" => Ok(Position::Goalkeeper),
            "right-back" | "rb" | "lateral-direito" => Ok(Position::RightBack),
            "centre-back" | "center-back" | "cb" | "zagueiro" => Ok(Position::CentreBack),
            "left-back" | "lb" | "lateral-esquerdo" => Ok(Position::LeftBack),
            "defensive-midfielder" | "cdm" | "volante" => Ok(Position::DefensiveMidfielder),
            "midfielder" | "cm" | "meio-campista" => Ok(Position::Midfielder),
            "forward" | "st" | "atacante" => Ok(Position::Forward),
            _ => Err(format!("unknown position '{}'", s.trim())),
        }
    }
}

/// Which department recorded the row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    FitnessCoach,
    MedicalDepartment,
    MatchData,
    #[default]
    Unknown,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::FitnessCoach => "fitness_coach",
            Source::MedicalDepartment => "medical_department",
            Source::MatchData => "match_data",
            Source::Unknown => "unknown",
        }
    }

    /// Lenient parse: anything unrecognised is `Unknown`.
    pub fn parse_lenient(s: &str) -> Self {
        let key = s.trim().to_lowercase().replace([' ', '-'], "_");
        match key.as_str() {
            "fitness_coach" | "preparador_fisico" => Source::FitnessCoach,
            "medical_department" | "departamento_medico" => Source::MedicalDepartment,
            "match_data" | "dados_de_jogos" => Source::MatchData,
            _ => Source::Unknown,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracked performance metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Estimated aerobic capacity (VO2 max, mL/kg/min)
    Capacity,
    /// Distance covered (km); also the workload metric
    Distance,
    /// Sprint count
    Sprints,
    /// Mean heart rate (bpm)
    HeartRate,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Capacity,
        Metric::Distance,
        Metric::Sprints,
        Metric::HeartRate,
    ];

    /// Metric summed by the workload ratio calculator.
    pub const LOAD: Metric = Metric::Distance;

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Capacity => "capacity",
            Metric::Distance => "distance",
            Metric::Sprints => "sprints",
            Metric::HeartRate => "heart_rate",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per tracked metric.
///
/// Fixed fields rather than a map so iteration and serialization order
/// never depend on hashing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct MetricValues<T> {
    pub capacity: T,
    pub distance: T,
    pub sprints: T,
    pub heart_rate: T,
}

impl<T> MetricValues<T> {
    pub fn from_fn(mut f: impl FnMut(Metric) -> T) -> Self {
        Self {
            capacity: f(Metric::Capacity),
            distance: f(Metric::Distance),
            sprints: f(Metric::Sprints),
            heart_rate: f(Metric::HeartRate),
        }
    }

    pub fn get(&self, metric: Metric) -> &T {
        match metric {
            Metric::Capacity => &self.capacity,
            Metric::Distance => &self.distance,
            Metric::Sprints => &self.sprints,
            Metric::HeartRate => &self.heart_rate,
        }
    }

    pub fn get_mut(&mut self, metric: Metric) -> &mut T {
        match metric {
            Metric::Capacity => &mut self.capacity,
            Metric::Distance => &mut self.distance,
            Metric::Sprints => &mut self.sprints,
            Metric::HeartRate => &mut self.heart_rate,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(Metric, &T) -> U) -> MetricValues<U> {
        MetricValues::from_fn(|m| f(m, self.get(m)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, &T)> {
        Metric::ALL.into_iter().map(move |m| (m, self.get(m)))
    }
}

/// A single raw performance reading, immutable once read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    /// Athlete label as written by the source (may be misspelled or empty)
    pub raw_entity_label: Option<String>,
    pub timestamp: NaiveDate,
    pub position: Position,
    /// `None` = reading absent for this row
    #[serde(default)]
    pub metrics: MetricValues<Option<f64>>,
    #[serde(default)]
    pub minutes_played: Option<u32>,
    #[serde(default)]
    pub injury_occurred: bool,
    #[serde(default)]
    pub injury_type: Option<String>,
    #[serde(default)]
    pub absence_days: Option<i32>,
    #[serde(default)]
    pub source: Source,
    /// Position in the combined input; tie-breaker for equal timestamps
    #[serde(default)]
    pub input_index: usize,
}

impl RawObservation {
    /// Observation with no readings and no injury.
    pub fn new(label: impl Into<String>, timestamp: NaiveDate, position: Position) -> Self {
        let label = label.into();
        Self {
            raw_entity_label: if label.is_empty() { None } else { Some(label) },
            timestamp,
            position,
            metrics: MetricValues::default(),
            minutes_played: None,
            injury_occurred: false,
            injury_type: None,
            absence_days: None,
            source: Source::Unknown,
            input_index: 0,
        }
    }

    pub fn with_metric(mut self, metric: Metric, value: f64) -> Self {
        *self.metrics.get_mut(metric) = Some(value);
        self
    }

    pub fn with_injury(mut self, injury_type: impl Into<String>, absence_days: i32) -> Self {
        self.injury_occurred = true;
        self.injury_type = Some(injury_type.into());
        self.absence_days = Some(absence_days);
        self
    }

    pub fn with_index(mut self, input_index: usize) -> Self {
        self.input_index = input_index;
        self
    }

    pub fn metric(&self, metric: Metric) -> Option<f64> {
        *self.metrics.get(metric)
    }

    /// Label with surrounding whitespace removed; `None` when blank.
    pub fn label(&self) -> Option<&str> {
        self.raw_entity_label
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_parses_portuguese_labels() {
        assert_eq!("Goleiro".parse::<Position>().unwrap(), Position::Goalkeeper);
        assert_eq!("Lateral-Direito".parse::<Position>().unwrap(), Position::RightBack);
        assert_eq!("lateral esquerdo".parse::<Position>().unwrap(), Position::LeftBack);
        assert_eq!("Meio-campista".parse::<Position>().unwrap(), Position::Midfielder);
        assert_eq!("Atacante".parse::<Position>().unwrap(), Position::Forward);
        assert!("Libero".parse::<Position>().is_err());
    }

    #[test]
    fn test_position_serde_alias() {
        let p: Position = serde_json::from_str("\"Zagueiro\"").unwrap();
        assert_eq!(p, Position::CentreBack);
        assert_eq!(serde_json::to_string(&p).unwrap(), "\"centre_back\"");
    }

    #[test]
    fn test_source_lenient() {
        assert_eq!(Source::parse_lenient("Preparador_Fisico"), Source::FitnessCoach);
        assert_eq!(Source::parse_lenient("Dados_de_Jogos"), Source::MatchData);
        assert_eq!(Source::parse_lenient("scout"), Source::Unknown);
    }

    #[test]
    fn test_metric_values_order_is_fixed() {
        let v = MetricValues::from_fn(|m| m.as_str().len());
        let names: Vec<Metric> = v.iter().map(|(m, _)| m).collect();
        assert_eq!(names, Metric::ALL.to_vec());
    }

    #[test]
    fn test_blank_label_is_none() {
        let d = NaiveDate::from_ymd_opt(2002, 3, 1).unwrap();
        let obs = RawObservation::new("   ", d, Position::Forward);
        assert_eq!(obs.label(), None);
        let obs = RawObservation::new("", d, Position::Forward);
        assert_eq!(obs.raw_entity_label, None);
    }
}
