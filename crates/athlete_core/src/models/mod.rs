//! Data model: raw rows in, enriched rows out, and the canonical registry.

pub mod enriched;
pub mod observation;
pub mod roster;

pub use enriched::{EnrichedObservation, RiskCategory};
pub use observation::{Metric, MetricValues, Position, RawObservation, Source};
pub use roster::{default_aliases, default_roster, CanonicalEntity};
