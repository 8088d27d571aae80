//! # Temporal Sequencer
//!
//! Groups reconciled observations by canonical id and orders each group by
//! timestamp. The sort is stable, so equal timestamps keep input order.
//!
//! Groups come out ordered by canonical id. Observations whose label was
//! empty (no canonical id) become one single-observation sequence each, in
//! input order, after all named groups: they share no history.

use crate::models::RawObservation;
use std::collections::BTreeMap;

/// One athlete's chronologically ordered observations
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySequence {
    pub canonical_id: Option<String>,
    pub observations: Vec<RawObservation>,
}

impl EntitySequence {
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

pub fn sequence(
    resolved: impl IntoIterator<Item = (Option<String>, RawObservation)>,
) -> Vec<EntitySequence> {
    let mut groups: BTreeMap<String, Vec<RawObservation>> = BTreeMap::new();
    let mut unidentified = Vec::new();

    for (canonical_id, obs) in resolved {
        match canonical_id {
            Some(id) => groups.entry(id).or_default().push(obs),
            None => unidentified.push(obs),
        }
    }

    let mut out: Vec<EntitySequence> = groups
        .into_iter()
        .map(|(id, mut observations)| {
            observations.sort_by_key(|o| o.timestamp);
            EntitySequence {
                canonical_id: Some(id),
                observations,
            }
        })
        .collect();

    out.extend(unidentified.into_iter().map(|obs| EntitySequence {
        canonical_id: None,
        observations: vec![obs],
    }));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Position;
    use chrono::NaiveDate;

    fn obs(label: &str, d: u32, idx: usize) -> RawObservation {
        RawObservation::new(label, NaiveDate::from_ymd_opt(2002, 4, d).unwrap(), Position::Forward)
            .with_index(idx)
    }

    #[test]
    fn test_groups_sorted_by_id_and_time() {
        let rows = vec![
            (Some("Rivaldo".to_string()), obs("Rivaldo", 9, 0)),
            (Some("Cafu".to_string()), obs("Cafu", 3, 1)),
            (Some("Rivaldo".to_string()), obs("Rivaldo", 2, 2)),
            (Some("Cafu".to_string()), obs("Cafu", 1, 3)),
        ];
        let seqs = sequence(rows);
        assert_eq!(seqs.len(), 2);
        assert_eq!(seqs[0].canonical_id.as_deref(), Some("Cafu"));
        let idx: Vec<usize> = seqs[0].observations.iter().map(|o| o.input_index).collect();
        assert_eq!(idx, vec![3, 1]);
        let idx: Vec<usize> = seqs[1].observations.iter().map(|o| o.input_index).collect();
        assert_eq!(idx, vec![2, 0]);
    }

    #[test]
    fn test_equal_timestamps_keep_input_order() {
        let rows = (0..5).map(|i| (Some("Kaká".to_string()), obs("Kaká", 10, i)));
        let seqs = sequence(rows);
        let idx: Vec<usize> = seqs[0].observations.iter().map(|o| o.input_index).collect();
        assert_eq!(idx, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_unidentified_rows_are_singletons() {
        let rows = vec![
            (None, obs("", 5, 0)),
            (Some("Dida".to_string()), obs("Dida", 1, 1)),
            (None, obs("", 2, 2)),
        ];
        let seqs = sequence(rows);
        assert_eq!(seqs.len(), 3);
        assert_eq!(seqs[0].canonical_id.as_deref(), Some("Dida"));
        assert!(seqs[1..].iter().all(|s| s.canonical_id.is_none() && s.len() == 1));
        assert_eq!(seqs[1].observations[0].input_index, 0);
        assert_eq!(seqs[2].observations[0].input_index, 2);
    }

    #[test]
    fn test_variant_labels_merge_under_one_id() {
        let rows = vec![
            (Some("Ronaldo".to_string()), obs("Ronaldo", 4, 0)),
            (Some("Ronaldo".to_string()), obs("Ronaldo Fenômeno", 2, 1)),
        ];
        let seqs = sequence(rows);
        assert_eq!(seqs.len(), 1);
        assert_eq!(seqs[0].len(), 2);
        assert_eq!(
            seqs[0].observations[0].raw_entity_label.as_deref(),
            Some("Ronaldo Fenômeno")
        );
    }
}
