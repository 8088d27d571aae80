//! # Identity Reconciler
//!
//! Maps a raw, possibly inconsistent athlete label to a canonical registry id.
//!
//! Resolution order, first match wins:
//! 1. empty label → `None` (kept, never dropped)
//! 2. exact registry id → unchanged
//! 3. alias table → mapped id
//! 4. best fuzzy candidate with score `>= threshold`
//! 5. otherwise the raw label, unchanged (unresolved; detectable by registry membership)
//!
//! Matching ignores surrounding whitespace, on labels and alias keys alike.

pub mod similarity;

pub use similarity::{IndelRatio, SimilarityMatcher};

use crate::config::IdentityConfig;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// How a label was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum MatchMethod {
    /// Label was null or blank
    Missing,
    Exact,
    Alias,
    Fuzzy { score: u8 },
    /// No confident match; best score seen, if any candidate existed
    Unresolved { best_score: Option<u8> },
}

impl MatchMethod {
    pub fn is_resolved(&self) -> bool {
        matches!(
            self,
            MatchMethod::Exact | MatchMethod::Alias | MatchMethod::Fuzzy { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub canonical: Option<String>,
    #[serde(flatten)]
    pub method: MatchMethod,
}

/// Reconciliation policy over a read-only registry and alias table.
#[derive(Debug, Clone)]
pub struct Reconciler<M = IndelRatio> {
    /// Registry ids, sorted
    registry: Vec<String>,
    registry_set: FxHashSet<String>,
    aliases: FxHashMap<String, String>,
    threshold: u8,
    matcher: M,
}

impl Reconciler<IndelRatio> {
    pub fn from_config(config: &IdentityConfig) -> Self {
        Self::with_matcher(config, IndelRatio)
    }
}

impl<M: SimilarityMatcher> Reconciler<M> {
    pub fn with_matcher(config: &IdentityConfig, matcher: M) -> Self {
        Self::new(
            config.roster.iter().map(|e| e.id.clone()),
            config
                .aliases
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
            config.threshold,
            matcher,
        )
    }

    pub fn new(
        registry: impl IntoIterator<Item = String>,
        aliases: impl IntoIterator<Item = (String, String)>,
        threshold: u8,
        matcher: M,
    ) -> Self {
        let mut registry: Vec<String> = registry.into_iter().collect();
        registry.sort();
        registry.dedup();
        let registry_set = registry.iter().cloned().collect();

        Self {
            registry,
            registry_set,
            aliases: aliases
                .into_iter()
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                .collect(),
            threshold,
            matcher,
        }
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Whether `id` is a registry id (unresolved labels are not).
    pub fn is_canonical(&self, id: &str) -> bool {
        self.registry_set.contains(id)
    }

    pub fn classify(&self, raw_label: Option<&str>) -> Resolution {
        let (raw, label) = match raw_label {
            Some(raw) if !raw.trim().is_empty() => (raw, raw.trim()),
            _ => {
                return Resolution {
                    canonical: None,
                    method: MatchMethod::Missing,
                }
            }
        };

        if self.registry_set.contains(label) {
            return Resolution {
                canonical: Some(label.to_string()),
                method: MatchMethod::Exact,
            };
        }

        if let Some(target) = self.aliases.get(label) {
            return Resolution {
                canonical: Some(target.clone()),
                method: MatchMethod::Alias,
            };
        }

        let candidates: Vec<&str> = self.registry.iter().map(String::as_str).collect();
        match self.matcher.best_match(label, &candidates) {
            Some((candidate, score)) if score >= self.threshold => Resolution {
                canonical: Some(candidate.to_string()),
                method: MatchMethod::Fuzzy { score },
            },
            best => Resolution {
                canonical: Some(raw.to_string()),
                method: MatchMethod::Unresolved {
                    best_score: best.map(|(_, score)| score),
                },
            },
        }
    }

    /// Canonical id for a label. Never fails; worst case is the label itself.
    pub fn resolve(&self, raw_label: Option<&str>) -> Option<String> {
        self.classify(raw_label).canonical
    }
}

/// One-shot resolution with the default similarity metric.
///
/// Builds a throwaway [`Reconciler`]; batch callers should build one and reuse it.
pub fn resolve(
    raw_label: Option<&str>,
    registry: &[&str],
    known_aliases: &[(&str, &str)],
    threshold: u8,
) -> Option<String> {
    Reconciler::new(
        registry.iter().map(|s| s.to_string()),
        known_aliases
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string())),
        threshold,
        IndelRatio,
    )
    .resolve(raw_label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn squad() -> Reconciler {
        Reconciler::from_config(&IdentityConfig::default())
    }

    #[test]
    fn test_missing_label_propagates_as_none() {
        let r = squad();
        assert_eq!(r.classify(None).method, MatchMethod::Missing);
        assert_eq!(r.resolve(Some("   ")), None);
    }

    #[test]
    fn test_exact_match_unchanged() {
        let r = squad();
        let res = r.classify(Some("Roberto Carlos"));
        assert_eq!(res.canonical.as_deref(), Some("Roberto Carlos"));
        assert_eq!(res.method, MatchMethod::Exact);
    }

    #[test]
    fn test_alias_wins_regardless_of_threshold() {
        for threshold in [0u8, 85, 100] {
            let mut cfg = IdentityConfig::default();
            cfg.threshold = threshold;
            let r = Reconciler::from_config(&cfg);
            let res = r.classify(Some("Ronaldo Fenômeno"));
            assert_eq!(res.canonical.as_deref(), Some("Ronaldo"));
            assert_eq!(res.method, MatchMethod::Alias);
        }
    }

    #[test]
    fn test_nickname_needs_alias() {
        // "Ronaldinho" scores 82 against "Ronaldo", below the default threshold
        let mut cfg = IdentityConfig::default();
        cfg.aliases.clear();
        let r = Reconciler::from_config(&cfg);
        let res = r.classify(Some("Ronaldinho"));
        assert_eq!(res.canonical.as_deref(), Some("Ronaldinho"));
        assert_eq!(res.method, MatchMethod::Unresolved { best_score: Some(82) });

        assert_eq!(squad().resolve(Some("Ronaldinho")).as_deref(), Some("Ronaldinho Gaúcho"));
    }

    #[test]
    fn test_fuzzy_match_above_threshold() {
        let res = squad().classify(Some("Roberto Carlo"));
        assert_eq!(res.canonical.as_deref(), Some("Roberto Carlos"));
        assert_eq!(res.method, MatchMethod::Fuzzy { score: 96 });
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let r = Reconciler::new(
            vec!["Ronaldo".to_string()],
            Vec::new(),
            82,
            IndelRatio,
        );
        assert_eq!(r.resolve(Some("Ronaldinho")).as_deref(), Some("Ronaldo"));
    }

    #[test]
    fn test_unknown_label_returned_unchanged() {
        let r = squad();
        let res = r.classify(Some("Pelé"));
        assert_eq!(res.canonical.as_deref(), Some("Pelé"));
        assert!(!res.method.is_resolved());
        assert!(!r.is_canonical("Pelé"));
    }

    #[test]
    fn test_fuzzy_tie_picks_smallest_id() {
        let forward = resolve(Some("Xob"), &["Rob", "Bob"], &[], 60);
        let reverse = resolve(Some("Xob"), &["Bob", "Rob"], &[], 60);
        assert_eq!(forward.as_deref(), Some("Bob"));
        assert_eq!(forward, reverse);
    }

    #[test]
    fn test_padded_alias_key_still_matches() {
        let r = Reconciler::new(
            vec!["Ronaldo".to_string()],
            vec![("  R9 ".to_string(), "Ronaldo".to_string())],
            85,
            IndelRatio,
        );
        let res = r.classify(Some("R9"));
        assert_eq!(res.canonical.as_deref(), Some("Ronaldo"));
        assert_eq!(res.method, MatchMethod::Alias);
        assert_eq!(r.resolve(Some(" R9  ")).as_deref(), Some("Ronaldo"));
    }

    #[test]
    fn test_unresolved_label_keeps_raw_text() {
        let r = squad();
        let res = r.classify(Some("  Pelé "));
        assert_eq!(res.canonical.as_deref(), Some("  Pelé "));
        assert!(matches!(res.method, MatchMethod::Unresolved { .. }));
        // resolved labels still come back as the registry id
        assert_eq!(r.resolve(Some(" Cafu ")).as_deref(), Some("Cafu"));
    }

    #[test]
    fn test_empty_registry_leaves_label_unresolved() {
        let res = Reconciler::new(Vec::new(), Vec::new(), 0, IndelRatio).classify(Some("Cafu"));
        assert_eq!(res.canonical.as_deref(), Some("Cafu"));
        assert_eq!(res.method, MatchMethod::Unresolved { best_score: None });
    }

    proptest! {
        #[test]
        fn prop_resolution_is_idempotent(label in "[A-Za-zçáéíóúã ]{0,20}", threshold in 0u8..=100) {
            let mut cfg = IdentityConfig::default();
            cfg.threshold = threshold;
            let r = Reconciler::from_config(&cfg);
            let once = r.resolve(Some(&label));
            if let Some(id) = once.as_deref() {
                if r.is_canonical(id) {
                    let twice = r.resolve(Some(id));
                    prop_assert_eq!(twice.as_deref(), Some(id));
                }
            }
        }

        #[test]
        fn prop_resolution_is_deterministic(label in "\\PC{0,16}") {
            let r = squad();
            prop_assert_eq!(r.classify(Some(&label)), r.classify(Some(&label)));
        }
    }
}
