//! Identity reconciliation settings: registry, alias table, fuzzy threshold

use crate::models::{default_aliases, default_roster, CanonicalEntity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Minimum similarity (0-100) for a fuzzy match (default: 85)
    pub threshold: u8,
    /// Explicit raw label → canonical id rewrites
    pub aliases: BTreeMap<String, String>,
    /// Official registry
    pub roster: Vec<CanonicalEntity>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            threshold: 85,
            aliases: default_aliases().into_iter().collect(),
            roster: default_roster(),
        }
    }
}

impl IdentityConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.threshold > 100 {
            return Err(format!(
                "identity.threshold must be within 0..=100 (got {})",
                self.threshold
            ));
        }

        let mut seen = std::collections::BTreeSet::new();
        for entity in &self.roster {
            if entity.id.trim().is_empty() {
                return Err("identity.roster contains an empty id".to_string());
            }
            if !seen.insert(entity.id.as_str()) {
                return Err(format!("identity.roster has duplicate id '{}'", entity.id));
            }
        }

        for (alias, target) in &self.aliases {
            if !seen.contains(target.as_str()) {
                return Err(format!(
                    "identity.aliases maps '{}' to '{}', which is not in the roster",
                    alias, target
                ));
            }
        }

        Ok(())
    }
}
