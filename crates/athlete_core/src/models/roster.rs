//! Official roster (canonical entity registry)
//!
//! The registry is configuration, never derived from the feed. The default
//! is the Brazil 2002 World Cup 23-man squad.

use super::observation::Position;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// A registry-backed athlete identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalEntity {
    /// Canonical name; the id every raw label resolves to
    pub id: String,
    pub position: Position,
    /// Squad number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u8>,
}

impl CanonicalEntity {
    pub fn new(id: impl Into<String>, position: Position) -> Self {
        Self {
            id: id.into(),
            position,
            number: None,
        }
    }
}

const SQUAD_2002: [(&str, Position, u8); 23] = [
    ("Marcos", Position::Goalkeeper, 1),
    ("Cafu", Position::RightBack, 2),
    ("Lúcio", Position::CentreBack, 3),
    ("Roque Júnior", Position::CentreBack, 4),
    ("Edmilson", Position::CentreBack, 5),
    ("Roberto Carlos", Position::LeftBack, 6),
    ("Ricardinho", Position::Midfielder, 7),
    ("Gilberto Silva", Position::DefensiveMidfielder, 8),
    ("Ronaldo", Position::Forward, 9),
    ("Rivaldo", Position::Midfielder, 10),
    ("Ronaldinho Gaúcho", Position::Midfielder, 11),
    ("Dida", Position::Goalkeeper, 12),
    ("Belletti", Position::RightBack, 13),
    ("Anderson Polga", Position::CentreBack, 14),
    ("Kléberson", Position::DefensiveMidfielder, 15),
    ("Júnior", Position::LeftBack, 16),
    ("Denílson", Position::Midfielder, 17),
    ("Vampeta", Position::DefensiveMidfielder, 18),
    ("Juninho Paulista", Position::Midfielder, 19),
    ("Edílson", Position::Forward, 20),
    ("Luizão", Position::Forward, 21),
    ("Rogério Ceni", Position::Goalkeeper, 22),
    ("Kaká", Position::Midfielder, 23),
];

static DEFAULT_ROSTER: Lazy<Vec<CanonicalEntity>> = Lazy::new(|| {
    SQUAD_2002
        .iter()
        .map(|&(name, position, number)| CanonicalEntity {
            id: name.to_string(),
            position,
            number: Some(number),
        })
        .collect()
});

/// Built-in registry used when the configuration supplies none.
pub fn default_roster() -> Vec<CanonicalEntity> {
    DEFAULT_ROSTER.clone()
}

/// Known misspellings/nicknames seen in the feed.
pub fn default_aliases() -> Vec<(String, String)> {
    vec![
        ("Ronaldo Fenômeno".to_string(), "Ronaldo".to_string()),
        ("Ronaldinho".to_string(), "Ronaldinho Gaúcho".to_string()),
    ]
}
