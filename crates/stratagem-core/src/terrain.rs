//! Terrain types and their fixed combat/production tables.

use crate::types::Resources;
use serde::{Deserialize, Serialize};

/// Terrain of a province.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terrain {
    Plains,
    Forest,
    Mountain,
    Coast,
    River,
}

impl Terrain {
    /// Base defense bonus granted to the owning side in combat.
    pub const fn defense_bonus(&self) -> i32 {
        match self {
            Terrain::Plains => 0,
            Terrain::Forest => 1,
            Terrain::Mountain => 3,
            Terrain::Coast => 0,
            Terrain::River => 1,
        }
    }

    /// Base per-turn resource production of a province with this terrain.
    pub const fn production(&self) -> Resources {
        match self {
            Terrain::Plains => Resources::new(3, 0, 1),
            Terrain::Forest => Resources::new(2, 1, 0),
            Terrain::Mountain => Resources::new(0, 3, 1),
            Terrain::Coast => Resources::new(2, 0, 2),
            Terrain::River => Resources::new(2, 1, 1),
        }
    }

    /// Get all terrain variants.
    pub const fn all() -> &'static [Terrain] {
        &[
            Terrain::Plains,
            Terrain::Forest,
            Terrain::Mountain,
            Terrain::Coast,
            Terrain::River,
        ]
    }
}

impl std::fmt::Display for Terrain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Terrain::Plains => write!(f, "plains"),
            Terrain::Forest => write!(f, "forest"),
            Terrain::Mountain => write!(f, "mountain"),
            Terrain::Coast => write!(f, "coast"),
            Terrain::River => write!(f, "river"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defense_bonuses() {
        assert_eq!(Terrain::Plains.defense_bonus(), 0);
        assert_eq!(Terrain::Forest.defense_bonus(), 1);
        assert_eq!(Terrain::Mountain.defense_bonus(), 3);
        assert_eq!(Terrain::River.defense_bonus(), 1);
    }

    #[test]
    fn test_production_table() {
        assert_eq!(Terrain::Plains.production(), Resources::new(3, 0, 1));
        assert_eq!(Terrain::Mountain.production(), Resources::new(0, 3, 1));
        assert_eq!(Terrain::Coast.production(), Resources::new(2, 0, 2));
    }

    #[test]
    fn test_terrain_serialization() {
        assert_eq!(serde_json::to_string(&Terrain::River).unwrap(), "\"river\"");
    }
}
