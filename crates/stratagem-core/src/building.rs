//! Building types, the fixed stats table, and building records.

use crate::types::{Age, Resources};
use serde::{Deserialize, Serialize};

/// Defense added per completed Fortress.
pub const FORTRESS_DEFENSE: i32 = 3;

/// Types of buildings. At most one of each type per province.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingType {
    Farm,
    Mine,
    Market,
    Barracks,
    Fortress,
    TradePost,
    Watchtower,
}

/// Static stats for a building type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildingStats {
    /// Build cost.
    pub cost: Resources,
    /// Minimum age required to build.
    pub min_age: Age,
}

impl BuildingType {
    /// The fixed stats table.
    pub const fn stats(&self) -> BuildingStats {
        match self {
            BuildingType::Farm => BuildingStats {
                cost: Resources::new(2, 0, 0),
                min_age: Age::Bronze,
            },
            BuildingType::Mine => BuildingStats {
                cost: Resources::new(0, 2, 0),
                min_age: Age::Bronze,
            },
            BuildingType::Market => BuildingStats {
                cost: Resources::new(0, 0, 3),
                min_age: Age::Bronze,
            },
            BuildingType::Barracks => BuildingStats {
                cost: Resources::new(0, 2, 0),
                min_age: Age::Bronze,
            },
            BuildingType::Fortress => BuildingStats {
                cost: Resources::new(0, 3, 2),
                min_age: Age::Iron,
            },
            BuildingType::TradePost => BuildingStats {
                cost: Resources::new(0, 0, 2),
                min_age: Age::Iron,
            },
            BuildingType::Watchtower => BuildingStats {
                cost: Resources::new(0, 1, 1),
                min_age: Age::Iron,
            },
        }
    }

    /// Per-turn production bonus of a completed building.
    pub const fn production_bonus(&self) -> Resources {
        match self {
            BuildingType::Farm => Resources::food(2),
            BuildingType::Mine => Resources::iron(2),
            BuildingType::Market => Resources::gold(2),
            _ => Resources::zero(),
        }
    }

    /// Get all building variants.
    pub const fn all() -> &'static [BuildingType] {
        &[
            BuildingType::Farm,
            BuildingType::Mine,
            BuildingType::Market,
            BuildingType::Barracks,
            BuildingType::Fortress,
            BuildingType::TradePost,
            BuildingType::Watchtower,
        ]
    }
}

impl std::fmt::Display for BuildingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BuildingType::Farm => "farm",
            BuildingType::Mine => "mine",
            BuildingType::Market => "market",
            BuildingType::Barracks => "barracks",
            BuildingType::Fortress => "fortress",
            BuildingType::TradePost => "trade_post",
            BuildingType::Watchtower => "watchtower",
        };
        write!(f, "{}", name)
    }
}

/// A building placed in a province.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Building {
    /// Type of building.
    pub building_type: BuildingType,
    /// Construction finished. Builds complete instantly, so this is true for
    /// every building the engine creates; the flag stays in the model so
    /// views and replays can carry it.
    pub done: bool,
}

impl Building {
    /// Create a completed building.
    pub fn completed(building_type: BuildingType) -> Self {
        Self {
            building_type,
            done: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_table() {
        assert_eq!(BuildingType::Farm.stats().cost, Resources::new(2, 0, 0));
        assert_eq!(BuildingType::Fortress.stats().cost, Resources::new(0, 3, 2));
        assert_eq!(BuildingType::Fortress.stats().min_age, Age::Iron);
        assert_eq!(BuildingType::Market.stats().min_age, Age::Bronze);
    }

    #[test]
    fn test_production_bonus() {
        assert_eq!(BuildingType::Farm.production_bonus(), Resources::food(2));
        assert_eq!(BuildingType::Mine.production_bonus(), Resources::iron(2));
        assert_eq!(BuildingType::Market.production_bonus(), Resources::gold(2));
        assert_eq!(
            BuildingType::Watchtower.production_bonus(),
            Resources::zero()
        );
    }

    #[test]
    fn test_building_type_serialization() {
        assert_eq!(
            serde_json::to_string(&BuildingType::TradePost).unwrap(),
            "\"trade_post\""
        );
        let b: BuildingType = serde_json::from_str("\"watchtower\"").unwrap();
        assert_eq!(b, BuildingType::Watchtower);
    }
}
