//! Unit types, the fixed stats table, and the combat triangle.

use crate::terrain::Terrain;
use crate::types::{Age, PlayerId, ProvinceId, Resources, UnitId};
use serde::{Deserialize, Serialize};

/// Maximum veterancy a unit can accumulate.
pub const VETERAN_CAP: u8 = 2;

/// Types of units, including the four civ-unique variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    Militia,
    Infantry,
    Archers,
    Cavalry,
    Siege,
    Knights,
    Scout,
    // Civ-unique variants, buildable via a `unique` build request.
    Huscarl,
    Herbalist,
    Corsair,
    Sage,
}

/// Static stats for a unit type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitStats {
    /// Build cost before civ and Barracks discounts.
    pub cost: Resources,
    /// Base combat strength (before veterancy).
    pub strength: i32,
    /// Movement speed (kept in the table; movement is one hop per turn).
    pub speed: u32,
    /// Minimum age required to build.
    pub min_age: Age,
}

impl UnitType {
    /// The fixed stats table.
    pub const fn stats(&self) -> UnitStats {
        match self {
            UnitType::Militia => UnitStats {
                cost: Resources::new(1, 0, 0),
                strength: 1,
                speed: 1,
                min_age: Age::Bronze,
            },
            UnitType::Infantry => UnitStats {
                cost: Resources::new(1, 1, 0),
                strength: 3,
                speed: 1,
                min_age: Age::Bronze,
            },
            UnitType::Archers => UnitStats {
                cost: Resources::new(1, 0, 1),
                strength: 2,
                speed: 1,
                min_age: Age::Iron,
            },
            UnitType::Cavalry => UnitStats {
                cost: Resources::new(2, 1, 0),
                strength: 3,
                speed: 2,
                min_age: Age::Iron,
            },
            UnitType::Siege => UnitStats {
                cost: Resources::new(0, 2, 2),
                strength: 1,
                speed: 1,
                min_age: Age::Steel,
            },
            UnitType::Knights => UnitStats {
                cost: Resources::new(2, 2, 1),
                strength: 5,
                speed: 2,
                min_age: Age::Steel,
            },
            UnitType::Scout => UnitStats {
                cost: Resources::new(0, 0, 1),
                strength: 0,
                speed: 3,
                min_age: Age::Bronze,
            },
            UnitType::Huscarl => UnitStats {
                cost: Resources::new(1, 3, 0),
                strength: 6,
                speed: 1,
                min_age: Age::Iron,
            },
            UnitType::Herbalist => UnitStats {
                cost: Resources::new(2, 0, 1),
                strength: 0,
                speed: 1,
                min_age: Age::Bronze,
            },
            UnitType::Corsair => UnitStats {
                cost: Resources::new(1, 1, 1),
                strength: 3,
                speed: 2,
                min_age: Age::Iron,
            },
            UnitType::Sage => UnitStats {
                cost: Resources::new(0, 0, 3),
                strength: 0,
                speed: 1,
                min_age: Age::Iron,
            },
        }
    }

    /// Combat-triangle bonus this type gains against an enemy type.
    ///
    /// Infantry beats Cavalry, Cavalry beats Archers, Archers beat Infantry.
    /// Applied once per unit per enemy type present, not per enemy unit.
    pub const fn triangle_bonus_against(&self, enemy: UnitType) -> i32 {
        match (self, enemy) {
            (UnitType::Infantry, UnitType::Cavalry)
            | (UnitType::Cavalry, UnitType::Archers)
            | (UnitType::Archers, UnitType::Infantry) => 2,
            _ => 0,
        }
    }

    /// Terrain combat bonus: Cavalry on Plains, Archers in Forest.
    pub const fn terrain_bonus(&self, terrain: Terrain) -> i32 {
        match (self, terrain) {
            (UnitType::Cavalry, Terrain::Plains) | (UnitType::Archers, Terrain::Forest) => 1,
            _ => 0,
        }
    }

    /// Whether the unit costs 1 food per turn in upkeep.
    pub const fn pays_upkeep(&self) -> bool {
        !matches!(self, UnitType::Militia | UnitType::Scout)
    }

    /// Whether this is one of the civ-unique variants.
    pub const fn is_unique(&self) -> bool {
        matches!(
            self,
            UnitType::Huscarl | UnitType::Herbalist | UnitType::Corsair | UnitType::Sage
        )
    }

    /// Extra per-turn production this unit contributes to the province it
    /// stands in (when that province is owned by the unit's owner).
    pub const fn production_hook(&self) -> Resources {
        match self {
            UnitType::Herbalist => Resources::food(2),
            UnitType::Sage => Resources::new(1, 1, 1),
            _ => Resources::zero(),
        }
    }
}

impl std::fmt::Display for UnitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            UnitType::Militia => "militia",
            UnitType::Infantry => "infantry",
            UnitType::Archers => "archers",
            UnitType::Cavalry => "cavalry",
            UnitType::Siege => "siege",
            UnitType::Knights => "knights",
            UnitType::Scout => "scout",
            UnitType::Huscarl => "huscarl",
            UnitType::Herbalist => "herbalist",
            UnitType::Corsair => "corsair",
            UnitType::Sage => "sage",
        };
        write!(f, "{}", name)
    }
}

/// A unit on the map.
///
/// Units live in the game's flat unit table; provinces reference them by id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Unit {
    /// Unique identifier.
    pub id: UnitId,
    /// Type of unit.
    pub unit_type: UnitType,
    /// Owning player.
    pub owner: PlayerId,
    /// Province the unit currently stands in.
    pub province: ProvinceId,
    /// Veterancy earned from winning battles (0-2).
    pub veteran: u8,
}

impl Unit {
    /// Create a fresh (non-veteran) unit.
    pub fn new(id: UnitId, unit_type: UnitType, owner: PlayerId, province: ProvinceId) -> Self {
        Self {
            id,
            unit_type,
            owner,
            province,
            veteran: 0,
        }
    }

    /// Current strength: base strength plus veterancy.
    pub fn strength(&self) -> i32 {
        self.unit_type.stats().strength + self.veteran as i32
    }

    /// Grant one level of veterancy, capped.
    pub fn gain_veterancy(&mut self) {
        if self.veteran < VETERAN_CAP {
            self.veteran += 1;
        }
    }
}
