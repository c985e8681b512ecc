//! Core type aliases and small value types used throughout the crate.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Unique identifier for a game session.
pub type GameId = String;

/// Player identifier (`"p0"` .. `"p3"`).
pub type PlayerId = String;

/// Province identifier (lowercase province name).
pub type ProvinceId = String;

/// Unique identifier for a unit (`"{player}_{type}_{serial}"`).
pub type UnitId = String;

/// Identifier for treaties and treaty proposals.
pub type TreatyId = u64;

/// The three ages of progression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Age {
    #[default]
    Bronze,
    Iron,
    Steel,
}

impl Age {
    /// Get the next age in progression.
    pub const fn next(&self) -> Option<Age> {
        match self {
            Age::Bronze => Some(Age::Iron),
            Age::Iron => Some(Age::Steel),
            Age::Steel => None,
        }
    }

    /// Numeric level of the age (1-3).
    pub const fn level(&self) -> u32 {
        match self {
            Age::Bronze => 1,
            Age::Iron => 2,
            Age::Steel => 3,
        }
    }

    /// Get all age variants in order.
    pub const fn all() -> &'static [Age] {
        &[Age::Bronze, Age::Iron, Age::Steel]
    }
}

impl std::fmt::Display for Age {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Age::Bronze => write!(f, "Bronze Age"),
            Age::Iron => write!(f, "Iron Age"),
            Age::Steel => write!(f, "Steel Age"),
        }
    }
}

/// A bundle of the three stockpiled resources.
///
/// Used both for player stockpiles (kept non-negative by the engine) and for
/// per-turn deltas (which may go negative before clamping).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    pub food: i32,
    pub iron: i32,
    pub gold: i32,
}

impl Resources {
    /// All three components zero.
    pub const fn zero() -> Self {
        Self {
            food: 0,
            iron: 0,
            gold: 0,
        }
    }

    /// Create from individual components.
    pub const fn new(food: i32, iron: i32, gold: i32) -> Self {
        Self { food, iron, gold }
    }

    /// Only food.
    pub const fn food(amount: i32) -> Self {
        Self {
            food: amount,
            ..Self::zero()
        }
    }

    /// Only iron.
    pub const fn iron(amount: i32) -> Self {
        Self {
            iron: amount,
            ..Self::zero()
        }
    }

    /// Only gold.
    pub const fn gold(amount: i32) -> Self {
        Self {
            gold: amount,
            ..Self::zero()
        }
    }

    /// Whether this stockpile covers the given cost in every component.
    pub fn covers(&self, cost: &Resources) -> bool {
        self.food >= cost.food && self.iron >= cost.iron && self.gold >= cost.gold
    }

    /// Clamp all negative components to zero.
    pub fn clamp_non_negative(&self) -> Self {
        Self {
            food: self.food.max(0),
            iron: self.iron.max(0),
            gold: self.gold.max(0),
        }
    }

    /// Check that every component is non-negative.
    pub fn is_non_negative(&self) -> bool {
        self.food >= 0 && self.iron >= 0 && self.gold >= 0
    }

    /// Per-component `value * 3 / 4` with integer flooring.
    pub const fn three_quarters(&self) -> Self {
        Self {
            food: self.food * 3 / 4,
            iron: self.iron * 3 / 4,
            gold: self.gold * 3 / 4,
        }
    }
}

impl Add for Resources {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            food: self.food + other.food,
            iron: self.iron + other.iron,
            gold: self.gold + other.gold,
        }
    }
}

impl AddAssign for Resources {
    fn add_assign(&mut self, other: Self) {
        self.food += other.food;
        self.iron += other.iron;
        self.gold += other.gold;
    }
}

impl Sub for Resources {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            food: self.food - other.food,
            iron: self.iron - other.iron,
            gold: self.gold - other.gold,
        }
    }
}

impl SubAssign for Resources {
    fn sub_assign(&mut self, other: Self) {
        self.food -= other.food;
        self.iron -= other.iron;
        self.gold -= other.gold;
    }
}

impl std::fmt::Display for Resources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}F {}I {}G", self.food, self.iron, self.gold)
    }
}
