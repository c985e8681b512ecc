//! The tech tree: nine techs in three age groups, plus age-up costs.

use crate::types::{Age, Resources};
use serde::{Deserialize, Serialize};

/// Technology identifiers.
///
/// A player may hold at most one tech per age group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechId {
    // Bronze
    Agriculture,
    Mining,
    Masonry,
    // Iron
    Tactics,
    Commerce,
    Fortification,
    // Steel
    Blitz,
    SiegeCraft,
    Diplomacy,
}

impl TechId {
    /// The age group this tech belongs to.
    pub const fn age(&self) -> Age {
        match self {
            TechId::Agriculture | TechId::Mining | TechId::Masonry => Age::Bronze,
            TechId::Tactics | TechId::Commerce | TechId::Fortification => Age::Iron,
            TechId::Blitz | TechId::SiegeCraft | TechId::Diplomacy => Age::Steel,
        }
    }

    /// Research cost before civ discount, by age group.
    pub const fn cost(&self) -> Resources {
        match self.age() {
            Age::Bronze => Resources::new(5, 3, 2),
            Age::Iron => Resources::new(8, 6, 4),
            Age::Steel => Resources::new(12, 10, 8),
        }
    }

    /// All techs in a given age group.
    pub const fn group(age: Age) -> [TechId; 3] {
        match age {
            Age::Bronze => [TechId::Agriculture, TechId::Mining, TechId::Masonry],
            Age::Iron => [TechId::Tactics, TechId::Commerce, TechId::Fortification],
            Age::Steel => [TechId::Blitz, TechId::SiegeCraft, TechId::Diplomacy],
        }
    }

    /// Get all tech variants.
    pub const fn all() -> &'static [TechId] {
        &[
            TechId::Agriculture,
            TechId::Mining,
            TechId::Masonry,
            TechId::Tactics,
            TechId::Commerce,
            TechId::Fortification,
            TechId::Blitz,
            TechId::SiegeCraft,
            TechId::Diplomacy,
        ]
    }
}

impl std::fmt::Display for TechId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TechId::Agriculture => "agriculture",
            TechId::Mining => "mining",
            TechId::Masonry => "masonry",
            TechId::Tactics => "tactics",
            TechId::Commerce => "commerce",
            TechId::Fortification => "fortification",
            TechId::Blitz => "blitz",
            TechId::SiegeCraft => "siege_craft",
            TechId::Diplomacy => "diplomacy",
        };
        write!(f, "{}", name)
    }
}

/// Cost to advance into the given age, before civ discount.
///
/// Returns `None` for Bronze (every player starts there).
pub const fn age_up_cost(target: Age) -> Option<Resources> {
    match target {
        Age::Bronze => None,
        Age::Iron => Some(Resources::new(10, 8, 5)),
        Age::Steel => Some(Resources::new(15, 12, 10)),
    }
}
