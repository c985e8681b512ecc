//! Civilizations and their modifier kits.
//!
//! Civ bonuses are applied by the resolver through the methods here rather
//! than baked into unit or province state, so every civ-conditional site in
//! the engine is a single query against this profile.

use crate::types::Resources;
use crate::unit::UnitType;
use serde::{Deserialize, Serialize};

/// The four playable civilizations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Civ {
    /// Military units cost 1 less iron; unique unit Huscarl.
    Ironborn,
    /// +1 food from every owned province; unique unit Herbalist.
    Verdanti,
    /// Trade income x3/2 and 1 gold per enemy unit killed; unique Corsair.
    Tidecallers,
    /// Tech and age-up costs x3/4; unique unit Sage.
    Ashwalkers,
}

impl Civ {
    /// Default civ assignment order for players `p0..p3`.
    pub const fn roster() -> &'static [Civ] {
        &[Civ::Ironborn, Civ::Verdanti, Civ::Tidecallers, Civ::Ashwalkers]
    }

    /// The civ's unique unit, built via a `unique` build request.
    pub const fn unique_unit(&self) -> UnitType {
        match self {
            Civ::Ironborn => UnitType::Huscarl,
            Civ::Verdanti => UnitType::Herbalist,
            Civ::Tidecallers => UnitType::Corsair,
            Civ::Ashwalkers => UnitType::Sage,
        }
    }

    /// Apply the civ's unit cost modifier to a base cost.
    pub fn unit_cost(&self, base: Resources) -> Resources {
        match self {
            Civ::Ironborn => Resources {
                iron: (base.iron - 1).max(0),
                ..base
            },
            _ => base,
        }
    }

    /// Apply the civ's tech/age-up cost modifier to a base cost.
    pub fn tech_cost(&self, base: Resources) -> Resources {
        match self {
            Civ::Ashwalkers => base.three_quarters(),
            _ => base,
        }
    }

    /// Flat production bonus added per owned province during collection.
    pub const fn province_production_bonus(&self) -> Resources {
        match self {
            Civ::Verdanti => Resources::food(1),
            _ => Resources::zero(),
        }
    }

    /// Apply the civ's trade-income multiplier.
    pub const fn trade_income(&self, base: i32) -> i32 {
        match self {
            Civ::Tidecallers => base * 3 / 2,
            _ => base,
        }
    }

    /// Gold looted per enemy unit killed when this civ wins a combat.
    pub const fn gold_per_kill(&self) -> i32 {
        match self {
            Civ::Tidecallers => 1,
            _ => 0,
        }
    }
}

impl std::fmt::Display for Civ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Civ::Ironborn => write!(f, "Ironborn"),
            Civ::Verdanti => write!(f, "Verdanti"),
            Civ::Tidecallers => write!(f, "Tidecallers"),
            Civ::Ashwalkers => write!(f, "Ashwalkers"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ironborn_unit_discount() {
        let knights = UnitType::Knights.stats().cost;
        let discounted = Civ::Ironborn.unit_cost(knights);
        assert_eq!(discounted, Resources::new(2, 1, 1));
        // Floors at zero iron.
        let militia = Civ::Ironborn.unit_cost(UnitType::Militia.stats().cost);
        assert_eq!(militia.iron, 0);
        // Other civs pay full price.
        assert_eq!(Civ::Verdanti.unit_cost(knights), knights);
    }

    #[test]
    fn test_ashwalker_tech_discount() {
        let cost = Civ::Ashwalkers.tech_cost(Resources::new(10, 8, 5));
        assert_eq!(cost, Resources::new(7, 6, 3));
        assert_eq!(
            Civ::Ironborn.tech_cost(Resources::new(10, 8, 5)),
            Resources::new(10, 8, 5)
        );
    }

    #[test]
    fn test_tidecaller_trade_multiplier() {
        assert_eq!(Civ::Tidecallers.trade_income(4), 6);
        // Integer division floors.
        assert_eq!(Civ::Tidecallers.trade_income(3), 4);
        assert_eq!(Civ::Verdanti.trade_income(4), 4);
    }

    #[test]
    fn test_verdanti_food_bonus() {
        assert_eq!(
            Civ::Verdanti.province_production_bonus(),
            Resources::food(1)
        );
        assert_eq!(
            Civ::Tidecallers.province_production_bonus(),
            Resources::zero()
        );
    }

    #[test]
    fn test_unique_units() {
        assert_eq!(Civ::Ironborn.unique_unit(), UnitType::Huscarl);
        assert_eq!(Civ::Ashwalkers.unique_unit(), UnitType::Sage);
    }

    #[test]
    fn test_civ_serialization() {
        assert_eq!(
            serde_json::to_string(&Civ::Tidecallers).unwrap(),
            "\"tidecallers\""
        );
    }
}
