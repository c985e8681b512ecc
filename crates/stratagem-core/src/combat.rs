//! Per-province combat resolution.
//!
//! Combat is a pure function from the province context and the sides present
//! to an outcome record; the resolver applies the outcome to game state.

use crate::terrain::Terrain;
use crate::types::{PlayerId, ProvinceId, UnitId};
use crate::unit::{Unit, UnitType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Share of the losing strength the winner pays in casualties (divisor).
const WINNER_CASUALTY_DIVISOR: i32 = 4;

/// Bonus per Siege unit attacking a fortified province with `siege_craft`.
const SIEGE_CRAFT_BONUS: i32 = 3;

/// One side in a combat: a player and their units in the province.
#[derive(Clone, Debug)]
pub struct CombatSide {
    pub player: PlayerId,
    pub units: Vec<Unit>,
    /// Side holds the Tactics tech (+1 strength per unit).
    pub has_tactics: bool,
    /// Side holds the Fortification tech (+1 when defending).
    pub has_fortification: bool,
    /// Side holds the Siege Craft tech (Siege +3 vs fortifications).
    pub has_siege_craft: bool,
}

/// The province a combat is fought over.
#[derive(Clone, Debug)]
pub struct Battleground {
    pub province: ProvinceId,
    pub terrain: Terrain,
    /// Owner before the battle, if any.
    pub owner: Option<PlayerId>,
    /// Terrain defense plus Fortress bonus, credited to the owning side.
    pub defense_bonus: i32,
    /// Whether a completed Fortress is present.
    pub fortified: bool,
}

/// Serializable summary of a combat, carried in turn results and replays.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CombatReport {
    pub province: ProvinceId,
    /// Effective strength per side.
    pub strengths: BTreeMap<PlayerId, i32>,
    pub winner: PlayerId,
    /// Units lost per side.
    pub losses: BTreeMap<PlayerId, u32>,
}

/// Full outcome of a combat, including the unit-level changes to apply.
#[derive(Clone, Debug)]
pub struct CombatOutcome {
    pub report: CombatReport,
    /// Every unit destroyed, losers first, then winner casualties.
    pub killed: Vec<UnitId>,
    /// The winner's surviving units, due a veterancy point.
    pub survivors: Vec<UnitId>,
    /// Enemy units destroyed, for the Tidecaller loot hook.
    pub enemy_units_killed: u32,
}

/// Resolve a combat between two or more sides.
///
/// Effective strength sums per unit: strength (base + veterancy), +1 with
/// Tactics, the combat-triangle bonus once per enemy type present, and the
/// unit/terrain bonus. The owning side adds the province defense bonus and
/// +1 with Fortification; on River terrain every non-owning side loses one
/// point per unit, floored at zero.
pub fn resolve(ground: &Battleground, sides: &[CombatSide]) -> CombatOutcome {
    debug_assert!(sides.len() >= 2, "combat needs at least two sides");

    let strengths: BTreeMap<PlayerId, i32> = sides
        .iter()
        .map(|side| (side.player.clone(), side_strength(ground, side, sides)))
        .collect();

    let winner = pick_winner(&strengths, ground.owner.as_deref());

    // Losing sides lose everything.
    let mut killed = Vec::new();
    let mut losses: BTreeMap<PlayerId, u32> = BTreeMap::new();
    let mut losing_strength = 0;
    for side in sides.iter().filter(|s| s.player != winner) {
        losses.insert(side.player.clone(), side.units.len() as u32);
        losing_strength += strengths[&side.player];
        killed.extend(side.units.iter().map(|u| u.id.clone()));
    }
    let enemy_units_killed = killed.len() as u32;

    // The winner pays a fraction of the losing strength, weakest units
    // first, and always keeps at least one unit.
    let winner_units = sides
        .iter()
        .find(|s| s.player == winner)
        .map(|s| s.units.clone())
        .unwrap_or_default();
    let mut by_strength = winner_units.clone();
    by_strength.sort_by_key(Unit::strength);
    let casualties = (losing_strength / WINNER_CASUALTY_DIVISOR)
        .max(0)
        .min(by_strength.len() as i32 - 1)
        .max(0) as usize;
    let dead: BTreeSet<UnitId> = by_strength
        .iter()
        .take(casualties)
        .map(|u| u.id.clone())
        .collect();
    if casualties > 0 {
        losses.insert(winner.clone(), casualties as u32);
    }
    killed.extend(dead.iter().cloned());

    let survivors = winner_units
        .iter()
        .filter(|u| !dead.contains(&u.id))
        .map(|u| u.id.clone())
        .collect();

    CombatOutcome {
        report: CombatReport {
            province: ground.province.clone(),
            strengths,
            winner,
            losses,
        },
        killed,
        survivors,
        enemy_units_killed,
    }
}

/// Effective strength of one side.
fn side_strength(ground: &Battleground, side: &CombatSide, all: &[CombatSide]) -> i32 {
    let enemy_types: BTreeSet<UnitType> = all
        .iter()
        .filter(|s| s.player != side.player)
        .flat_map(|s| s.units.iter().map(|u| u.unit_type))
        .collect();

    let is_owner = ground.owner.as_deref() == Some(side.player.as_str());
    let mut total = 0;
    for unit in &side.units {
        total += unit.strength();
        if side.has_tactics {
            total += 1;
        }
        for &enemy in &enemy_types {
            total += unit.unit_type.triangle_bonus_against(enemy);
        }
        total += unit.unit_type.terrain_bonus(ground.terrain);
        if side.has_siege_craft
            && unit.unit_type == UnitType::Siege
            && ground.fortified
            && !is_owner
        {
            total += SIEGE_CRAFT_BONUS;
        }
    }

    if is_owner {
        total += ground.defense_bonus;
        if side.has_fortification {
            total += 1;
        }
    } else if ground.terrain == Terrain::River {
        total = (total - side.units.len() as i32).max(0);
    }
    total
}

/// Highest strength wins; ties go to the province owner when present among
/// the tied sides, otherwise to the lexicographically smallest player id.
fn pick_winner(strengths: &BTreeMap<PlayerId, i32>, owner: Option<&str>) -> PlayerId {
    let best = strengths.values().max().copied().unwrap_or(0);
    let mut tied = strengths
        .iter()
        .filter(|(_, &s)| s == best)
        .map(|(p, _)| p.clone());
    if let Some(owner) = owner {
        if strengths.get(owner) == Some(&best) {
            return owner.to_string();
        }
    }
    // BTreeMap iteration is ascending, so the first tied id is the smallest.
    tied.next().unwrap_or_default()
}
