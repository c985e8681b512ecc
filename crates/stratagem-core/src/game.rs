//! Root game state and lifecycle.

use crate::civ::Civ;
use crate::diplomacy::DiplomacyLedger;
use crate::map::{tournament_map, Province, HOME_PAIRS};
use crate::player::Player;
use crate::types::{PlayerId, ProvinceId, UnitId};
use crate::unit::{Unit, UnitType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default turn limit.
pub const DEFAULT_MAX_TURNS: u32 = 40;

/// Configuration for a new game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of players (1-4).
    pub num_players: usize,
    /// Optional seed, recorded for replay headers. The tournament map is
    /// fixed, so the seed does not currently influence setup.
    pub seed: Option<u64>,
    /// Turn limit for the score victory.
    pub max_turns: u32,
    /// Explicit civ assignment; defaults to the roster order.
    pub civs: Option<Vec<Civ>>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            num_players: 4,
            seed: None,
            max_turns: DEFAULT_MAX_TURNS,
            civs: None,
        }
    }
}

/// A trade route between two provinces with completed trade posts.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TradeRoute {
    pub id: u64,
    pub from: ProvinceId,
    pub to: ProvinceId,
    pub owner: PlayerId,
    /// Owner of the far endpoint at creation time, when distinct.
    pub partner: Option<PlayerId>,
    /// Shortest-path edge count between the endpoints; the base income.
    pub income: i32,
}

/// Errors surfaced to the transport layer. Everything else about an order is
/// a feasibility question the resolver settles by silently dropping.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("game is over")]
    GameOver,
    #[error("player is eliminated")]
    Eliminated,
    #[error("unknown player")]
    UnknownPlayer,
}

/// The complete state of one game.
///
/// Keyed collections are `BTreeMap` so that phase iteration (players and
/// provinces ascending by id) and serialized output are canonical; identical
/// inputs therefore produce byte-identical turn logs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Game {
    /// All provinces, by id.
    pub provinces: BTreeMap<ProvinceId, Province>,
    /// All players, by id.
    pub players: BTreeMap<PlayerId, Player>,
    /// Flat unit table; provinces reference units by id.
    pub units: BTreeMap<UnitId, Unit>,
    /// Trade routes in creation order.
    pub trade_routes: Vec<TradeRoute>,
    /// Messages, proposals, treaties, trust penalties.
    pub diplomacy: DiplomacyLedger,
    /// Current turn, starting at 0.
    pub turn: u32,
    /// Winner, once the game has terminated.
    pub winner: Option<PlayerId>,
    /// Turn limit.
    pub max_turns: u32,
    /// Seed recorded at creation.
    pub seed: Option<u64>,
    /// Players in the order they were eliminated.
    pub eliminated: Vec<PlayerId>,
    next_unit_serial: u64,
    next_route_id: u64,
}

impl Game {
    /// Create a game on the tournament map.
    ///
    /// Player `i` gets the i-th home pair: the capital starts with Militia,
    /// Infantry, and Scout, the second province with one Militia.
    pub fn new(config: &GameConfig) -> Self {
        let num_players = config.num_players.clamp(1, HOME_PAIRS.len());
        let mut game = Self {
            provinces: tournament_map(),
            players: BTreeMap::new(),
            units: BTreeMap::new(),
            trade_routes: Vec::new(),
            diplomacy: DiplomacyLedger::default(),
            turn: 0,
            winner: None,
            max_turns: config.max_turns,
            seed: config.seed,
            eliminated: Vec::new(),
            next_unit_serial: 0,
            next_route_id: 0,
        };

        for i in 0..num_players {
            let pid = format!("p{}", i);
            let civ = config
                .civs
                .as_ref()
                .and_then(|civs| civs.get(i).copied())
                .unwrap_or(Civ::roster()[i % Civ::roster().len()]);
            game.players.insert(pid.clone(), Player::new(pid.clone(), civ));

            let (capital, second) = HOME_PAIRS[i];
            for province in [capital, second] {
                if let Some(p) = game.provinces.get_mut(province) {
                    p.owner = Some(pid.clone());
                }
            }
            game.spawn_unit(&pid, UnitType::Militia, capital);
            game.spawn_unit(&pid, UnitType::Infantry, capital);
            game.spawn_unit(&pid, UnitType::Scout, capital);
            game.spawn_unit(&pid, UnitType::Militia, second);
        }
        game
    }

    /// Create a unit in a province, registering it in the unit table.
    pub fn spawn_unit(&mut self, owner: &str, unit_type: UnitType, province: &str) -> UnitId {
        let id = format!("{}_{}_{}", owner, unit_type, self.next_unit_serial);
        self.next_unit_serial += 1;
        self.units.insert(
            id.clone(),
            Unit::new(id.clone(), unit_type, owner.to_string(), province.to_string()),
        );
        if let Some(p) = self.provinces.get_mut(province) {
            p.unit_ids.push(id.clone());
        }
        id
    }

    /// Remove a unit from the table and from its province.
    pub fn remove_unit(&mut self, unit_id: &str) {
        if let Some(unit) = self.units.remove(unit_id) {
            if let Some(p) = self.provinces.get_mut(&unit.province) {
                p.unit_ids.retain(|id| id != unit_id);
            }
        }
    }

    /// Move a unit to another province. Adjacency is the caller's concern.
    pub fn relocate_unit(&mut self, unit_id: &str, target: &str) {
        let Some(unit) = self.units.get_mut(unit_id) else {
            return;
        };
        let source = std::mem::replace(&mut unit.province, target.to_string());
        if let Some(p) = self.provinces.get_mut(&source) {
            p.unit_ids.retain(|id| id != unit_id);
        }
        if let Some(p) = self.provinces.get_mut(target) {
            p.unit_ids.push(unit_id.to_string());
        }
    }

    /// Allocate the next trade-route id.
    pub fn allocate_route_id(&mut self) -> u64 {
        let id = self.next_route_id;
        self.next_route_id += 1;
        id
    }

    /// Ids of players still alive, ascending.
    pub fn live_players(&self) -> Vec<PlayerId> {
        self.players
            .values()
            .filter(|p| p.alive)
            .map(|p| p.id.clone())
            .collect()
    }

    /// Ids of provinces owned by a player, ascending.
    pub fn provinces_owned_by(&self, player: &str) -> Vec<ProvinceId> {
        self.provinces
            .values()
            .filter(|p| p.owner.as_deref() == Some(player))
            .map(|p| p.id.clone())
            .collect()
    }

    /// Ids of units owned by a player, ascending.
    pub fn units_owned_by(&self, player: &str) -> Vec<UnitId> {
        self.units
            .values()
            .filter(|u| u.owner == player)
            .map(|u| u.id.clone())
            .collect()
    }

    /// Whether two provinces are adjacent.
    pub fn is_adjacent(&self, a: &str, b: &str) -> bool {
        self.provinces
            .get(a)
            .map(|p| p.adjacent.iter().any(|adj| adj == b))
            .unwrap_or(false)
    }

    /// Whether the game has terminated.
    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Resources;

    #[test]
    fn test_new_game_setup() {
        let game = Game::new(&GameConfig::default());
        assert_eq!(game.players.len(), 4);
        assert_eq!(game.provinces.len(), 24);
        assert_eq!(game.turn, 0);
        assert!(game.winner.is_none());

        for (i, (capital, second)) in HOME_PAIRS.iter().enumerate() {
            let pid = format!("p{}", i);
            assert_eq!(game.provinces[*capital].owner.as_deref(), Some(pid.as_str()));
            assert_eq!(game.provinces[*second].owner.as_deref(), Some(pid.as_str()));
            assert_eq!(game.provinces[*capital].unit_ids.len(), 3);
            assert_eq!(game.provinces[*second].unit_ids.len(), 1);
        }
        assert_eq!(game.units.len(), 16);
    }

    #[test]
    fn test_default_civ_assignment() {
        let game = Game::new(&GameConfig::default());
        assert_eq!(game.players["p0"].civ, Civ::Ironborn);
        assert_eq!(game.players["p1"].civ, Civ::Verdanti);
        assert_eq!(game.players["p2"].civ, Civ::Tidecallers);
        assert_eq!(game.players["p3"].civ, Civ::Ashwalkers);
    }

    #[test]
    fn test_explicit_civ_assignment() {
        let config = GameConfig {
            num_players: 2,
            civs: Some(vec![Civ::Ashwalkers, Civ::Ashwalkers]),
            ..GameConfig::default()
        };
        let game = Game::new(&config);
        assert_eq!(game.players["p0"].civ, Civ::Ashwalkers);
        assert_eq!(game.players["p1"].civ, Civ::Ashwalkers);
    }

    #[test]
    fn test_two_player_game_leaves_other_homes_unowned() {
        let config = GameConfig {
            num_players: 2,
            ..GameConfig::default()
        };
        let game = Game::new(&config);
        assert_eq!(game.players.len(), 2);
        assert!(game.provinces["stonekeep"].owner.is_none());
        assert!(game.provinces["deepwater"].owner.is_none());
    }

    #[test]
    fn test_starting_resources() {
        let game = Game::new(&GameConfig::default());
        for player in game.players.values() {
            assert_eq!(player.resources, Resources::new(10, 5, 5));
        }
    }

    #[test]
    fn test_unit_ids_unique_and_located() {
        let game = Game::new(&GameConfig::default());
        for unit in game.units.values() {
            let province = &game.provinces[&unit.province];
            assert!(province.unit_ids.contains(&unit.id));
            // A unit appears in exactly one province list.
            let appearances: usize = game
                .provinces
                .values()
                .filter(|p| p.unit_ids.contains(&unit.id))
                .count();
            assert_eq!(appearances, 1);
        }
    }

    #[test]
    fn test_relocate_unit() {
        let mut game = Game::new(&GameConfig::default());
        let scout = game
            .units
            .values()
            .find(|u| u.owner == "p0" && u.unit_type == UnitType::Scout)
            .map(|u| u.id.clone())
            .unwrap();
        game.relocate_unit(&scout, "mistwood");
        assert_eq!(game.units[&scout].province, "mistwood");
        assert!(game.provinces["mistwood"].unit_ids.contains(&scout));
        assert!(!game.provinces["ironvale"].unit_ids.contains(&scout));
    }

    #[test]
    fn test_remove_unit() {
        let mut game = Game::new(&GameConfig::default());
        let id = game.provinces["ironvale"].unit_ids[0].clone();
        game.remove_unit(&id);
        assert!(!game.units.contains_key(&id));
        assert!(!game.provinces["ironvale"].unit_ids.contains(&id));
    }

    #[test]
    fn test_game_serialization_round_trip() {
        let game = Game::new(&GameConfig::default());
        let json = serde_json::to_string(&game).unwrap();
        let restored: Game = serde_json::from_str(&json).unwrap();
        assert_eq!(serde_json::to_string(&restored).unwrap(), json);
    }
}
