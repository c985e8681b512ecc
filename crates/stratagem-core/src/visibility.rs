//! Per-player fog-of-war projections and the full-state spectator view.
//!
//! The projection is the only state a player client ever receives. The
//! security property: a fogged province appears as a bare id with no
//! attributes, and a visible-but-not-owned province never reveals unit
//! types or buildings, only an aggregate count.

use crate::building::BuildingType;
use crate::diplomacy::{Message, Proposal, Treaty};
use crate::game::{Game, TradeRoute};
use crate::terrain::Terrain;
use crate::types::{Age, PlayerId, ProvinceId, Resources, UnitId};
use crate::unit::UnitType;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Full detail of a province, shown to its owner and to spectators.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProvinceDetail {
    pub name: String,
    pub terrain: Terrain,
    pub owner: Option<PlayerId>,
    pub units: Vec<UnitView>,
    pub buildings: Vec<BuildingView>,
    pub production: Resources,
    pub adjacent: Vec<ProvinceId>,
}

/// A unit as rendered in a full-detail view.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnitView {
    pub id: UnitId,
    #[serde(rename = "type")]
    pub unit_type: UnitType,
    pub owner: PlayerId,
    pub veteran: u8,
}

/// A building as rendered in a full-detail view.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuildingView {
    #[serde(rename = "type")]
    pub building_type: BuildingType,
    pub done: bool,
}

/// Limited view of a visible-but-not-owned province: terrain, owner,
/// adjacency, and an aggregate unit count. No types, no buildings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProvinceGlimpse {
    pub name: String,
    pub terrain: Terrain,
    pub owner: Option<PlayerId>,
    pub unit_count: usize,
    pub adjacent: Vec<ProvinceId>,
}

/// What a player sees of one province.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "visibility", rename_all = "lowercase")]
pub enum ProvinceView {
    Owned(ProvinceDetail),
    Observed(ProvinceGlimpse),
}

/// Diplomacy as visible to one player.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DiplomacyView {
    /// Current-turn messages that are public, sent by, or addressed to the
    /// player.
    pub messages: Vec<Message>,
    /// Pending proposals addressed to the player.
    pub proposals: Vec<Proposal>,
    /// Active treaties the player is party to.
    pub treaties: Vec<Treaty>,
    /// The public trust-penalty table.
    pub trust_penalties: BTreeMap<PlayerId, u32>,
}

/// The per-player projection of the game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerView {
    pub turn: u32,
    pub player: PlayerId,
    pub winner: Option<PlayerId>,
    pub civ: crate::civ::Civ,
    pub age: Age,
    pub resources: Resources,
    pub techs: Vec<crate::tech::TechId>,
    pub alive: bool,
    /// Owned and observed provinces.
    pub provinces: BTreeMap<ProvinceId, ProvinceView>,
    /// Everything else, as bare ids.
    pub fog: Vec<ProvinceId>,
    pub diplomacy: DiplomacyView,
}

/// A player's public line in the full-state view.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerOverview {
    pub civ: crate::civ::Civ,
    pub age: Age,
    pub resources: Resources,
    pub techs: Vec<crate::tech::TechId>,
    pub alive: bool,
    pub score: i64,
}

/// The unredacted view used by spectators and replays.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FullState {
    pub turn: u32,
    pub winner: Option<PlayerId>,
    pub players: BTreeMap<PlayerId, PlayerOverview>,
    pub provinces: BTreeMap<ProvinceId, ProvinceDetail>,
    pub trade_routes: Vec<TradeRoute>,
    pub treaties: Vec<Treaty>,
    pub trust_penalties: BTreeMap<PlayerId, u32>,
}

fn province_detail(game: &Game, province_id: &str) -> ProvinceDetail {
    let province = &game.provinces[province_id];
    ProvinceDetail {
        name: province.name.clone(),
        terrain: province.terrain,
        owner: province.owner.clone(),
        units: province
            .unit_ids
            .iter()
            .filter_map(|uid| game.units.get(uid))
            .map(|u| UnitView {
                id: u.id.clone(),
                unit_type: u.unit_type,
                owner: u.owner.clone(),
                veteran: u.veteran,
            })
            .collect(),
        buildings: province
            .buildings
            .iter()
            .map(|b| BuildingView {
                building_type: b.building_type,
                done: b.done,
            })
            .collect(),
        production: province.production(),
        adjacent: province.adjacent.clone(),
    }
}

fn province_glimpse(game: &Game, province_id: &str) -> ProvinceGlimpse {
    let province = &game.provinces[province_id];
    ProvinceGlimpse {
        name: province.name.clone(),
        terrain: province.terrain,
        owner: province.owner.clone(),
        unit_count: province.unit_ids.len(),
        adjacent: province.adjacent.clone(),
    }
}

/// Build the fog-of-war projection for one player.
///
/// Visible provinces are: everything owned, everything adjacent to an owned
/// province, and everything within two hops of an owned province holding a
/// completed Watchtower.
pub fn player_view(game: &Game, player_id: &str) -> PlayerView {
    let owned: BTreeSet<ProvinceId> = game
        .provinces
        .values()
        .filter(|p| p.owner.as_deref() == Some(player_id))
        .map(|p| p.id.clone())
        .collect();

    let mut visible: BTreeSet<ProvinceId> = owned.clone();
    for id in &owned {
        let province = &game.provinces[id];
        for adj in &province.adjacent {
            visible.insert(adj.clone());
        }
        if province.has_completed(BuildingType::Watchtower) {
            for adj in &province.adjacent {
                for second in &game.provinces[adj].adjacent {
                    visible.insert(second.clone());
                }
            }
        }
    }

    let mut provinces = BTreeMap::new();
    let mut fog = Vec::new();
    for id in game.provinces.keys() {
        if owned.contains(id) {
            provinces.insert(id.clone(), ProvinceView::Owned(province_detail(game, id)));
        } else if visible.contains(id) {
            provinces.insert(
                id.clone(),
                ProvinceView::Observed(province_glimpse(game, id)),
            );
        } else {
            fog.push(id.clone());
        }
    }

    let player = &game.players[player_id];
    PlayerView {
        turn: game.turn,
        player: player_id.to_string(),
        winner: game.winner.clone(),
        civ: player.civ,
        age: player.age,
        resources: player.resources,
        techs: player.techs.clone(),
        alive: player.alive,
        provinces,
        fog,
        diplomacy: DiplomacyView {
            messages: game
                .diplomacy
                .messages_visible_to(player_id, game.turn)
                .into_iter()
                .cloned()
                .collect(),
            proposals: game
                .diplomacy
                .pending_proposals_for(player_id)
                .into_iter()
                .cloned()
                .collect(),
            treaties: game
                .diplomacy
                .active_treaties_for(player_id)
                .into_iter()
                .cloned()
                .collect(),
            trust_penalties: game.diplomacy.trust_penalties.clone(),
        },
    }
}

/// Build the unredacted full-state view.
pub fn full_state(game: &Game) -> FullState {
    FullState {
        turn: game.turn,
        winner: game.winner.clone(),
        players: game
            .players
            .iter()
            .map(|(pid, p)| {
                (
                    pid.clone(),
                    PlayerOverview {
                        civ: p.civ,
                        age: p.age,
                        resources: p.resources,
                        techs: p.techs.clone(),
                        alive: p.alive,
                        score: p.score,
                    },
                )
            })
            .collect(),
        provinces: game
            .provinces
            .keys()
            .map(|id| (id.clone(), province_detail(game, id)))
            .collect(),
        trade_routes: game.trade_routes.clone(),
        treaties: game.diplomacy.treaties.clone(),
        trust_penalties: game.diplomacy.trust_penalties.clone(),
    }
}
