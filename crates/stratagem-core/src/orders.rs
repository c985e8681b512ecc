//! Player order sets, as submitted over the wire.
//!
//! Every field is optional and defaults to empty: orders are a wish list and
//! the resolver keeps only the feasible ones. Unknown enum values are a
//! deserialization error (rejected at the transport layer); feasibility is
//! checked later, during resolution, where infeasible suborders are dropped
//! silently.

use crate::building::BuildingType;
use crate::diplomacy::TreatyKind;
use crate::tech::TechId;
use crate::types::{PlayerId, ProvinceId, TreatyId, UnitId};
use crate::unit::UnitType;
use serde::{Deserialize, Serialize};

/// One player's orders for one turn.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderSet {
    /// Unit movements, applied in submission order.
    pub moves: Vec<MoveOrder>,
    /// Unit build requests.
    pub build_units: Vec<BuildUnitOrder>,
    /// Building build requests.
    pub build_buildings: Vec<BuildBuildingOrder>,
    /// At most one research action per turn.
    pub research: Option<ResearchOrder>,
    /// Trade-route creation requests.
    pub trade_routes: Vec<TradeRouteOrder>,
    /// Diplomatic actions.
    pub diplomacy: Option<DiplomacyOrders>,
}

/// Move a unit to an adjacent province.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MoveOrder {
    pub unit_id: UnitId,
    pub target: ProvinceId,
}

/// Build a unit in an owned province.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuildUnitOrder {
    #[serde(rename = "type")]
    pub unit: UnitRequest,
    pub province: ProvinceId,
}

/// A buildable unit type. `unique` resolves to the builder civ's unique
/// variant; unique variants cannot be requested by their own names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitRequest {
    Militia,
    Infantry,
    Archers,
    Cavalry,
    Siege,
    Knights,
    Scout,
    Unique,
}

impl UnitRequest {
    /// Resolve to a concrete unit type for the given civ's unique variant.
    pub fn resolve(&self, unique: UnitType) -> UnitType {
        match self {
            UnitRequest::Militia => UnitType::Militia,
            UnitRequest::Infantry => UnitType::Infantry,
            UnitRequest::Archers => UnitType::Archers,
            UnitRequest::Cavalry => UnitType::Cavalry,
            UnitRequest::Siege => UnitType::Siege,
            UnitRequest::Knights => UnitType::Knights,
            UnitRequest::Scout => UnitType::Scout,
            UnitRequest::Unique => unique,
        }
    }
}

/// Build a building in an owned province.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuildBuildingOrder {
    #[serde(rename = "type")]
    pub building: BuildingType,
    pub province: ProvinceId,
}

/// Research a tech or advance an age.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResearchOrder {
    pub tech: ResearchTarget,
}

/// What a research order targets: a tech id or `age_up`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchTarget {
    AgeUp,
    Agriculture,
    Mining,
    Masonry,
    Tactics,
    Commerce,
    Fortification,
    Blitz,
    SiegeCraft,
    Diplomacy,
}

impl ResearchTarget {
    /// The tech this target names, or `None` for `age_up`.
    pub const fn tech(&self) -> Option<TechId> {
        match self {
            ResearchTarget::AgeUp => None,
            ResearchTarget::Agriculture => Some(TechId::Agriculture),
            ResearchTarget::Mining => Some(TechId::Mining),
            ResearchTarget::Masonry => Some(TechId::Masonry),
            ResearchTarget::Tactics => Some(TechId::Tactics),
            ResearchTarget::Commerce => Some(TechId::Commerce),
            ResearchTarget::Fortification => Some(TechId::Fortification),
            ResearchTarget::Blitz => Some(TechId::Blitz),
            ResearchTarget::SiegeCraft => Some(TechId::SiegeCraft),
            ResearchTarget::Diplomacy => Some(TechId::Diplomacy),
        }
    }
}

/// Create a trade route between two provinces with completed trade posts.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TradeRouteOrder {
    pub from: ProvinceId,
    pub to: ProvinceId,
}

/// Diplomatic actions submitted with an order set.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiplomacyOrders {
    pub messages: Vec<MessageOrder>,
    pub proposals: Vec<ProposalOrder>,
    pub accept_treaties: Vec<TreatyId>,
    pub reject_treaties: Vec<TreatyId>,
    pub break_treaties: Vec<TreatyId>,
}

/// Send a message to another player or to everyone.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MessageOrder {
    /// Recipient player id, or `"public"`.
    pub to: String,
    pub content: String,
}

/// Propose a treaty to another player.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProposalOrder {
    pub target: PlayerId,
    #[serde(rename = "type")]
    pub kind: TreatyKind,
}
