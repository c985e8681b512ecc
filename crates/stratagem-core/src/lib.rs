//! Stratagem Core Library
//!
//! This crate contains the deterministic turn-resolution engine for
//! Stratagem, a 4-player simultaneous-turn strategy game played on a fixed
//! 24-province map.
//!
//! # Design Principles
//!
//! - **No I/O dependencies**: This crate is purely game logic
//! - **Deterministic**: Identical (seed, civs, order-stream) inputs produce
//!   byte-identical turn logs
//! - **Serializable**: All state can be saved/loaded via serde
//! - **Silent-drop orders**: Infeasible suborders are dropped during
//!   resolution; the event log explains what did happen

// Core modules
pub mod building;
pub mod map;
pub mod terrain;
pub mod types;
pub mod unit;

// Player state
pub mod civ;
pub mod player;
pub mod tech;

// Game state and orders
pub mod game;
pub mod orders;

// Diplomacy
pub mod diplomacy;

// Turn resolution
pub mod combat;
pub mod resolver;
pub mod victory;

// Fog of war
pub mod visibility;

// Re-exports for convenience
pub use building::{Building, BuildingStats, BuildingType};
pub use civ::Civ;
pub use combat::{Battleground, CombatOutcome, CombatReport, CombatSide};
pub use diplomacy::{
    DiplomacyLedger, Message, Proposal, ProposalStatus, Treaty, TreatyKind, PUBLIC,
};
pub use game::{Game, GameConfig, GameError, TradeRoute, DEFAULT_MAX_TURNS};
pub use map::{shortest_path, tournament_map, Province, CORE_PROVINCES, HOME_PAIRS};
pub use orders::{
    BuildBuildingOrder, BuildUnitOrder, DiplomacyOrders, MessageOrder, MoveOrder, OrderSet,
    ProposalOrder, ResearchOrder, ResearchTarget, TradeRouteOrder, UnitRequest,
};
pub use player::Player;
pub use resolver::{resolve_turn, TurnResult};
pub use tech::{age_up_cost, TechId};
pub use terrain::Terrain;
pub use types::{Age, GameId, PlayerId, ProvinceId, Resources, TreatyId, UnitId};
pub use unit::{Unit, UnitStats, UnitType, VETERAN_CAP};
pub use victory::{
    check_eliminations, check_victory, player_score, DOMINATION_THRESHOLD, ECONOMIC_THRESHOLD,
};
pub use visibility::{
    full_state, player_view, DiplomacyView, FullState, PlayerOverview, PlayerView,
    ProvinceDetail, ProvinceGlimpse, ProvinceView,
};
