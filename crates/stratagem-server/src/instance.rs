//! One hosted game: authoritative state, pending orders, and the barrier.
//!
//! Orders accumulate per player; the turn resolves automatically the moment
//! every live player has submitted, or on demand via forced resolution with
//! empty orders substituted for the missing players. All access goes through
//! the owning mutex in `AppState`, so methods here are plain `&mut self`.

use crate::replay::{ReplayDocument, TurnLogEntry};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use stratagem_core::{
    resolve_turn, Game, GameConfig, GameError, GameId, OrderSet, PlayerId, TurnResult,
};

/// What a submission produced: either the barrier is still open, or the
/// turn resolved.
#[derive(Debug, PartialEq)]
pub enum SubmitOutcome {
    Waiting {
        submitted: Vec<PlayerId>,
        need: Vec<PlayerId>,
    },
    Resolved(TurnResult),
}

/// Listing line for `GET /games`.
#[derive(Clone, Debug, Serialize)]
pub struct GameSummary {
    pub id: GameId,
    pub turn: u32,
    pub winner: Option<PlayerId>,
    pub players: usize,
}

/// A hosted game with its auth keys, barrier state, and turn log.
pub struct GameInstance {
    pub id: GameId,
    pub game: Game,
    pub player_keys: BTreeMap<PlayerId, String>,
    pub spectator_key: String,
    /// Agent identities per player, used for ratings.
    pub agent_ids: BTreeMap<PlayerId, String>,
    pub pending: BTreeMap<PlayerId, OrderSet>,
    pub turn_log: Vec<TurnLogEntry>,
    pub created_at: DateTime<Utc>,
}

impl GameInstance {
    /// Create a hosted game with fresh bearer tokens per player.
    pub fn new(id: GameId, config: &GameConfig, agents: Option<&[String]>) -> Self {
        let game = Game::new(config);
        let player_keys = game
            .players
            .keys()
            .map(|pid| (pid.clone(), fresh_token()))
            .collect();
        let agent_ids = game
            .players
            .keys()
            .enumerate()
            .map(|(i, pid)| {
                let agent = agents
                    .and_then(|a| a.get(i).cloned())
                    .unwrap_or_else(|| pid.clone());
                (pid.clone(), agent)
            })
            .collect();
        let turn_log = vec![TurnLogEntry::initial(&game)];
        Self {
            id,
            game,
            player_keys,
            spectator_key: fresh_token(),
            agent_ids,
            pending: BTreeMap::new(),
            turn_log,
            created_at: Utc::now(),
        }
    }

    /// Resolve a bearer token to a player id.
    pub fn player_for_token(&self, token: &str) -> Option<PlayerId> {
        self.player_keys
            .iter()
            .find(|(_, key)| key.as_str() == token)
            .map(|(pid, _)| pid.clone())
    }

    /// Whether a token grants spectator access (spectator or player key).
    pub fn is_known_key(&self, token: &str) -> bool {
        self.spectator_key == token || self.player_for_token(token).is_some()
    }

    /// Store a player's orders; resolve the turn when the barrier is full.
    ///
    /// A resubmission before resolution replaces the earlier one. Rejected
    /// outright when the game is over or the player is eliminated.
    pub fn submit_orders(
        &mut self,
        player: &str,
        orders: OrderSet,
    ) -> Result<SubmitOutcome, GameError> {
        if self.game.is_over() {
            return Err(GameError::GameOver);
        }
        let alive = self
            .game
            .players
            .get(player)
            .map(|p| p.alive)
            .ok_or(GameError::UnknownPlayer)?;
        if !alive {
            return Err(GameError::Eliminated);
        }

        self.pending.insert(player.to_string(), orders);

        let live = self.game.live_players();
        let need: Vec<PlayerId> = live
            .iter()
            .filter(|pid| !self.pending.contains_key(*pid))
            .cloned()
            .collect();
        if need.is_empty() {
            Ok(SubmitOutcome::Resolved(self.resolve_now()))
        } else {
            Ok(SubmitOutcome::Waiting {
                submitted: self.pending.keys().cloned().collect(),
                need,
            })
        }
    }

    /// Resolve immediately, substituting empty orders for missing players.
    pub fn force_resolve(&mut self) -> Result<TurnResult, GameError> {
        if self.game.is_over() {
            return Err(GameError::GameOver);
        }
        for pid in self.game.live_players() {
            self.pending.entry(pid).or_default();
        }
        Ok(self.resolve_now())
    }

    fn resolve_now(&mut self) -> TurnResult {
        let result = resolve_turn(&mut self.game, &self.pending);
        self.pending.clear();
        self.turn_log
            .push(TurnLogEntry::from_result(&result, &self.game));
        result
    }

    /// Placements for ratings, best first: winner, then the other alive
    /// players ascending by id, then the eliminated in elimination order.
    /// Ids are mapped to agent identities.
    pub fn placements(&self) -> Vec<String> {
        let mut order: Vec<PlayerId> = Vec::new();
        if let Some(winner) = &self.game.winner {
            order.push(winner.clone());
        }
        for pid in self.game.live_players() {
            if Some(&pid) != self.game.winner.as_ref() {
                order.push(pid);
            }
        }
        for pid in &self.game.eliminated {
            if Some(pid) != self.game.winner.as_ref() {
                order.push(pid.clone());
            }
        }
        order
            .into_iter()
            .map(|pid| self.agent_ids.get(&pid).cloned().unwrap_or(pid))
            .collect()
    }

    /// Build the replay document from the log and ledger.
    pub fn replay_document(&self) -> ReplayDocument {
        ReplayDocument {
            game_id: self.id.clone(),
            players: self.game.players.keys().cloned().collect(),
            civs: self
                .game
                .players
                .iter()
                .map(|(pid, p)| (pid.clone(), p.civ))
                .collect(),
            winner: self.game.winner.clone(),
            turns: self.turn_log.clone(),
            diplomacy: self.game.diplomacy.messages.clone(),
            treaties: self.game.diplomacy.treaties.clone(),
        }
    }

    /// Listing line for the game index.
    pub fn summary(&self) -> GameSummary {
        GameSummary {
            id: self.id.clone(),
            turn: self.game.turn,
            winner: self.game.winner.clone(),
            players: self.game.players.len(),
        }
    }
}

/// 32 hex chars of randomness.
fn fresh_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
