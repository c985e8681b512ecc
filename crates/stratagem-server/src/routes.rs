//! HTTP endpoints: game lifecycle, orders, diplomacy, spectating, replays,
//! and rankings.

use crate::error::ApiError;
use crate::instance::{GameInstance, SubmitOutcome};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use stratagem_core::{
    full_state, player_view, Civ, FullState, GameConfig, Message, OrderSet, PlayerId, PlayerView,
    TurnResult, DEFAULT_MAX_TURNS,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/games", post(create_game).get(list_games))
        .route("/games/{id}/state", get(player_state))
        .route("/games/{id}/spectator", get(spectator_state))
        .route("/games/{id}/orders", post(submit_orders))
        .route("/games/{id}/diplomacy", post(submit_diplomacy))
        .route("/games/{id}/process", post(force_process))
        .route("/games/{id}/replay", get(get_replay))
        .route("/rankings", get(leaderboard))
        .route("/rankings/{agent_id}", get(agent_profile))
        .route("/matches", get(list_matches))
        .route("/matches/{id}", get(match_by_id))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ── Auth helpers ─────────────────────────────────────────────────────────

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(String::from)
}

fn lock_instance(
    state: &AppState,
    id: &str,
) -> Result<std::sync::Arc<std::sync::Mutex<GameInstance>>, ApiError> {
    state.game(id).ok_or(ApiError::GameNotFound)
}

fn authed_player(gi: &GameInstance, headers: &HeaderMap) -> Result<PlayerId, ApiError> {
    let token = bearer(headers).ok_or(ApiError::Forbidden)?;
    gi.player_for_token(&token).ok_or(ApiError::Forbidden)
}

/// Parse a JSON request body; an empty body means "all defaults". Malformed
/// JSON and unknown enum values answer 400.
fn parse_body<T: serde::de::DeserializeOwned + Default>(body: &str) -> Result<T, ApiError> {
    if body.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(body).map_err(|e| ApiError::BadRequest(e.to_string()))
}

// ── Request/response bodies ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(default)]
struct CreateGameRequest {
    num_players: usize,
    seed: Option<u64>,
    max_turns: u32,
    civs: Option<Vec<Civ>>,
    /// Agent identities per player slot, used for ratings.
    agents: Option<Vec<String>>,
}

impl Default for CreateGameRequest {
    fn default() -> Self {
        Self {
            num_players: 4,
            seed: None,
            max_turns: DEFAULT_MAX_TURNS,
            civs: None,
            agents: None,
        }
    }
}

#[derive(Serialize)]
struct CreateGameResponse {
    game_id: String,
    player_keys: BTreeMap<PlayerId, String>,
    spectator_key: String,
    players: Vec<PlayerId>,
}

#[derive(Serialize)]
struct StateResponse {
    game_id: String,
    #[serde(flatten)]
    view: PlayerView,
}

#[derive(Serialize)]
struct SpectatorResponse {
    game_id: String,
    mode: String,
    #[serde(flatten)]
    state: FullState,
    diplomacy: Vec<Message>,
}

#[derive(Serialize)]
struct WaitingResponse {
    status: &'static str,
    submitted: Vec<PlayerId>,
    need: Vec<PlayerId>,
}

#[derive(Serialize)]
struct TurnProcessedResponse {
    status: &'static str,
    #[serde(flatten)]
    result: TurnResult,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DiplomacyRequest {
    messages: Vec<DiplomacyMessageBody>,
}

#[derive(Debug, Deserialize)]
struct DiplomacyMessageBody {
    to: String,
    content: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SpectatorQuery {
    mode: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LimitQuery {
    limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PageQuery {
    limit: Option<usize>,
    offset: Option<usize>,
}

// ── Game lifecycle ────────────────────────────────────────────────────────

async fn create_game(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<CreateGameResponse>, ApiError> {
    let req: CreateGameRequest = parse_body(&body)?;
    if req.num_players == 0 || req.num_players > 4 {
        return Err(ApiError::BadRequest(
            "num_players must be between 1 and 4".to_string(),
        ));
    }

    let config = GameConfig {
        num_players: req.num_players,
        seed: req.seed,
        max_turns: req.max_turns,
        civs: req.civs,
    };
    let game_id = uuid::Uuid::new_v4().simple().to_string()[..8].to_string();
    let instance = GameInstance::new(game_id.clone(), &config, req.agents.as_deref());

    // Persist the initial snapshot so the replay exists from turn 0.
    if let Err(err) = state.replays.write(&instance.replay_document()) {
        tracing::warn!(game = %game_id, %err, "failed to write initial replay");
    }

    let response = CreateGameResponse {
        game_id: game_id.clone(),
        player_keys: instance.player_keys.clone(),
        spectator_key: instance.spectator_key.clone(),
        players: instance.game.players.keys().cloned().collect(),
    };
    tracing::info!(game = %game_id, players = req.num_players, "game created");
    state.insert_game(instance);
    Ok(Json(response))
}

async fn list_games(State(state): State<AppState>) -> Json<Vec<crate::instance::GameSummary>> {
    Json(state.summaries())
}

// ── Views ─────────────────────────────────────────────────────────────────

async fn player_state(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<StateResponse>, ApiError> {
    let instance = lock_instance(&state, &id)?;
    let gi = instance.lock().unwrap_or_else(|e| e.into_inner());
    let player = authed_player(&gi, &headers)?;
    Ok(Json(StateResponse {
        game_id: id,
        view: player_view(&gi.game, &player),
    }))
}

async fn spectator_state(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<SpectatorQuery>,
) -> Result<Json<SpectatorResponse>, ApiError> {
    let instance = lock_instance(&state, &id)?;
    let gi = instance.lock().unwrap_or_else(|e| e.into_inner());
    let mode = query.mode.unwrap_or_else(|| "live".to_string());
    let diplomacy = match mode.as_str() {
        // Replay mode reveals the full ledger; live mode only public talk.
        "replay" => gi.game.diplomacy.messages.clone(),
        _ => gi
            .game
            .diplomacy
            .messages
            .iter()
            .filter(|m| m.is_public)
            .cloned()
            .collect(),
    };
    Ok(Json(SpectatorResponse {
        game_id: id,
        mode,
        state: full_state(&gi.game),
        diplomacy,
    }))
}

// ── Orders and resolution ─────────────────────────────────────────────────

async fn submit_orders(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: String,
) -> Result<Response, ApiError> {
    let orders: OrderSet = parse_body(&body)?;
    let instance = lock_instance(&state, &id)?;
    let mut gi = instance.lock().unwrap_or_else(|e| e.into_inner());
    let player = authed_player(&gi, &headers)?;

    match gi.submit_orders(&player, orders)? {
        SubmitOutcome::Waiting { submitted, need } => {
            tracing::debug!(game = %id, %player, waiting = need.len(), "orders stored");
            Ok(Json(WaitingResponse {
                status: "waiting",
                submitted,
                need,
            })
            .into_response())
        }
        SubmitOutcome::Resolved(result) => {
            finalize_turn(&state, &gi, &result);
            Ok(Json(TurnProcessedResponse {
                status: "turn_processed",
                result,
            })
            .into_response())
        }
    }
}

async fn force_process(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TurnProcessedResponse>, ApiError> {
    let instance = lock_instance(&state, &id)?;
    let mut gi = instance.lock().unwrap_or_else(|e| e.into_inner());
    let result = gi.force_resolve()?;
    finalize_turn(&state, &gi, &result);
    Ok(Json(TurnProcessedResponse {
        status: "turn_processed",
        result,
    }))
}

/// Post-resolution bookkeeping: persist the replay, and on a terminal turn
/// update the ratings and record the match.
fn finalize_turn(state: &AppState, gi: &GameInstance, result: &TurnResult) {
    tracing::info!(
        game = %gi.id,
        turn = result.turn,
        combats = result.combats.len(),
        "turn resolved"
    );
    let replay_path = match state.replays.write(&gi.replay_document()) {
        Ok(path) => Some(path.display().to_string()),
        Err(err) => {
            tracing::warn!(game = %gi.id, %err, "failed to write replay");
            None
        }
    };

    if let Some(winner) = &result.winner {
        let placements = gi.placements();
        let winner_agent = gi.agent_ids.get(winner).cloned().unwrap_or(winner.clone());
        match state
            .ratings
            .record_match(&placements, Some(&winner_agent), gi.game.turn, replay_path)
        {
            Ok(record) => {
                tracing::info!(game = %gi.id, %winner, match_id = %record.match_id, "game finished");
            }
            Err(err) => {
                tracing::warn!(game = %gi.id, %err, "failed to record match");
            }
        }
    }
}

// ── Diplomacy shorthand ───────────────────────────────────────────────────

async fn submit_diplomacy(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<serde_json::Value>, ApiError> {
    let req: DiplomacyRequest = parse_body(&body)?;
    let instance = lock_instance(&state, &id)?;
    let mut gi = instance.lock().unwrap_or_else(|e| e.into_inner());
    let player = authed_player(&gi, &headers)?;
    if gi.game.is_over() {
        return Err(ApiError::BadRequest("game is over".to_string()));
    }

    let turn = gi.game.turn;
    let count = req.messages.len();
    for msg in req.messages {
        gi.game
            .diplomacy
            .post_message(&player, &msg.to, &msg.content, turn);
    }
    Ok(Json(serde_json::json!({
        "status": "ok",
        "messages_sent": count,
    })))
}

// ── Replays ───────────────────────────────────────────────────────────────

async fn get_replay(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<crate::replay::ReplayDocument>, ApiError> {
    if let Some(instance) = state.game(&id) {
        let gi = instance.lock().unwrap_or_else(|e| e.into_inner());
        return Ok(Json(gi.replay_document()));
    }
    state
        .replays
        .load(&id)
        .map(Json)
        .ok_or(ApiError::GameNotFound)
}

// ── Rankings and matches ──────────────────────────────────────────────────

async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<crate::rankings::AgentProfile>> {
    Json(state.ratings.leaderboard(query.limit.unwrap_or(50)))
}

async fn agent_profile(
    State(state): State<AppState>,
    Path(agent_id): Path<String>,
) -> Result<Json<crate::rankings::AgentProfile>, ApiError> {
    state
        .ratings
        .profile(&agent_id)
        .map(Json)
        .ok_or(ApiError::AgentNotFound)
}

async fn list_matches(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Json<Vec<crate::rankings::MatchRecord>> {
    Json(
        state
            .ratings
            .matches(query.limit.unwrap_or(50), query.offset.unwrap_or(0)),
    )
}

async fn match_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<crate::rankings::MatchRecord>, ApiError> {
    state
        .ratings
        .match_by_id(&id)
        .map(Json)
        .ok_or(ApiError::MatchNotFound)
}
