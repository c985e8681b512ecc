//! Shared server state and configuration.
//!
//! Each game lives behind its own mutex, so submissions against one game
//! serialize while different games proceed in parallel. The rating store
//! carries its own coarse lock. Nothing holds a lock across an await point:
//! handlers do their work synchronously under the guard.

use crate::rankings::RatingStore;
use crate::replay::ReplayWriter;
use crate::instance::GameInstance;
use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex, RwLock};

/// Server configuration, read from the environment.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Bind address, `STRATAGEM_ADDR` (default `127.0.0.1:8000`).
    pub addr: String,
    /// Replay directory, `STRATAGEM_REPLAY_DIR` (default `replays`).
    pub replay_dir: String,
    /// Rankings/matches directory, `STRATAGEM_DATA_DIR` (default `data`).
    pub data_dir: String,
}

impl ServerConfig {
    /// Read configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        Self {
            addr: std::env::var("STRATAGEM_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".to_string()),
            replay_dir: std::env::var("STRATAGEM_REPLAY_DIR")
                .unwrap_or_else(|_| "replays".to_string()),
            data_dir: std::env::var("STRATAGEM_DATA_DIR").unwrap_or_else(|_| "data".to_string()),
        }
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Hosted games, each behind its own lock.
    pub games: Arc<RwLock<HashMap<String, Arc<Mutex<GameInstance>>>>>,
    pub replays: Arc<ReplayWriter>,
    pub ratings: Arc<RatingStore>,
}

impl AppState {
    /// Build the state, creating the on-disk directories.
    pub fn new(config: &ServerConfig) -> io::Result<Self> {
        Ok(Self {
            games: Arc::new(RwLock::new(HashMap::new())),
            replays: Arc::new(ReplayWriter::new(&config.replay_dir)?),
            ratings: Arc::new(RatingStore::new(&config.data_dir)?),
        })
    }

    /// Look up a hosted game by id.
    pub fn game(&self, id: &str) -> Option<Arc<Mutex<GameInstance>>> {
        self.games
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned()
    }

    /// Register a new hosted game.
    pub fn insert_game(&self, instance: GameInstance) {
        self.games
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(instance.id.clone(), Arc::new(Mutex::new(instance)));
    }

    /// Summaries of every hosted game, sorted by id for stable listings.
    pub fn summaries(&self) -> Vec<crate::instance::GameSummary> {
        let games = self.games.read().unwrap_or_else(|e| e.into_inner());
        let mut all: Vec<_> = games
            .values()
            .map(|g| g.lock().unwrap_or_else(|e| e.into_inner()).summary())
            .collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }
}
