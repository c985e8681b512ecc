//! Stratagem coordination server library.
//!
//! Hosts games of the deterministic Stratagem engine over HTTP: clients
//! authenticate with per-game bearer tokens, fetch their fog-of-war
//! projection, and submit orders; turns resolve at the submission barrier.
//! Replays, rankings, and match history persist as JSON files.

pub mod error;
pub mod instance;
pub mod rankings;
pub mod replay;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use instance::{GameInstance, GameSummary, SubmitOutcome};
pub use rankings::{AgentProfile, MatchRecord, RatingStore, K_FACTOR, RATING_FLOOR, STARTING_RATING};
pub use replay::{ReplayDocument, ReplayWriter, TurnLogEntry};
pub use routes::router;
pub use state::{AppState, ServerConfig};
