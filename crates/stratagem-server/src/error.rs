//! API error type with the HTTP status mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use stratagem_core::GameError;

/// Errors surfaced over HTTP. Only transport-level failures short-circuit;
/// infeasible suborders inside an accepted submission are dropped silently
/// by the engine.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("game not found")]
    GameNotFound,
    #[error("match not found")]
    MatchNotFound,
    #[error("agent not found")]
    AgentNotFound,
    #[error("invalid API key")]
    Forbidden,
    #[error("{0}")]
    BadRequest(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::GameNotFound | ApiError::MatchNotFound | ApiError::AgentNotFound => {
                StatusCode::NOT_FOUND
            }
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}
