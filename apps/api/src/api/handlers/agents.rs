use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::sessions::{agent_type, SessionResponse};
use crate::api::errors::ApiError;
use crate::api::middleware::JwtAuth;
use crate::api::state::AppState;
use crate::domain::agent::Agent;
use crate::domain::routing::RoutedRequest;

/// List the worker agent directory
///
/// GET /api/agents
pub async fn list_agents() -> Json<Vec<Agent>> {
    Json(Agent::directory())
}

/// List the sessions an agent owns, oldest first
///
/// GET /api/agents/:agent_id/sessions
pub async fn agent_sessions(
    State(state): State<AppState>,
    Path(agent_id): Path<String>,
) -> Result<Json<Vec<SessionResponse>>, ApiError> {
    let owner = agent_type(&agent_id)?;
    let sessions = state.console.sessions_for(owner).await?;

    Ok(Json(sessions.iter().map(SessionResponse::from).collect()))
}

/// List the requests waiting in an agent's inbox
///
/// GET /api/agents/:agent_id/inbox
pub async fn agent_inbox(
    State(state): State<AppState>,
    Path(agent_id): Path<String>,
) -> Result<Json<Vec<RoutedRequest>>, ApiError> {
    let owner = agent_type(&agent_id)?;

    Ok(Json(state.console.inbox(owner).await?))
}

/// Open a session from an inbox item
///
/// POST /api/agents/:agent_id/inbox/:routed_id/session
pub async fn open_inbox_session(
    State(state): State<AppState>,
    JwtAuth(_operator_id): JwtAuth,
    Path((agent_id, routed_id)): Path<(String, Uuid)>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let owner = agent_type(&agent_id)?;
    let session = state.console.open_routed_session(owner, routed_id).await?;

    Ok((StatusCode::CREATED, Json(SessionResponse::from(&session))))
}
