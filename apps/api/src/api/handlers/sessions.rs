use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agents::AgentError;
use crate::api::errors::ApiError;
use crate::api::middleware::JwtAuth;
use crate::api::state::AppState;
use crate::domain::agent::AgentType;
use crate::domain::session::{
    Message, Request, RequestNo, RequestType, Session, SessionAction, SessionStatus, TaskKind,
};

/// Request body for opening an approval-gated session
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub agent_id: String,
    pub request: Request,
}

/// Request body for a new ITS ticket
#[derive(Debug, Deserialize)]
pub struct SubmitItsRequest {
    #[serde(rename = "type")]
    pub request_type: RequestType,
    pub title: String,
}

/// Request body for a monitoring run
#[derive(Debug, Deserialize)]
pub struct StartMonitoringRequest {
    pub target: String,
}

/// Request body for a chat message
#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    pub content: String,
}

/// Request body for a processing task
#[derive(Debug, Default, Deserialize)]
pub struct RunTaskRequest {
    #[serde(default)]
    pub label: String,
}

/// The task a session is currently running
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningTaskResponse {
    pub id: Uuid,
    pub kind: TaskKind,
    pub label: String,
    pub message_id: Uuid,
}

/// Session as shown in the console
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: Uuid,
    pub agent_id: &'static str,
    pub agent_type: AgentType,
    pub request: Request,
    pub status: SessionStatus,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub source_incident_session_id: Option<Uuid>,
    pub original_its_request_no: Option<RequestNo>,
    pub detection_id: Option<Uuid>,
    pub running_task: Option<RunningTaskResponse>,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id(),
            agent_id: session.owner().id(),
            agent_type: session.owner(),
            request: session.request().clone(),
            status: session.status(),
            messages: session.transcript().messages().to_vec(),
            created_at: session.created_at(),
            source_incident_session_id: session.source_incident_session(),
            original_its_request_no: session.original_its_request_no().cloned(),
            detection_id: session.detection_id(),
            running_task: session.running_task().map(|task| RunningTaskResponse {
                id: task.id,
                kind: task.kind,
                label: task.label.clone(),
                message_id: task.message_id,
            }),
        }
    }
}

pub(crate) fn agent_type(agent_id: &str) -> Result<AgentType, ApiError> {
    AgentType::from_id(agent_id)
        .ok_or_else(|| AgentError::AgentNotFound(agent_id.to_string()).into())
}

/// Open a session on an unapproved request
///
/// POST /api/sessions
pub async fn create_session(
    State(state): State<AppState>,
    JwtAuth(_operator_id): JwtAuth,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let owner = agent_type(&req.agent_id)?;
    let session = state.console.open_session(owner, req.request).await?;

    Ok((StatusCode::CREATED, Json(SessionResponse::from(&session))))
}

/// Submit a new ITS ticket
///
/// POST /api/its/requests
pub async fn submit_its_request(
    State(state): State<AppState>,
    JwtAuth(_operator_id): JwtAuth,
    Json(req): Json<SubmitItsRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let session = state
        .console
        .submit_its_request(req.request_type, &req.title)
        .await?;

    Ok((StatusCode::CREATED, Json(SessionResponse::from(&session))))
}

/// Start a monitoring run
///
/// POST /api/monitoring/runs
pub async fn start_monitoring_run(
    State(state): State<AppState>,
    JwtAuth(_operator_id): JwtAuth,
    Json(req): Json<StartMonitoringRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let session = state.console.start_monitoring_run(&req.target).await?;

    Ok((StatusCode::CREATED, Json(SessionResponse::from(&session))))
}

/// Get a session by ID
///
/// GET /api/sessions/:id
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state.console.session(id).await?;

    Ok(Json(SessionResponse::from(&session)))
}

/// Close a session, cancelling any running task
///
/// DELETE /api/sessions/:id
pub async fn close_session(
    State(state): State<AppState>,
    JwtAuth(_operator_id): JwtAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.console.close_session(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Apply an operator action
///
/// POST /api/sessions/:id/actions
pub async fn dispatch_action(
    State(state): State<AppState>,
    JwtAuth(_operator_id): JwtAuth,
    Path(id): Path<Uuid>,
    Json(action): Json<SessionAction>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state.console.dispatch(id, action).await?;

    Ok(Json(SessionResponse::from(&session)))
}

/// Post a chat message
///
/// POST /api/sessions/:id/messages
pub async fn post_message(
    State(state): State<AppState>,
    JwtAuth(_operator_id): JwtAuth,
    Path(id): Path<Uuid>,
    Json(req): Json<PostMessageRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state.console.post_message(id, &req.content).await?;

    Ok(Json(SessionResponse::from(&session)))
}

/// Start a processing task
///
/// POST /api/sessions/:id/tasks
pub async fn run_task(
    State(state): State<AppState>,
    JwtAuth(_operator_id): JwtAuth,
    Path(id): Path<Uuid>,
    Json(req): Json<RunTaskRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let session = state.console.run_task(id, &req.label).await?;

    Ok((StatusCode::ACCEPTED, Json(SessionResponse::from(&session))))
}

/// Cancel the running processing task
///
/// DELETE /api/sessions/:id/tasks
pub async fn cancel_task(
    State(state): State<AppState>,
    JwtAuth(_operator_id): JwtAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state.console.cancel_task(id).await?;

    Ok(Json(SessionResponse::from(&session)))
}

/// Open a Report session for an incident session
///
/// POST /api/sessions/:id/report
pub async fn start_report(
    State(state): State<AppState>,
    JwtAuth(_operator_id): JwtAuth,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let report = state.console.start_report(id).await?;

    Ok((StatusCode::CREATED, Json(SessionResponse::from(&report))))
}
