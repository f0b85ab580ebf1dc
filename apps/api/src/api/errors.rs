use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::agents::AgentError;

/// API error type with HTTP status code and message
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    /// Creates a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Creates a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a 401 Unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Creates a 409 Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Creates a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Creates a 500 Internal Server Error
    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl From<AgentError> for ApiError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::SessionNotFound(_)
            | AgentError::InboxItemNotFound(_)
            | AgentError::DetectionNotFound(_)
            | AgentError::AgentNotFound(_) => Self::not_found(err.to_string()),
            AgentError::InvalidStateTransition(_)
            | AgentError::TaskAlreadyRunning(_)
            | AgentError::NoActiveTask(_) => Self::conflict(err.to_string()),
            AgentError::Validation(_) => Self::bad_request(err.to_string()),
            AgentError::Repository(_) | AgentError::ConfigError(_) => {
                Self::internal_server_error(err.to_string())
            }
        }
    }
}

impl From<String> for ApiError {
    fn from(message: String) -> Self {
        Self::internal_server_error(message)
    }
}

impl From<&str> for ApiError {
    fn from(message: &str) -> Self {
        Self::internal_server_error(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn missing_session_is_404() {
        let err = ApiError::from(AgentError::SessionNotFound(Uuid::new_v4()));

        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn unknown_agent_is_404() {
        let err = ApiError::from(AgentError::AgentNotFound("a99".to_string()));

        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Agent not found: a99");
    }

    #[test]
    fn busy_session_is_409() {
        let err = ApiError::from(AgentError::TaskAlreadyRunning(Uuid::new_v4()));

        assert_eq!(err.status, StatusCode::CONFLICT);
        assert!(err.message.contains("already running"));
    }

    #[test]
    fn validation_is_400() {
        let err = ApiError::from(AgentError::Validation("Message cannot be empty".to_string()));

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
