use thiserror::Error;
use uuid::Uuid;

use crate::domain::session::{InvalidTransition, TransitionError};

/// Errors that can occur in the console workflow
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Inbox item not found: {0}")]
    InboxItemNotFound(Uuid),

    #[error("Detection not found: {0}")]
    DetectionNotFound(Uuid),

    #[error("Agent not found: {0}")]
    AgentNotFound(String),

    #[error(transparent)]
    InvalidStateTransition(#[from] InvalidTransition),

    #[error("A processing task is already running on session {0}")]
    TaskAlreadyRunning(Uuid),

    #[error("No processing task is running on session {0}")]
    NoActiveTask(Uuid),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AgentError {
    /// Attaches the session id to a workflow refusal
    pub fn from_transition(session_id: Uuid, err: TransitionError) -> Self {
        match err {
            TransitionError::Invalid(invalid) => AgentError::InvalidStateTransition(invalid),
            TransitionError::TaskRunning => AgentError::TaskAlreadyRunning(session_id),
            TransitionError::NoActiveTask => AgentError::NoActiveTask(session_id),
        }
    }
}

pub type AgentResult<T> = Result<T, AgentError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::agent::AgentType;
    use crate::domain::session::SessionStatus;

    #[test]
    fn transition_errors_keep_session_id() {
        let id = Uuid::new_v4();

        let err = AgentError::from_transition(id, TransitionError::TaskRunning);

        assert!(matches!(err, AgentError::TaskAlreadyRunning(got) if got == id));
    }

    #[test]
    fn invalid_transition_message() {
        let err = AgentError::from_transition(
            Uuid::new_v4(),
            InvalidTransition {
                owner: AgentType::Its,
                from: SessionStatus::Completed,
                action: "approve".to_string(),
            }
            .into(),
        );

        assert_eq!(
            err.to_string(),
            "ITS Agent session in completed does not allow approve"
        );
    }

    #[test]
    fn unknown_agent_message() {
        let err = AgentError::AgentNotFound("a99".to_string());

        assert_eq!(err.to_string(), "Agent not found: a99");
    }
}
