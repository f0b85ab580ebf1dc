use uuid::Uuid;

use super::value_objects::{RequestNo, SessionStatus, TaskKind};
use crate::domain::agent::AgentType;
use crate::domain::detection::{DetectionStatus, Severity};
use crate::domain::routing::RoutedRequest;

/// Domain events that occur within the Session aggregate
///
/// The aggregate never performs side effects outside itself. Events that
/// touch other agents (routing, detections, timers) are carried out by the
/// application layer after the session has been saved.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Fired when a session is created
    Created {
        session_id: Uuid,
        owner: AgentType,
        request_no: RequestNo,
    },
    /// Fired on every status change
    StatusChanged {
        session_id: Uuid,
        from: SessionStatus,
        to: SessionStatus,
    },
    /// Fired when a message is appended to the transcript
    MessagePosted { session_id: Uuid, message_id: Uuid },
    /// Fired when the request must be pushed into another agent's inbox
    RequestForwarded {
        session_id: Uuid,
        routed: RoutedRequest,
    },
    /// Fired when a monitoring session registers a new detection
    DetectionRegistered {
        session_id: Uuid,
        detection_id: Uuid,
        severity: Severity,
        title: String,
        source: String,
    },
    /// Fired when the session's detection moves forward
    DetectionProgressed {
        session_id: Uuid,
        detection_id: Uuid,
        status: DetectionStatus,
    },
    /// Fired when a processing simulation must be started
    TaskStarted {
        session_id: Uuid,
        task_id: Uuid,
        kind: TaskKind,
    },
    /// Fired when a processing simulation ran to completion
    TaskFinished {
        session_id: Uuid,
        task_id: Uuid,
        kind: TaskKind,
    },
    /// Fired when a processing simulation was cancelled
    TaskCancelled { session_id: Uuid, task_id: Uuid },
}

impl SessionEvent {
    /// Returns the session_id for this event
    pub fn session_id(&self) -> Uuid {
        match self {
            SessionEvent::Created { session_id, .. }
            | SessionEvent::StatusChanged { session_id, .. }
            | SessionEvent::MessagePosted { session_id, .. }
            | SessionEvent::RequestForwarded { session_id, .. }
            | SessionEvent::DetectionRegistered { session_id, .. }
            | SessionEvent::DetectionProgressed { session_id, .. }
            | SessionEvent::TaskStarted { session_id, .. }
            | SessionEvent::TaskFinished { session_id, .. }
            | SessionEvent::TaskCancelled { session_id, .. } => *session_id,
        }
    }
}
