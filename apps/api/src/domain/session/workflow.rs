//! Status transition table for operator actions.
//!
//! [`transition`] is the single place that decides whether an action is legal
//! for a session. It is pure so the whole table can be checked without an
//! application service or an HTTP layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::value_objects::SessionStatus;
use crate::domain::agent::AgentType;
use crate::domain::detection::Severity;

/// A discrete operator action on a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum SessionAction {
    Approve,
    Reject,
    StartProcess,
    RegisterDetection {
        severity: Severity,
        #[serde(default)]
        title: Option<String>,
    },
    EscalateToSop,
    DirectProcess,
    Complete,
    AcceptReport,
    DeclineReport,
    GenerateReport,
    Rewrite,
    SaveKnowledge,
    SkipKnowledge,
    CloseIts,
}

impl SessionAction {
    /// Wire name of the action
    pub fn name(&self) -> &'static str {
        match self {
            SessionAction::Approve => "approve",
            SessionAction::Reject => "reject",
            SessionAction::StartProcess => "start-process",
            SessionAction::RegisterDetection { .. } => "register-detection",
            SessionAction::EscalateToSop => "escalate-to-sop",
            SessionAction::DirectProcess => "direct-process",
            SessionAction::Complete => "complete",
            SessionAction::AcceptReport => "accept-report",
            SessionAction::DeclineReport => "decline-report",
            SessionAction::GenerateReport => "generate-report",
            SessionAction::Rewrite => "rewrite",
            SessionAction::SaveKnowledge => "save-knowledge",
            SessionAction::SkipKnowledge => "skip-knowledge",
            SessionAction::CloseIts => "close-its",
        }
    }
}

impl std::fmt::Display for SessionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{owner} session in {from} does not allow {action}")]
pub struct InvalidTransition {
    pub owner: AgentType,
    pub from: SessionStatus,
    pub action: String,
}

/// Ways a session can refuse an operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error(transparent)]
    Invalid(#[from] InvalidTransition),

    #[error("a processing task is already running")]
    TaskRunning,

    #[error("no processing task is running")]
    NoActiveTask,
}

/// Computes the status an action leads to
///
/// # Arguments
/// * `owner` - Agent owning the session
/// * `from` - Current status
/// * `action` - Requested operator action
/// * `has_its_origin` - Whether the session traces back to an ITS ticket
///
/// # Returns
/// * `Ok(SessionStatus)` - The next status (unchanged for `generate-report`)
/// * `Err(InvalidTransition)` - If the action is not legal here
///
/// # Example
/// ```
/// use aiworker_console::domain::agent::AgentType;
/// use aiworker_console::domain::session::{transition, SessionAction, SessionStatus};
///
/// let next = transition(
///     AgentType::Its,
///     SessionStatus::PendingApproval,
///     &SessionAction::Approve,
///     false,
/// );
/// assert_eq!(next, Ok(SessionStatus::InProgress));
/// ```
pub fn transition(
    owner: AgentType,
    from: SessionStatus,
    action: &SessionAction,
    has_its_origin: bool,
) -> Result<SessionStatus, InvalidTransition> {
    use SessionAction as A;
    use SessionStatus::*;

    let invalid = || InvalidTransition {
        owner,
        from,
        action: action.name().to_string(),
    };

    let target = match (action, from) {
        (A::Approve, PendingApproval) => InProgress,
        (A::Reject, PendingApproval | PendingProcessStart) => Rejected,
        (A::StartProcess, PendingProcessStart) => InProgress,
        (A::RegisterDetection { .. }, PendingMonitoringResult | InProgress) => {
            PendingDetectionAction
        }
        (A::EscalateToSop, PendingDetectionAction) => InProgress,
        (A::DirectProcess, PendingDetectionAction) => PendingDirectComplete,
        (
            A::Complete,
            InProgress | PendingMonitoringResult | PendingDirectComplete | PendingItsComplete,
        ) => Completed,
        (A::Complete, PendingReportReview) => PendingKnowledgeSave,
        (A::AcceptReport, PendingReportConfirm) => PendingReportStart,
        (A::DeclineReport, PendingReportConfirm) => Completed,
        (A::GenerateReport, PendingReportStart) => PendingReportStart,
        (A::Rewrite, PendingReportReview) => InProgress,
        (A::SaveKnowledge, PendingKnowledgeSave) if has_its_origin => PendingItsComplete,
        (A::SaveKnowledge, PendingKnowledgeSave) => Completed,
        (A::SkipKnowledge, PendingKnowledgeSave) => Completed,
        (A::CloseIts, PendingItsComplete) => Completed,
        _ => return Err(invalid()),
    };

    if target != from && !from.can_transition_to(target) {
        return Err(invalid());
    }
    if !owner.permits(target) || !owner.permits(from) {
        return Err(invalid());
    }

    Ok(target)
}
