use serde::{Deserialize, Serialize};

use crate::domain::session::value_objects::SessionStatus;

/// The kind of worker agent that owns a session
///
/// Ownership is an explicit field on every session. Dashboards filter by
/// equality on this value, never by inspecting request numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentType {
    /// ITS ticketing agent
    Its,
    /// SOP / incident handling agent
    Sop,
    /// Monitoring agent
    Monitoring,
    /// Database operations agent
    Db,
    /// Change management agent
    ChangeManagement,
    /// Report writing agent
    Report,
    /// Business support agent
    BusinessSupport,
}

impl AgentType {
    /// Every agent type, in directory order
    pub const ALL: [AgentType; 7] = [
        AgentType::Its,
        AgentType::Sop,
        AgentType::Monitoring,
        AgentType::Db,
        AgentType::ChangeManagement,
        AgentType::Report,
        AgentType::BusinessSupport,
    ];

    /// Returns the stable agent id used by navigation links
    ///
    /// # Example
    /// ```
    /// use aiworker_console::domain::agent::AgentType;
    ///
    /// assert_eq!(AgentType::Sop.id(), "a2");
    /// ```
    pub fn id(&self) -> &'static str {
        match self {
            AgentType::Its => "a1",
            AgentType::Sop => "a2",
            AgentType::Monitoring => "a3",
            AgentType::Db => "a4",
            AgentType::ChangeManagement => "a5",
            AgentType::Report => "a6",
            AgentType::BusinessSupport => "a7",
        }
    }

    /// Resolves an agent id back to its type
    pub fn from_id(id: &str) -> Option<AgentType> {
        Self::ALL.into_iter().find(|agent| agent.id() == id)
    }

    /// Returns the name shown to operators
    pub fn display_name(&self) -> &'static str {
        match self {
            AgentType::Its => "ITS Agent",
            AgentType::Sop => "SOP Agent",
            AgentType::Monitoring => "Monitoring Agent",
            AgentType::Db => "DB Agent",
            AgentType::ChangeManagement => "Change Management Agent",
            AgentType::Report => "Report Agent",
            AgentType::BusinessSupport => "Business Support Agent",
        }
    }

    /// Checks whether a session owned by this agent may hold `status`
    ///
    /// # Legal Statuses
    /// - ITS, DB, change management, business support: approval flow only
    /// - SOP: process start, report and knowledge follow-ups
    /// - Monitoring: monitoring results and detection handling
    /// - Report: report drafting and knowledge follow-ups
    pub fn permits(&self, status: SessionStatus) -> bool {
        use SessionStatus::*;
        match self {
            AgentType::Its
            | AgentType::Db
            | AgentType::ChangeManagement
            | AgentType::BusinessSupport => matches!(
                status,
                PendingApproval | PendingProcessStart | InProgress | Completed | Rejected
            ),
            AgentType::Sop => matches!(
                status,
                PendingProcessStart
                    | InProgress
                    | PendingReportConfirm
                    | PendingReportStart
                    | PendingReportReview
                    | PendingKnowledgeSave
                    | PendingItsComplete
                    | Completed
                    | Rejected
            ),
            AgentType::Monitoring => matches!(
                status,
                InProgress
                    | PendingMonitoringResult
                    | PendingDetectionAction
                    | PendingDirectComplete
                    | Completed
            ),
            AgentType::Report => matches!(
                status,
                PendingReportStart
                    | PendingReportReview
                    | InProgress
                    | PendingKnowledgeSave
                    | PendingItsComplete
                    | Completed
            ),
        }
    }

    /// Initial status for a session opened from this agent's inbox
    ///
    /// Items forwarded by another agent are already approved and skip the
    /// approval gate. Monitoring sessions only come from monitoring runs.
    pub fn intake_status(&self, pre_approved: bool) -> Option<SessionStatus> {
        match self {
            AgentType::Monitoring => None,
            AgentType::Sop => Some(SessionStatus::PendingProcessStart),
            AgentType::Report => Some(SessionStatus::PendingReportStart),
            _ if pre_approved => Some(SessionStatus::PendingProcessStart),
            _ => Some(SessionStatus::PendingApproval),
        }
    }
}

impl std::fmt::Display for AgentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for agent in AgentType::ALL {
            assert_eq!(AgentType::from_id(agent.id()), Some(agent));
        }
        assert_eq!(AgentType::from_id("a99"), None);
    }

    #[test]
    fn sop_agent_is_a2() {
        assert_eq!(AgentType::Sop.id(), "a2");
        assert_eq!(AgentType::Its.display_name(), "ITS Agent");
    }

    #[test]
    fn every_agent_permits_completed() {
        for agent in AgentType::ALL {
            assert!(agent.permits(SessionStatus::Completed), "{agent}");
        }
    }

    #[test]
    fn its_does_not_permit_report_statuses() {
        assert!(!AgentType::Its.permits(SessionStatus::PendingReportConfirm));
        assert!(!AgentType::Its.permits(SessionStatus::PendingMonitoringResult));
    }

    #[test]
    fn monitoring_has_no_approval_gate() {
        assert!(!AgentType::Monitoring.permits(SessionStatus::PendingApproval));
        assert!(!AgentType::Monitoring.permits(SessionStatus::Rejected));
        assert_eq!(AgentType::Monitoring.intake_status(true), None);
    }

    #[test]
    fn intake_status_depends_on_approval() {
        assert_eq!(
            AgentType::Db.intake_status(false),
            Some(SessionStatus::PendingApproval)
        );
        assert_eq!(
            AgentType::Db.intake_status(true),
            Some(SessionStatus::PendingProcessStart)
        );
        assert_eq!(
            AgentType::Sop.intake_status(false),
            Some(SessionStatus::PendingProcessStart)
        );
        assert_eq!(
            AgentType::Report.intake_status(true),
            Some(SessionStatus::PendingReportStart)
        );
    }

    #[test]
    fn intake_status_is_always_permitted() {
        for agent in AgentType::ALL {
            for pre_approved in [false, true] {
                if let Some(status) = agent.intake_status(pre_approved) {
                    assert!(agent.permits(status), "{agent} {status}");
                }
            }
        }
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&AgentType::ChangeManagement).unwrap();
        assert_eq!(json, "\"change-management\"");
    }
}
