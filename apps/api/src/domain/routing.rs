use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::agent::AgentType;
use crate::domain::session::value_objects::{Request, RequestType};

/// Why a request is being forwarded to another agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTrigger {
    /// An approval-gated request was approved
    Approval(RequestType),
    /// A monitoring detection was escalated
    DetectionEscalation,
    /// A report finished and the originating ticket should be closed
    ReportCompletion,
}

/// Destination agent for a routing trigger
///
/// Account and simple requests are handled in place and have no destination.
///
/// # Example
/// ```
/// use aiworker_console::domain::agent::AgentType;
/// use aiworker_console::domain::routing::{destination, RouteTrigger};
/// use aiworker_console::domain::session::value_objects::RequestType;
///
/// assert_eq!(
///     destination(RouteTrigger::Approval(RequestType::Incident)),
///     Some(AgentType::Sop)
/// );
/// assert_eq!(destination(RouteTrigger::Approval(RequestType::Simple)), None);
/// ```
pub fn destination(trigger: RouteTrigger) -> Option<AgentType> {
    match trigger {
        RouteTrigger::Approval(RequestType::Incident) => Some(AgentType::Sop),
        RouteTrigger::Approval(RequestType::Improvement) => Some(AgentType::ChangeManagement),
        RouteTrigger::Approval(RequestType::Data) => Some(AgentType::Db),
        RouteTrigger::Approval(RequestType::Account | RequestType::Simple) => None,
        RouteTrigger::DetectionEscalation => Some(AgentType::Sop),
        RouteTrigger::ReportCompletion => Some(AgentType::Its),
    }
}

/// Destination for a trigger raised by `source`, excluding self-routing
pub fn route_from(source: AgentType, trigger: RouteTrigger) -> Option<AgentType> {
    destination(trigger).filter(|target| *target != source)
}

/// Projection of a request pushed into another agent's inbox
///
/// Has no lifecycle beyond creation; the destination dashboard consumes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutedRequest {
    pub id: Uuid,
    pub request: Request,
    /// Display name of the originating agent
    pub source_agent: String,
    /// Originating agent, absent for items entered by people
    pub source_agent_type: Option<AgentType>,
    pub destination: AgentType,
    pub routed_at: DateTime<Utc>,
}

impl RoutedRequest {
    /// Request forwarded by another agent
    pub fn forwarded(request: Request, source: AgentType, destination: AgentType) -> Self {
        Self {
            id: Uuid::new_v4(),
            request,
            source_agent: source.display_name().to_string(),
            source_agent_type: Some(source),
            destination,
            routed_at: Utc::now(),
        }
    }

    /// Request entered directly into an agent's inbox (e.g. by a service desk)
    pub fn submitted(
        request: Request,
        submitter: impl Into<String>,
        destination: AgentType,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            request,
            source_agent: submitter.into(),
            source_agent_type: None,
            destination,
            routed_at: Utc::now(),
        }
    }

    /// Whether another agent already approved the request
    pub fn is_pre_approved(&self) -> bool {
        self.source_agent_type.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::value_objects::RequestNo;
    use chrono::NaiveDate;

    #[test]
    fn approval_mapping_is_closed() {
        assert_eq!(
            destination(RouteTrigger::Approval(RequestType::Incident)),
            Some(AgentType::Sop)
        );
        assert_eq!(
            destination(RouteTrigger::Approval(RequestType::Improvement)),
            Some(AgentType::ChangeManagement)
        );
        assert_eq!(
            destination(RouteTrigger::Approval(RequestType::Data)),
            Some(AgentType::Db)
        );
        assert_eq!(destination(RouteTrigger::Approval(RequestType::Account)), None);
        assert_eq!(destination(RouteTrigger::Approval(RequestType::Simple)), None);
    }

    #[test]
    fn escalation_and_report_completion() {
        assert_eq!(destination(RouteTrigger::DetectionEscalation), Some(AgentType::Sop));
        assert_eq!(destination(RouteTrigger::ReportCompletion), Some(AgentType::Its));
    }

    #[test]
    fn never_routes_to_self() {
        assert_eq!(
            route_from(AgentType::Db, RouteTrigger::Approval(RequestType::Data)),
            None
        );
        assert_eq!(
            route_from(AgentType::Its, RouteTrigger::Approval(RequestType::Data)),
            Some(AgentType::Db)
        );
    }

    #[test]
    fn forwarded_request_carries_provenance() {
        let request = Request::new(
            RequestNo::new("ITS-2024-0200").unwrap(),
            RequestType::Incident,
            "DB timeout",
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        )
        .unwrap();

        let routed = RoutedRequest::forwarded(request, AgentType::Its, AgentType::Sop);

        assert_eq!(routed.source_agent, "ITS Agent");
        assert!(routed.is_pre_approved());
        assert_eq!(routed.destination, AgentType::Sop);
    }
}
