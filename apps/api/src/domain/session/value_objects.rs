use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an operator/agent session
///
/// # Status Transitions
/// ```text
/// PendingApproval ---------> InProgress | Rejected
/// PendingProcessStart -----> InProgress | Rejected
/// InProgress --------------> Completed | PendingReportConfirm
///                            | PendingMonitoringResult | PendingDetectionAction
///                            | PendingReportReview
/// PendingMonitoringResult -> PendingDetectionAction | Completed
/// PendingDetectionAction --> InProgress | PendingDirectComplete
/// PendingDirectComplete ---> Completed
/// PendingReportConfirm ----> PendingReportStart | Completed
/// PendingReportStart ------> PendingReportReview
/// PendingReportReview -----> InProgress | PendingKnowledgeSave
/// PendingKnowledgeSave ----> PendingItsComplete | Completed
/// PendingItsComplete ------> Completed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    PendingApproval,
    PendingProcessStart,
    InProgress,
    PendingMonitoringResult,
    PendingDetectionAction,
    PendingDirectComplete,
    PendingReportConfirm,
    PendingReportStart,
    PendingReportReview,
    PendingKnowledgeSave,
    PendingItsComplete,
    Completed,
    Rejected,
}

impl SessionStatus {
    /// Every status, in table order
    pub const ALL: [SessionStatus; 13] = [
        SessionStatus::PendingApproval,
        SessionStatus::PendingProcessStart,
        SessionStatus::InProgress,
        SessionStatus::PendingMonitoringResult,
        SessionStatus::PendingDetectionAction,
        SessionStatus::PendingDirectComplete,
        SessionStatus::PendingReportConfirm,
        SessionStatus::PendingReportStart,
        SessionStatus::PendingReportReview,
        SessionStatus::PendingKnowledgeSave,
        SessionStatus::PendingItsComplete,
        SessionStatus::Completed,
        SessionStatus::Rejected,
    ];

    /// Checks if a transition from current status to next status is valid
    ///
    /// # Example
    /// ```
    /// use aiworker_console::domain::session::SessionStatus;
    ///
    /// assert!(SessionStatus::PendingApproval.can_transition_to(SessionStatus::InProgress));
    /// assert!(!SessionStatus::Completed.can_transition_to(SessionStatus::InProgress));
    /// ```
    pub fn can_transition_to(&self, next: SessionStatus) -> bool {
        use SessionStatus::*;
        matches!(
            (self, next),
            (PendingApproval, InProgress)
                | (PendingApproval, Rejected)
                | (PendingProcessStart, InProgress)
                | (PendingProcessStart, Rejected)
                | (InProgress, Completed)
                | (InProgress, PendingReportConfirm)
                | (InProgress, PendingMonitoringResult)
                | (InProgress, PendingDetectionAction)
                | (InProgress, PendingReportReview)
                | (PendingMonitoringResult, PendingDetectionAction)
                | (PendingMonitoringResult, Completed)
                | (PendingDetectionAction, InProgress)
                | (PendingDetectionAction, PendingDirectComplete)
                | (PendingDirectComplete, Completed)
                | (PendingReportConfirm, PendingReportStart)
                | (PendingReportConfirm, Completed)
                | (PendingReportStart, PendingReportReview)
                | (PendingReportReview, InProgress)
                | (PendingReportReview, PendingKnowledgeSave)
                | (PendingKnowledgeSave, PendingItsComplete)
                | (PendingKnowledgeSave, Completed)
                | (PendingItsComplete, Completed)
        )
    }

    /// Returns true for statuses with no outgoing transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Rejected)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionStatus::PendingApproval => "pending-approval",
            SessionStatus::PendingProcessStart => "pending-process-start",
            SessionStatus::InProgress => "in-progress",
            SessionStatus::PendingMonitoringResult => "pending-monitoring-result",
            SessionStatus::PendingDetectionAction => "pending-detection-action",
            SessionStatus::PendingDirectComplete => "pending-direct-complete",
            SessionStatus::PendingReportConfirm => "pending-report-confirm",
            SessionStatus::PendingReportStart => "pending-report-start",
            SessionStatus::PendingReportReview => "pending-report-review",
            SessionStatus::PendingKnowledgeSave => "pending-knowledge-save",
            SessionStatus::PendingItsComplete => "pending-its-complete",
            SessionStatus::Completed => "completed",
            SessionStatus::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// Category of the business request behind a session
///
/// Serialized with the single-letter codes used by the ticketing system;
/// the long names are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestType {
    #[serde(rename = "I", alias = "incident")]
    Incident,
    #[serde(rename = "C", alias = "improvement")]
    Improvement,
    #[serde(rename = "D", alias = "data")]
    Data,
    #[serde(rename = "A", alias = "account")]
    Account,
    #[serde(rename = "S", alias = "simple")]
    Simple,
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestType::Incident => write!(f, "incident"),
            RequestType::Improvement => write!(f, "improvement"),
            RequestType::Data => write!(f, "data"),
            RequestType::Account => write!(f, "account"),
            RequestType::Simple => write!(f, "simple"),
        }
    }
}

/// Numbering series of a tracking code, taken from its prefix
///
/// This is provenance data about where a request number was issued.
/// It says nothing about which agent owns a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackingSeries {
    Its,
    Sop,
    Mon,
    Biz,
    Rpt,
    Det,
    Other,
}

impl TrackingSeries {
    /// Prefix used when generating numbers in this series
    pub fn prefix(&self) -> &'static str {
        match self {
            TrackingSeries::Its => "ITS",
            TrackingSeries::Sop => "SOP",
            TrackingSeries::Mon => "MON",
            TrackingSeries::Biz => "BIZ",
            TrackingSeries::Rpt => "RPT",
            TrackingSeries::Det => "DET",
            TrackingSeries::Other => "REQ",
        }
    }
}

/// Human-readable tracking code such as `ITS-2024-0200`
///
/// # Invariants
/// - Must not be empty or blank
/// - Is immutable after construction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RequestNo(String);

impl RequestNo {
    /// Creates a new RequestNo value object
    ///
    /// # Example
    /// ```
    /// use aiworker_console::domain::session::value_objects::{RequestNo, TrackingSeries};
    ///
    /// let no = RequestNo::new("ITS-2024-0200").expect("valid request number");
    /// assert_eq!(no.series(), TrackingSeries::Its);
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, String> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err("Request number cannot be empty".to_string());
        }
        Ok(RequestNo(trimmed.to_string()))
    }

    /// Renders a number in the given series, e.g. `MON-2026-0007`
    pub fn generate(series: TrackingSeries, year: i32, seq: u32) -> Self {
        RequestNo(format!("{}-{}-{:04}", series.prefix(), year, seq))
    }

    /// Classifies the number by its prefix
    pub fn series(&self) -> TrackingSeries {
        let prefix = self.0.split('-').next().unwrap_or_default();
        match prefix.to_ascii_uppercase().as_str() {
            "ITS" => TrackingSeries::Its,
            "SOP" => TrackingSeries::Sop,
            "MON" => TrackingSeries::Mon,
            "BIZ" => TrackingSeries::Biz,
            "RPT" => TrackingSeries::Rpt,
            "DET" => TrackingSeries::Det,
            _ => TrackingSeries::Other,
        }
    }

    /// Returns the number as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RequestNo {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RequestNo::new(value)
    }
}

impl From<RequestNo> for String {
    fn from(value: RequestNo) -> Self {
        value.0
    }
}

impl fmt::Display for RequestNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The business request (ticket, incident or detection) a session works on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub request_no: RequestNo,
    #[serde(rename = "type")]
    pub request_type: RequestType,
    pub title: String,
    pub date: NaiveDate,
}

impl Request {
    /// Creates a new Request
    ///
    /// # Returns
    /// * `Ok(Request)` - If the title is not blank
    /// * `Err(String)` - Otherwise
    pub fn new(
        request_no: RequestNo,
        request_type: RequestType,
        title: impl Into<String>,
        date: NaiveDate,
    ) -> Result<Self, String> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err("Request title cannot be empty".to_string());
        }

        Ok(Self {
            request_no,
            request_type,
            title,
            date,
        })
    }
}

/// What a processing simulation produces when it finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskKind {
    /// Operator-issued work on the request
    Work,
    /// Drafting (or redrafting) the incident report
    ReportDraft,
}
