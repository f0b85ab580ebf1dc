use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::events::SessionEvent;
use super::transcript::{advance_steps, Message, NavLink, Transcript};
use super::value_objects::{
    Request, RequestNo, RequestType, SessionStatus, TaskKind, TrackingSeries,
};
use super::workflow::{transition, InvalidTransition, SessionAction, TransitionError};
use crate::domain::agent::AgentType;
use crate::domain::detection::DetectionStatus;
use crate::domain::routing::{route_from, RouteTrigger, RoutedRequest};

/// The processing simulation currently attached to a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningTask {
    pub id: Uuid,
    pub kind: TaskKind,
    pub label: String,
    /// Transcript entry whose checklist this task advances
    pub message_id: Uuid,
}

/// Detection registered from this session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionRef {
    pub id: Uuid,
    pub title: String,
    pub status: DetectionStatus,
}

/// Session aggregate root
///
/// One operator/agent conversation bound to a single business request.
///
/// # Invariants
/// - `status` is always permitted for `owner`
/// - Status changes only along the transition table
/// - The transcript is append-only apart from checklist progress
/// - At most one processing task runs at a time, and no operator action is
///   accepted while it runs
///
/// # Example
/// ```
/// use aiworker_console::domain::agent::AgentType;
/// use aiworker_console::domain::session::{Session, SessionAction, SessionStatus};
/// use aiworker_console::domain::session::value_objects::{Request, RequestNo, RequestType};
/// use chrono::NaiveDate;
///
/// let request = Request::new(
///     RequestNo::new("ITS-2024-0200").unwrap(),
///     RequestType::Incident,
///     "DB timeout",
///     NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
/// )
/// .unwrap();
///
/// let (mut session, _) =
///     Session::new(AgentType::Its, request, SessionStatus::PendingApproval)
///         .expect("valid session");
/// session.apply(SessionAction::Approve).expect("approval is legal");
/// assert_eq!(session.status(), SessionStatus::InProgress);
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    owner: AgentType,
    request: Request,
    status: SessionStatus,
    transcript: Transcript,
    created_at: DateTime<Utc>,
    source_incident_session: Option<Uuid>,
    original_its_request_no: Option<RequestNo>,
    detection: Option<DetectionRef>,
    running_task: Option<RunningTask>,
}

impl Session {
    /// Creates a new Session aggregate
    ///
    /// # Arguments
    /// * `owner` - Agent whose dashboard lists the session
    /// * `request` - The request being worked
    /// * `initial_status` - Decided by the entry point that opens the session
    ///
    /// # Returns
    /// * `Ok((Session, Vec<SessionEvent>))` - New session and events generated
    /// * `Err(String)` - If the owner does not permit the initial status
    pub fn new(
        owner: AgentType,
        request: Request,
        initial_status: SessionStatus,
    ) -> Result<(Self, Vec<SessionEvent>), String> {
        if !owner.permits(initial_status) {
            return Err(format!(
                "{} sessions cannot start in {}",
                owner, initial_status
            ));
        }
        if initial_status.is_terminal() {
            return Err(format!("Sessions cannot start in {}", initial_status));
        }

        let session = Self {
            id: Uuid::new_v4(),
            owner,
            request,
            status: initial_status,
            transcript: Transcript::new(),
            created_at: Utc::now(),
            source_incident_session: None,
            original_its_request_no: None,
            detection: None,
            running_task: None,
        };

        let events = vec![SessionEvent::Created {
            session_id: session.id,
            owner,
            request_no: session.request.request_no.clone(),
        }];

        Ok((session, events))
    }

    /// Records the ITS ticket this session ultimately answers to
    pub fn with_its_origin(mut self, request_no: Option<RequestNo>) -> Self {
        self.original_its_request_no = request_no;
        self
    }

    /// Spawns a report session from an incident session
    ///
    /// # Business Rules
    /// - The source request must be an incident
    /// - The source must not be a report session itself
    /// - The source must be past approval and not rejected
    /// - The report keeps back references to the incident session and to
    ///   the ITS ticket it came from (if any)
    pub fn spawn_report(
        source: &Session,
        request_no: RequestNo,
    ) -> Result<(Self, Vec<SessionEvent>), String> {
        if source.request.request_type != RequestType::Incident {
            return Err(format!(
                "Reports can only be written for incidents, {} is {}",
                source.request.request_no, source.request.request_type
            ));
        }
        if source.owner == AgentType::Report {
            return Err(format!(
                "{} is already a report session",
                source.request.request_no
            ));
        }
        if matches!(
            source.status,
            SessionStatus::PendingApproval | SessionStatus::Rejected
        ) {
            return Err(format!(
                "Cannot report on {} while it is {}",
                source.request.request_no, source.status
            ));
        }

        let request = Request::new(
            request_no,
            RequestType::Incident,
            format!("Incident report: {}", source.request.title),
            Utc::now().date_naive(),
        )?;

        let its_origin = source.original_its_request_no.clone().or_else(|| {
            (source.owner == AgentType::Its).then(|| source.request.request_no.clone())
        });

        let (mut report, events) =
            Session::new(AgentType::Report, request, SessionStatus::PendingReportStart)?;
        report.source_incident_session = Some(source.id);
        report.original_its_request_no = its_origin;

        Ok((report, events))
    }

    /// Appends a message to the transcript
    pub fn post(&mut self, message: Message) -> SessionEvent {
        let message_id = self.transcript.append(message);
        SessionEvent::MessagePosted {
            session_id: self.id,
            message_id,
        }
    }

    /// Applies an operator action
    ///
    /// # Returns
    /// * `Ok(Vec<SessionEvent>)` - Events describing what happened
    /// * `Err(TransitionError)` - If the action is illegal right now; the
    ///   session is left untouched
    pub fn apply(&mut self, action: SessionAction) -> Result<Vec<SessionEvent>, TransitionError> {
        if self.running_task.is_some() {
            return Err(TransitionError::TaskRunning);
        }

        let from = self.status;
        let to = transition(
            self.owner,
            from,
            &action,
            self.original_its_request_no.is_some(),
        )?;
        if matches!(action, SessionAction::RegisterDetection { .. }) && self.detection.is_some() {
            return Err(InvalidTransition {
                owner: self.owner,
                from,
                action: action.name().to_string(),
            }
            .into());
        }

        let mut events = vec![self.post(Message::user(operator_line(&action)))];
        self.status = to;
        if to != from {
            events.push(SessionEvent::StatusChanged {
                session_id: self.id,
                from,
                to,
            });
        }

        match action {
            SessionAction::Approve => {
                let trigger = RouteTrigger::Approval(self.request.request_type);
                match route_from(self.owner, trigger) {
                    Some(target) => events.extend(self.forward(self.request.clone(), target)),
                    None => events.push(self.post(Message::agent(
                        "Approved. I will handle this request here.",
                    ))),
                }
            }
            SessionAction::Reject => {
                events.push(self.post(Message::agent("The request has been rejected.")));
            }
            SessionAction::StartProcess => {
                events.push(self.post(Message::agent(
                    "Processing started. Tell me what to run and I will work through it.",
                )));
            }
            SessionAction::RegisterDetection { severity, title } => {
                let title = title
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| self.request.title.clone());
                let detection_id = Uuid::new_v4();
                self.detection = Some(DetectionRef {
                    id: detection_id,
                    title: title.clone(),
                    status: DetectionStatus::Detected,
                });

                events.push(SessionEvent::DetectionRegistered {
                    session_id: self.id,
                    detection_id,
                    severity,
                    title: title.clone(),
                    source: self.request.request_no.to_string(),
                });
                events.push(self.post(Message::agent(format!(
                    "Registered a {} detection: {}. \
                     Escalate to the SOP agent or process it directly?",
                    severity, title
                ))));
            }
            SessionAction::EscalateToSop => {
                events.extend(self.progress_detection(DetectionStatus::InProgress));
                let escalated = Request {
                    request_type: RequestType::Incident,
                    title: self
                        .detection
                        .as_ref()
                        .map(|d| d.title.clone())
                        .unwrap_or_else(|| self.request.title.clone()),
                    ..self.request.clone()
                };
                if let Some(target) = route_from(self.owner, RouteTrigger::DetectionEscalation) {
                    events.extend(self.forward(escalated, target));
                }
            }
            SessionAction::DirectProcess => {
                events.extend(self.progress_detection(DetectionStatus::InProgress));
                events.push(self.post(Message::agent(
                    "Handling the detection directly. Complete the session once it is fixed.",
                )));
            }
            SessionAction::Complete => {
                if to == SessionStatus::Completed {
                    events.extend(self.progress_detection(DetectionStatus::Resolved));
                }
                let reply = if to == SessionStatus::PendingKnowledgeSave {
                    "Report approved. Save it to the knowledge base?"
                } else {
                    "All done. This session is complete."
                };
                events.push(self.post(Message::agent(reply)));
            }
            SessionAction::AcceptReport => {
                events.push(self.post(Message::agent(
                    "I will prepare the incident report. Generate it when you are ready.",
                )));
            }
            SessionAction::DeclineReport => {
                events.push(self.post(Message::agent("Understood. Closing without a report.")));
            }
            SessionAction::GenerateReport => {
                events.push(self.begin_task(TaskKind::ReportDraft, "Draft incident report"));
            }
            SessionAction::Rewrite => {
                events.push(self.begin_task(TaskKind::ReportDraft, "Rewrite incident report"));
            }
            SessionAction::SaveKnowledge => {
                let reply = match &self.original_its_request_no {
                    Some(its) => format!(
                        "Saved to the knowledge base. Close the originating ticket {}?",
                        its
                    ),
                    None => "Saved to the knowledge base.".to_string(),
                };
                events.push(self.post(Message::agent(reply)));
            }
            SessionAction::SkipKnowledge => {
                events.push(self.post(Message::agent("Skipped the knowledge base.")));
            }
            SessionAction::CloseIts => {
                if let Some(its) = self.original_its_request_no.clone() {
                    let closing = Request {
                        request_no: its,
                        ..self.request.clone()
                    };
                    if let Some(target) = route_from(self.owner, RouteTrigger::ReportCompletion) {
                        events.extend(self.forward(closing, target));
                    }
                }
            }
        }

        Ok(events)
    }

    /// Starts an operator-issued processing task
    ///
    /// # Business Rules
    /// - The session must be in progress
    /// - No other task may be running
    pub fn start_task(&mut self, label: &str) -> Result<Vec<SessionEvent>, TransitionError> {
        if self.running_task.is_some() {
            return Err(TransitionError::TaskRunning);
        }
        if self.status != SessionStatus::InProgress {
            return Err(InvalidTransition {
                owner: self.owner,
                from: self.status,
                action: "run-task".to_string(),
            }
            .into());
        }

        let label = if label.trim().is_empty() {
            self.request.title.clone()
        } else {
            label.to_string()
        };

        Ok(vec![
            self.post(Message::user(label.clone())),
            self.begin_task(TaskKind::Work, &label),
        ])
    }

    /// Advances the running task's checklist by one step
    ///
    /// # Returns
    /// * `Ok(true)` - Every step is completed
    /// * `Err(TransitionError::NoActiveTask)` - If `task_id` is not running
    pub fn advance_task(&mut self, task_id: Uuid) -> Result<bool, TransitionError> {
        let message_id = self
            .running_task
            .as_ref()
            .filter(|task| task.id == task_id)
            .map(|task| task.message_id)
            .ok_or(TransitionError::NoActiveTask)?;

        let steps = self
            .transcript
            .steps_mut(message_id)
            .ok_or(TransitionError::NoActiveTask)?;

        Ok(advance_steps(steps))
    }

    /// Finishes the running task
    ///
    /// Appends the completion message and performs the only automatic status
    /// change in the workflow:
    /// - report drafts move to report review
    /// - incident work on ITS/SOP tickets offers a report
    /// - monitoring work without a detection publishes its results
    pub fn finish_task(&mut self, task_id: Uuid) -> Result<Vec<SessionEvent>, TransitionError> {
        let task = match &self.running_task {
            Some(task) if task.id == task_id => self.running_task.take(),
            _ => None,
        }
        .ok_or(TransitionError::NoActiveTask)?;

        let mut events = vec![
            self.post(Message::agent(format!("Task complete: {}", task.label))),
            SessionEvent::TaskFinished {
                session_id: self.id,
                task_id: task.id,
                kind: task.kind,
            },
        ];

        let follow_up = match task.kind {
            TaskKind::ReportDraft => Some((
                SessionStatus::PendingReportReview,
                format!(
                    "## Incident report: {}\n\n\
                     - Request: {}\n\
                     - Summary: the issue was analysed and resolved\n\
                     - Follow-up: monitor for recurrence\n\n\
                     Complete to approve the draft, or rewrite it.",
                    self.request.title, self.request.request_no
                ),
            )),
            TaskKind::Work if self.offers_report() => Some((
                SessionStatus::PendingReportConfirm,
                "The incident is handled. Would you like me to write an incident report?"
                    .to_string(),
            )),
            TaskKind::Work if self.owner == AgentType::Monitoring && self.detection.is_none() => {
                Some((
                    SessionStatus::PendingMonitoringResult,
                    format!(
                        "Monitoring results for {} are ready. \
                         Register a detection or complete the run.",
                        self.request.title
                    ),
                ))
            }
            TaskKind::Work => None,
        };

        if let Some((to, content)) = follow_up {
            let from = self.status;
            if from.can_transition_to(to) && self.owner.permits(to) {
                self.status = to;
                events.push(SessionEvent::StatusChanged {
                    session_id: self.id,
                    from,
                    to,
                });
                events.push(self.post(Message::agent(content)));
            }
        }

        Ok(events)
    }

    /// Cancels the running task, leaving its checklist where it stopped
    pub fn cancel_task(&mut self) -> Result<Vec<SessionEvent>, TransitionError> {
        let task = self
            .running_task
            .take()
            .ok_or(TransitionError::NoActiveTask)?;

        Ok(vec![
            self.post(Message::agent(format!("Task cancelled: {}", task.label))),
            SessionEvent::TaskCancelled {
                session_id: self.id,
                task_id: task.id,
            },
        ])
    }

    fn begin_task(&mut self, kind: TaskKind, label: &str) -> SessionEvent {
        let message_id = self.transcript.append(Message::progress(label));
        let task_id = Uuid::new_v4();
        self.running_task = Some(RunningTask {
            id: task_id,
            kind,
            label: label.to_string(),
            message_id,
        });

        SessionEvent::TaskStarted {
            session_id: self.id,
            task_id,
            kind,
        }
    }

    fn forward(&mut self, request: Request, target: AgentType) -> Vec<SessionEvent> {
        let routed = RoutedRequest::forwarded(request, self.owner, target);
        let posted = self.post(
            Message::agent(format!(
                "Forwarded {} to the {}.",
                routed.request.request_no, target
            ))
            .with_link(NavLink::to_agent(target)),
        );

        vec![
            posted,
            SessionEvent::RequestForwarded {
                session_id: self.id,
                routed,
            },
        ]
    }

    /// Moves the session's detection forward, if it has one that can move
    fn progress_detection(&mut self, status: DetectionStatus) -> Option<SessionEvent> {
        let detection = self
            .detection
            .as_mut()
            .filter(|d| d.status.can_transition_to(status))?;
        detection.status = status;

        Some(SessionEvent::DetectionProgressed {
            session_id: self.id,
            detection_id: detection.id,
            status,
        })
    }

    fn offers_report(&self) -> bool {
        self.request.request_type == RequestType::Incident
            && matches!(
                self.request.request_no.series(),
                TrackingSeries::Its | TrackingSeries::Sop
            )
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn owner(&self) -> AgentType {
        self.owner
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn source_incident_session(&self) -> Option<Uuid> {
        self.source_incident_session
    }

    pub fn original_its_request_no(&self) -> Option<&RequestNo> {
        self.original_its_request_no.as_ref()
    }

    pub fn detection_id(&self) -> Option<Uuid> {
        self.detection.as_ref().map(|d| d.id)
    }

    pub fn detection_status(&self) -> Option<DetectionStatus> {
        self.detection.as_ref().map(|d| d.status)
    }

    pub fn running_task(&self) -> Option<&RunningTask> {
        self.running_task.as_ref()
    }
}

/// What the operator "said" when pressing an action button
fn operator_line(action: &SessionAction) -> String {
    match action {
        SessionAction::Approve => "Approve".to_string(),
        SessionAction::Reject => "Reject".to_string(),
        SessionAction::StartProcess => "Start processing".to_string(),
        SessionAction::RegisterDetection { severity, .. } => {
            format!("Register {} detection", severity)
        }
        SessionAction::EscalateToSop => "Escalate to SOP".to_string(),
        SessionAction::DirectProcess => "Process directly".to_string(),
        SessionAction::Complete => "Complete".to_string(),
        SessionAction::AcceptReport => "Write a report".to_string(),
        SessionAction::DeclineReport => "No report".to_string(),
        SessionAction::GenerateReport => "Generate report".to_string(),
        SessionAction::Rewrite => "Rewrite".to_string(),
        SessionAction::SaveKnowledge => "Save to knowledge base".to_string(),
        SessionAction::SkipKnowledge => "Skip knowledge base".to_string(),
        SessionAction::CloseIts => "Close ITS ticket".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::detection::Severity;
    use crate::domain::session::transcript::StepStatus;
    use chrono::NaiveDate;

    fn request(no: &str, request_type: RequestType, title: &str) -> Request {
        Request::new(
            RequestNo::new(no).unwrap(),
            request_type,
            title,
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        )
        .unwrap()
    }

    fn session(owner: AgentType, req: Request, status: SessionStatus) -> Session {
        Session::new(owner, req, status).unwrap().0
    }

    fn run_to_completion(session: &mut Session) -> Vec<SessionEvent> {
        let task_id = session.running_task().expect("task running").id;
        while !session.advance_task(task_id).unwrap() {}
        session.finish_task(task_id).unwrap()
    }

    fn forwarded(events: &[SessionEvent]) -> Vec<&RoutedRequest> {
        events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::RequestForwarded { routed, .. } => Some(routed),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn create_session_emits_created_event() {
        let (session, events) = Session::new(
            AgentType::Its,
            request("ITS-2024-0200", RequestType::Incident, "DB timeout"),
            SessionStatus::PendingApproval,
        )
        .unwrap();

        assert_eq!(session.status(), SessionStatus::PendingApproval);
        assert!(session.transcript().is_empty());
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], SessionEvent::Created { owner: AgentType::Its, .. }));
    }

    #[test]
    fn create_session_in_foreign_status_fails() {
        let result = Session::new(
            AgentType::Monitoring,
            request("MON-2024-0001", RequestType::Simple, "Nightly checks"),
            SessionStatus::PendingApproval,
        );

        assert!(result.is_err());
    }

    #[test]
    fn create_session_in_terminal_status_fails() {
        let result = Session::new(
            AgentType::Its,
            request("ITS-2024-0001", RequestType::Simple, "Printer"),
            SessionStatus::Completed,
        );

        assert!(result.unwrap_err().contains("cannot start"));
    }

    #[test]
    fn incident_approval_routes_to_sop_with_link() {
        let mut session = session(
            AgentType::Its,
            request("ITS-2024-0200", RequestType::Incident, "DB timeout"),
            SessionStatus::PendingApproval,
        );

        let events = session.apply(SessionAction::Approve).unwrap();

        assert_eq!(session.status(), SessionStatus::InProgress);
        let routed = forwarded(&events);
        assert_eq!(routed.len(), 1);
        assert_eq!(routed[0].destination, AgentType::Sop);
        assert_eq!(routed[0].source_agent, "ITS Agent");
        assert_eq!(routed[0].request.request_no.as_str(), "ITS-2024-0200");

        let link = session
            .transcript()
            .messages()
            .iter()
            .find_map(|m| m.link.as_ref())
            .expect("navigation link");
        assert_eq!(link.target_agent_id, "a2");
    }

    #[test]
    fn simple_approval_is_handled_in_place() {
        let mut session = session(
            AgentType::Its,
            request("ITS-2024-0201", RequestType::Simple, "Password reset"),
            SessionStatus::PendingApproval,
        );

        let events = session.apply(SessionAction::Approve).unwrap();

        assert!(forwarded(&events).is_empty());
        assert!(session.transcript().messages().iter().all(|m| m.link.is_none()));
    }

    #[test]
    fn illegal_action_leaves_session_untouched() {
        let mut session = session(
            AgentType::Its,
            request("ITS-2024-0202", RequestType::Data, "Export"),
            SessionStatus::PendingApproval,
        );

        let result = session.apply(SessionAction::Complete);

        assert!(matches!(result, Err(TransitionError::Invalid(_))));
        assert_eq!(session.status(), SessionStatus::PendingApproval);
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn rejected_is_terminal() {
        let mut session = session(
            AgentType::Db,
            request("ITS-2024-0203", RequestType::Data, "Drop table"),
            SessionStatus::PendingApproval,
        );

        session.apply(SessionAction::Reject).unwrap();

        assert_eq!(session.status(), SessionStatus::Rejected);
        assert!(session.apply(SessionAction::Approve).is_err());
    }

    #[test]
    fn work_task_on_its_incident_offers_report() {
        let mut session = session(
            AgentType::Sop,
            request("ITS-2024-0200", RequestType::Incident, "DB timeout"),
            SessionStatus::PendingProcessStart,
        );
        session.apply(SessionAction::StartProcess).unwrap();
        session.start_task("restart connection pool").unwrap();

        let events = run_to_completion(&mut session);

        assert_eq!(session.status(), SessionStatus::PendingReportConfirm);
        assert!(events.iter().any(|e| matches!(e, SessionEvent::TaskFinished { .. })));
        assert!(session.running_task().is_none());
    }

    #[test]
    fn work_task_on_non_incident_keeps_in_progress() {
        let mut session = session(
            AgentType::Db,
            request("ITS-2024-0204", RequestType::Data, "Export orders"),
            SessionStatus::PendingProcessStart,
        );
        session.apply(SessionAction::StartProcess).unwrap();
        session.start_task("export").unwrap();

        run_to_completion(&mut session);

        assert_eq!(session.status(), SessionStatus::InProgress);
        let last = session.transcript().last().unwrap();
        assert_eq!(last.content, "Task complete: export");
    }

    #[test]
    fn task_checklist_finishes_completed() {
        let mut session = session(
            AgentType::Db,
            request("ITS-2024-0205", RequestType::Data, "Export"),
            SessionStatus::PendingProcessStart,
        );
        session.apply(SessionAction::StartProcess).unwrap();
        session.start_task("export").unwrap();
        let message_id = session.running_task().unwrap().message_id;

        run_to_completion(&mut session);

        let progress = session
            .transcript()
            .messages()
            .iter()
            .find(|m| m.id == message_id)
            .unwrap();
        let steps = progress.processing_steps.as_ref().unwrap();
        assert!(steps.iter().all(|s| s.status == StepStatus::Completed));
    }

    #[test]
    fn actions_blocked_while_task_runs() {
        let mut session = session(
            AgentType::Db,
            request("ITS-2024-0206", RequestType::Data, "Export"),
            SessionStatus::PendingProcessStart,
        );
        session.apply(SessionAction::StartProcess).unwrap();
        session.start_task("export").unwrap();

        assert_eq!(
            session.apply(SessionAction::Complete).unwrap_err(),
            TransitionError::TaskRunning
        );
        assert_eq!(
            session.start_task("again").unwrap_err(),
            TransitionError::TaskRunning
        );
    }

    #[test]
    fn start_task_requires_in_progress() {
        let mut session = session(
            AgentType::Its,
            request("ITS-2024-0207", RequestType::Simple, "Printer"),
            SessionStatus::PendingApproval,
        );

        assert!(matches!(
            session.start_task("fix"),
            Err(TransitionError::Invalid(_))
        ));
    }

    #[test]
    fn stale_task_id_is_rejected() {
        let mut session = session(
            AgentType::Db,
            request("ITS-2024-0208", RequestType::Data, "Export"),
            SessionStatus::PendingProcessStart,
        );
        session.apply(SessionAction::StartProcess).unwrap();
        session.start_task("export").unwrap();

        assert_eq!(
            session.advance_task(Uuid::new_v4()).unwrap_err(),
            TransitionError::NoActiveTask
        );
        assert_eq!(
            session.finish_task(Uuid::new_v4()).unwrap_err(),
            TransitionError::NoActiveTask
        );
    }

    #[test]
    fn cancel_task_unblocks_actions() {
        let mut session = session(
            AgentType::Db,
            request("ITS-2024-0209", RequestType::Data, "Export"),
            SessionStatus::PendingProcessStart,
        );
        session.apply(SessionAction::StartProcess).unwrap();
        session.start_task("export").unwrap();
        let task_id = session.running_task().unwrap().id;
        session.advance_task(task_id).unwrap();

        let events = session.cancel_task().unwrap();

        assert!(matches!(events[1], SessionEvent::TaskCancelled { .. }));
        assert!(session.advance_task(task_id).is_err());
        session.apply(SessionAction::Complete).unwrap();
        assert_eq!(session.status(), SessionStatus::Completed);
    }

    #[test]
    fn monitoring_direct_completion_progresses_detection() {
        let mut session = session(
            AgentType::Monitoring,
            request("MON-2024-0001", RequestType::Simple, "web cluster"),
            SessionStatus::PendingMonitoringResult,
        );

        let events = session
            .apply(SessionAction::RegisterDetection {
                severity: Severity::Critical,
                title: Some("Disk full on web-02".to_string()),
            })
            .unwrap();
        assert_eq!(session.status(), SessionStatus::PendingDetectionAction);
        let detection_id = session.detection_id().unwrap();
        assert!(events.iter().any(|e| matches!(
            e,
            SessionEvent::DetectionRegistered { detection_id: id, .. } if *id == detection_id
        )));

        let events = session.apply(SessionAction::DirectProcess).unwrap();
        assert_eq!(session.status(), SessionStatus::PendingDirectComplete);
        assert!(events.contains(&SessionEvent::DetectionProgressed {
            session_id: session.id(),
            detection_id,
            status: DetectionStatus::InProgress,
        }));

        let events = session.apply(SessionAction::Complete).unwrap();
        assert_eq!(session.status(), SessionStatus::Completed);
        assert!(events.contains(&SessionEvent::DetectionProgressed {
            session_id: session.id(),
            detection_id,
            status: DetectionStatus::Resolved,
        }));
    }

    #[test]
    fn escalation_routes_detection_to_sop() {
        let mut session = session(
            AgentType::Monitoring,
            request("MON-2024-0002", RequestType::Simple, "db cluster"),
            SessionStatus::PendingMonitoringResult,
        );
        session
            .apply(SessionAction::RegisterDetection {
                severity: Severity::Warning,
                title: Some("Replication lag".to_string()),
            })
            .unwrap();

        let events = session.apply(SessionAction::EscalateToSop).unwrap();

        assert_eq!(session.status(), SessionStatus::InProgress);
        let routed = forwarded(&events);
        assert_eq!(routed.len(), 1);
        assert_eq!(routed[0].destination, AgentType::Sop);
        assert_eq!(routed[0].source_agent, "Monitoring Agent");
        assert_eq!(routed[0].request.title, "Replication lag");
        assert_eq!(routed[0].request.request_type, RequestType::Incident);

        let detection_id = session.detection_id().unwrap();
        let events = session.apply(SessionAction::Complete).unwrap();
        assert_eq!(session.status(), SessionStatus::Completed);
        assert!(events.contains(&SessionEvent::DetectionProgressed {
            session_id: session.id(),
            detection_id,
            status: DetectionStatus::Resolved,
        }));
        assert_eq!(session.detection_status(), Some(DetectionStatus::Resolved));
    }

    #[test]
    fn second_detection_is_refused() {
        let mut session = session(
            AgentType::Monitoring,
            request("MON-2024-0004", RequestType::Simple, "db cluster"),
            SessionStatus::PendingMonitoringResult,
        );
        session
            .apply(SessionAction::RegisterDetection {
                severity: Severity::Warning,
                title: Some("first".to_string()),
            })
            .unwrap();
        session.apply(SessionAction::EscalateToSop).unwrap();
        let first = session.detection_id().unwrap();
        let transcript_len = session.transcript().len();

        let result = session.apply(SessionAction::RegisterDetection {
            severity: Severity::Critical,
            title: Some("second".to_string()),
        });

        assert!(matches!(result, Err(TransitionError::Invalid(_))));
        assert_eq!(session.status(), SessionStatus::InProgress);
        assert_eq!(session.detection_id(), Some(first));
        assert_eq!(session.transcript().len(), transcript_len);
    }

    #[test]
    fn completing_without_detection_emits_no_progress() {
        let mut session = session(
            AgentType::Monitoring,
            request("MON-2024-0005", RequestType::Simple, "batch servers"),
            SessionStatus::PendingMonitoringResult,
        );

        let events = session.apply(SessionAction::Complete).unwrap();

        assert_eq!(session.status(), SessionStatus::Completed);
        assert!(!events
            .iter()
            .any(|e| matches!(e, SessionEvent::DetectionProgressed { .. })));
    }

    #[test]
    fn monitoring_work_publishes_results() {
        let mut session = session(
            AgentType::Monitoring,
            request("MON-2024-0003", RequestType::Simple, "batch servers"),
            SessionStatus::InProgress,
        );
        session.start_task("run checks").unwrap();

        run_to_completion(&mut session);

        assert_eq!(session.status(), SessionStatus::PendingMonitoringResult);
    }

    #[test]
    fn report_rewrite_loop() {
        let mut session = session(
            AgentType::Sop,
            request("ITS-2024-0200", RequestType::Incident, "DB timeout"),
            SessionStatus::PendingProcessStart,
        );
        session.apply(SessionAction::StartProcess).unwrap();
        session.start_task("fix").unwrap();
        run_to_completion(&mut session);
        session.apply(SessionAction::AcceptReport).unwrap();
        assert_eq!(session.status(), SessionStatus::PendingReportStart);

        session.apply(SessionAction::GenerateReport).unwrap();
        run_to_completion(&mut session);
        assert_eq!(session.status(), SessionStatus::PendingReportReview);

        session.apply(SessionAction::Rewrite).unwrap();
        assert_eq!(session.status(), SessionStatus::InProgress);
        run_to_completion(&mut session);
        assert_eq!(session.status(), SessionStatus::PendingReportReview);

        session.apply(SessionAction::Complete).unwrap();
        assert_eq!(session.status(), SessionStatus::PendingKnowledgeSave);
    }

    #[test]
    fn report_session_closes_loop_to_its() {
        let mut incident = session(
            AgentType::Its,
            request("ITS-2024-0200", RequestType::Incident, "DB timeout"),
            SessionStatus::PendingApproval,
        );
        incident.apply(SessionAction::Approve).unwrap();

        let (mut report, _) =
            Session::spawn_report(&incident, RequestNo::new("RPT-2024-0001").unwrap()).unwrap();
        assert_eq!(report.owner(), AgentType::Report);
        assert_eq!(report.source_incident_session(), Some(incident.id()));
        assert_eq!(
            report.original_its_request_no().map(|n| n.as_str()),
            Some("ITS-2024-0200")
        );

        report.apply(SessionAction::GenerateReport).unwrap();
        run_to_completion(&mut report);
        report.apply(SessionAction::Complete).unwrap();
        report.apply(SessionAction::SaveKnowledge).unwrap();
        assert_eq!(report.status(), SessionStatus::PendingItsComplete);

        let events = report.apply(SessionAction::CloseIts).unwrap();
        assert_eq!(report.status(), SessionStatus::Completed);
        let routed = forwarded(&events);
        assert_eq!(routed.len(), 1);
        assert_eq!(routed[0].destination, AgentType::Its);
        assert_eq!(routed[0].request.request_no.as_str(), "ITS-2024-0200");
    }

    #[test]
    fn reports_require_incidents() {
        let source = session(
            AgentType::Its,
            request("ITS-2024-0210", RequestType::Account, "New account"),
            SessionStatus::PendingApproval,
        );

        assert!(Session::spawn_report(&source, RequestNo::new("RPT-2024-0002").unwrap()).is_err());
    }

    #[test]
    fn reports_wait_for_approval() {
        let mut source = session(
            AgentType::Its,
            request("ITS-2024-0211", RequestType::Incident, "Mail outage"),
            SessionStatus::PendingApproval,
        );

        let err = Session::spawn_report(&source, RequestNo::new("RPT-2024-0003").unwrap())
            .unwrap_err();
        assert!(err.contains("pending-approval"));

        source.apply(SessionAction::Reject).unwrap();
        assert!(Session::spawn_report(&source, RequestNo::new("RPT-2024-0003").unwrap()).is_err());
    }

    #[test]
    fn reports_cannot_be_nested() {
        let mut incident = session(
            AgentType::Its,
            request("ITS-2024-0212", RequestType::Incident, "VPN down"),
            SessionStatus::PendingApproval,
        );
        incident.apply(SessionAction::Approve).unwrap();
        let (report, _) =
            Session::spawn_report(&incident, RequestNo::new("RPT-2024-0004").unwrap()).unwrap();
        assert_eq!(report.request().title, "Incident report: VPN down");

        let err =
            Session::spawn_report(&report, RequestNo::new("RPT-2024-0005").unwrap()).unwrap_err();
        assert!(err.contains("already a report"));
    }

    #[test]
    fn transcript_only_grows() {
        let mut session = session(
            AgentType::Sop,
            request("SOP-2024-0001", RequestType::Incident, "Queue backlog"),
            SessionStatus::PendingProcessStart,
        );
        let mut previous = session.transcript().messages().to_vec();

        session.apply(SessionAction::StartProcess).unwrap();
        session.start_task("drain queue").unwrap();
        let task_id = session.running_task().unwrap().id;
        loop {
            let done = session.advance_task(task_id).unwrap();
            let current = session.transcript().messages();
            assert!(current.len() >= previous.len());
            for (before, after) in previous.iter().zip(current) {
                assert_eq!(before.id, after.id);
                assert_eq!(before.content, after.content);
            }
            previous = current.to_vec();
            if done {
                break;
            }
        }
        session.finish_task(task_id).unwrap();
        assert!(session.transcript().len() > previous.len());
    }
}
