use async_trait::async_trait;
use chrono::{Datelike, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use super::errors::{AgentError, AgentResult};
use super::router::CrossAgentRouter;
use super::simulator::{ProcessingSimulator, TaskDriver, TickOutcome};
use crate::domain::agent::AgentType;
use crate::domain::detection::Detection;
use crate::domain::repositories::{DetectionRepository, InboxRepository, SessionRepository};
use crate::domain::routing::RoutedRequest;
use crate::domain::session::value_objects::TrackingSeries;
use crate::domain::session::{
    Message, Request, RequestNo, RequestType, Session, SessionAction, SessionEvent,
    SessionStatus,
};
use crate::infrastructure::repositories::{
    InMemoryDetectionRepository, InMemoryInboxRepository, InMemorySessionRepository,
};

/// Operator console: the single entry point for every session mutation
///
/// All writes (operator actions and simulator ticks alike) run under one
/// write lock, so a session is never updated by two callers at once.
/// Side effects that reach other agents are carried out from the events
/// the session aggregate returns, after the session has been saved.
#[derive(Clone)]
pub struct Console {
    sessions: Arc<dyn SessionRepository>,
    inbox: Arc<dyn InboxRepository>,
    detections: Arc<dyn DetectionRepository>,
    router: CrossAgentRouter,
    simulator: ProcessingSimulator,
    write_lock: Arc<Mutex<()>>,
    sequences: Arc<Mutex<HashMap<TrackingSeries, u32>>>,
}

impl Console {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        inbox: Arc<dyn InboxRepository>,
        detections: Arc<dyn DetectionRepository>,
        simulator: ProcessingSimulator,
    ) -> Self {
        Self {
            sessions,
            router: CrossAgentRouter::new(inbox.clone()),
            inbox,
            detections,
            simulator,
            write_lock: Arc::new(Mutex::new(())),
            sequences: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Console over fresh in-memory stores
    pub fn in_memory(step_interval: Duration) -> Self {
        Self::new(
            Arc::new(InMemorySessionRepository::new()),
            Arc::new(InMemoryInboxRepository::new()),
            Arc::new(InMemoryDetectionRepository::new()),
            ProcessingSimulator::new(step_interval),
        )
    }

    // ===== Entry points =====

    /// Opens a session on a request that has not been approved yet
    pub async fn open_session(&self, owner: AgentType, request: Request) -> AgentResult<Session> {
        let _guard = self.write_lock.lock().await;
        let status = intake_status(owner, false)?;
        self.open(owner, request, status, None).await
    }

    /// Opens a session from an item in the owner's inbox
    ///
    /// The item is consumed. Items forwarded by another agent skip the
    /// approval gate; items forwarded by ITS remember the ITS ticket.
    pub async fn open_routed_session(
        &self,
        owner: AgentType,
        routed_id: Uuid,
    ) -> AgentResult<Session> {
        let _guard = self.write_lock.lock().await;

        let pending = self
            .inbox
            .list_for(owner)
            .await
            .map_err(AgentError::Repository)?;
        let item = pending
            .iter()
            .find(|item| item.id == routed_id)
            .ok_or(AgentError::InboxItemNotFound(routed_id))?;
        let status = intake_status(owner, item.is_pre_approved())?;

        let routed = self
            .inbox
            .take(owner, routed_id)
            .await
            .map_err(AgentError::Repository)?
            .ok_or(AgentError::InboxItemNotFound(routed_id))?;
        let origin = its_origin(&routed);

        self.open(owner, routed.request, status, origin).await
    }

    /// Issues a new ITS ticket and opens it for approval
    pub async fn submit_its_request(
        &self,
        request_type: RequestType,
        title: &str,
    ) -> AgentResult<Session> {
        let _guard = self.write_lock.lock().await;
        let request_no = self.next_number(TrackingSeries::Its).await;
        let request = Request::new(request_no, request_type, title, Utc::now().date_naive())
            .map_err(AgentError::Validation)?;

        self.open(AgentType::Its, request, SessionStatus::PendingApproval, None)
            .await
    }

    /// Starts a monitoring run against `target`
    ///
    /// The run opens in progress with its checks already running; when they
    /// finish the session waits on the monitoring results.
    pub async fn start_monitoring_run(&self, target: &str) -> AgentResult<Session> {
        let target = target.trim();
        let _guard = self.write_lock.lock().await;
        let request_no = self.next_number(TrackingSeries::Mon).await;
        let request = Request::new(
            request_no,
            RequestType::Simple,
            target,
            Utc::now().date_naive(),
        )
        .map_err(AgentError::Validation)?;

        let (mut session, _) =
            Session::new(AgentType::Monitoring, request, SessionStatus::InProgress)
                .map_err(AgentError::Validation)?;
        session.post(Message::agent(greeting(&session)));
        let events = session
            .start_task(&format!("Run monitoring checks on {}", target))
            .map_err(|e| AgentError::from_transition(session.id(), e))?;

        self.save(&session).await?;
        info!(
            session_id = %session.id(),
            request_no = %session.request().request_no,
            "Monitoring run started"
        );
        self.publish(events).await?;
        Ok(session)
    }

    /// Opens a Report session for an incident session
    ///
    /// An incident gets at most one open report session.
    pub async fn start_report(&self, source_session_id: Uuid) -> AgentResult<Session> {
        let _guard = self.write_lock.lock().await;
        let source = self.load(source_session_id).await?;
        let reported = self
            .sessions
            .find_by_owner(AgentType::Report)
            .await
            .map_err(AgentError::Repository)?
            .iter()
            .any(|s| s.source_incident_session() == Some(source_session_id));
        if reported {
            return Err(AgentError::Validation(format!(
                "{} already has a report session",
                source.request().request_no
            )));
        }
        let request_no = self.next_number(TrackingSeries::Rpt).await;

        let (mut report, _) =
            Session::spawn_report(&source, request_no).map_err(AgentError::Validation)?;
        report.post(Message::agent(greeting(&report)));

        self.save(&report).await?;
        info!(
            session_id = %report.id(),
            source_session_id = %source_session_id,
            "Report session opened"
        );
        Ok(report)
    }

    // ===== Session operations =====

    /// Posts an operator chat message and the agent's acknowledgement
    pub async fn post_message(&self, id: Uuid, content: &str) -> AgentResult<Session> {
        if content.trim().is_empty() {
            return Err(AgentError::Validation("Message cannot be empty".to_string()));
        }

        let _guard = self.write_lock.lock().await;
        let mut session = self.load(id).await?;
        session.post(Message::user(content.trim()));
        session.post(Message::agent(acknowledgement(&session)));

        self.save(&session).await?;
        Ok(session)
    }

    /// Applies an operator action and carries out its side effects
    pub async fn dispatch(&self, id: Uuid, action: SessionAction) -> AgentResult<Session> {
        let _guard = self.write_lock.lock().await;
        let mut session = self.load(id).await?;
        let name = action.name();

        let events = session
            .apply(action)
            .map_err(|e| AgentError::from_transition(id, e))?;

        self.save(&session).await?;
        info!(session_id = %id, action = name, status = %session.status(), "Action applied");
        self.publish(events).await?;
        Ok(session)
    }

    /// Starts a processing task on an in-progress session
    pub async fn run_task(&self, id: Uuid, label: &str) -> AgentResult<Session> {
        let _guard = self.write_lock.lock().await;
        let mut session = self.load(id).await?;

        let events = session
            .start_task(label)
            .map_err(|e| AgentError::from_transition(id, e))?;

        self.save(&session).await?;
        self.publish(events).await?;
        Ok(session)
    }

    /// Cancels the running task, leaving its checklist where it stopped
    pub async fn cancel_task(&self, id: Uuid) -> AgentResult<Session> {
        let _guard = self.write_lock.lock().await;
        let mut session = self.load(id).await?;

        let events = session
            .cancel_task()
            .map_err(|e| AgentError::from_transition(id, e))?;

        self.save(&session).await?;
        self.publish(events).await?;
        Ok(session)
    }

    /// Removes a session, cancelling its task first
    pub async fn close_session(&self, id: Uuid) -> AgentResult<()> {
        let _guard = self.write_lock.lock().await;
        self.load(id).await?;

        if let Some(task_id) = self.simulator.cancel(id).await {
            debug!(session_id = %id, task_id = %task_id, "Cancelled task of closed session");
        }
        self.sessions
            .delete(id)
            .await
            .map_err(AgentError::Repository)?;

        info!(session_id = %id, "Session closed");
        Ok(())
    }

    // ===== Queries =====

    pub async fn session(&self, id: Uuid) -> AgentResult<Session> {
        self.load(id).await
    }

    pub async fn sessions_for(&self, owner: AgentType) -> AgentResult<Vec<Session>> {
        self.sessions
            .find_by_owner(owner)
            .await
            .map_err(AgentError::Repository)
    }

    pub async fn sessions(&self) -> AgentResult<Vec<Session>> {
        self.sessions.list().await.map_err(AgentError::Repository)
    }

    pub async fn inbox(&self, owner: AgentType) -> AgentResult<Vec<RoutedRequest>> {
        self.inbox
            .list_for(owner)
            .await
            .map_err(AgentError::Repository)
    }

    pub async fn detections(&self) -> AgentResult<Vec<Detection>> {
        self.detections.list().await.map_err(AgentError::Repository)
    }

    // ===== Internals =====

    async fn open(
        &self,
        owner: AgentType,
        request: Request,
        status: SessionStatus,
        its_origin: Option<RequestNo>,
    ) -> AgentResult<Session> {
        let (session, _) = Session::new(owner, request, status).map_err(AgentError::Validation)?;
        let mut session = session.with_its_origin(its_origin);
        session.post(Message::agent(greeting(&session)));

        self.save(&session).await?;
        info!(
            session_id = %session.id(),
            owner = %owner,
            request_no = %session.request().request_no,
            status = %session.status(),
            "Session opened"
        );
        Ok(session)
    }

    async fn load(&self, id: Uuid) -> AgentResult<Session> {
        self.sessions
            .find_by_id(id)
            .await
            .map_err(AgentError::Repository)?
            .ok_or(AgentError::SessionNotFound(id))
    }

    async fn save(&self, session: &Session) -> AgentResult<()> {
        self.sessions
            .save(session)
            .await
            .map_err(AgentError::Repository)
    }

    async fn next_number(&self, series: TrackingSeries) -> RequestNo {
        let mut sequences = self.sequences.lock().await;
        let seq = sequences.entry(series).or_insert(0);
        *seq += 1;
        RequestNo::generate(series, Utc::now().year(), *seq)
    }

    /// Carries out the side effects described by session events
    async fn publish(&self, events: Vec<SessionEvent>) -> AgentResult<()> {
        for event in events {
            match event {
                SessionEvent::StatusChanged {
                    session_id,
                    from,
                    to,
                } => {
                    debug!(session_id = %session_id, from = %from, to = %to, "Status changed");
                }
                SessionEvent::RequestForwarded { routed, .. } => {
                    self.router.forward(routed).await?;
                }
                SessionEvent::DetectionRegistered {
                    session_id,
                    detection_id,
                    severity,
                    title,
                    source,
                } => {
                    let detection_no = self.next_number(TrackingSeries::Det).await;
                    let detection = Detection::new(
                        detection_id,
                        detection_no,
                        severity,
                        title,
                        source,
                        Utc::now().date_naive(),
                        Some(session_id),
                    )
                    .map_err(AgentError::Validation)?;
                    self.detections
                        .save(&detection)
                        .await
                        .map_err(AgentError::Repository)?;
                    info!(
                        detection_no = %detection.detection_no(),
                        severity = %severity,
                        "Detection registered"
                    );
                }
                SessionEvent::DetectionProgressed {
                    detection_id,
                    status,
                    ..
                } => {
                    let mut detection = self
                        .detections
                        .find_by_id(detection_id)
                        .await
                        .map_err(AgentError::Repository)?
                        .ok_or(AgentError::DetectionNotFound(detection_id))?;
                    detection
                        .advance_to(status)
                        .map_err(AgentError::Validation)?;
                    self.detections
                        .save(&detection)
                        .await
                        .map_err(AgentError::Repository)?;
                }
                SessionEvent::TaskStarted {
                    session_id,
                    task_id,
                    ..
                } => {
                    self.simulator
                        .spawn(session_id, task_id, Arc::new(self.clone()))
                        .await;
                }
                SessionEvent::TaskCancelled {
                    session_id,
                    task_id,
                } => {
                    self.simulator.cancel(session_id).await;
                    info!(
                        session_id = %session_id,
                        task_id = %task_id,
                        "Processing task cancelled"
                    );
                }
                SessionEvent::Created { .. }
                | SessionEvent::MessagePosted { .. }
                | SessionEvent::TaskFinished { .. } => {}
            }
        }
        Ok(())
    }
}

#[async_trait]
impl TaskDriver for Console {
    async fn tick(&self, session_id: Uuid, task_id: Uuid) -> AgentResult<TickOutcome> {
        let _guard = self.write_lock.lock().await;
        let mut session = self.load(session_id).await?;

        let done = session
            .advance_task(task_id)
            .map_err(|e| AgentError::from_transition(session_id, e))?;
        if !done {
            self.save(&session).await?;
            return Ok(TickOutcome::Running);
        }

        let events = session
            .finish_task(task_id)
            .map_err(|e| AgentError::from_transition(session_id, e))?;
        self.save(&session).await?;
        self.publish(events).await?;
        Ok(TickOutcome::Finished)
    }
}

fn intake_status(owner: AgentType, pre_approved: bool) -> AgentResult<SessionStatus> {
    owner.intake_status(pre_approved).ok_or_else(|| {
        AgentError::Validation(format!(
            "{} sessions can only be opened by a monitoring run",
            owner
        ))
    })
}

fn its_origin(routed: &RoutedRequest) -> Option<RequestNo> {
    (routed.source_agent_type == Some(AgentType::Its)).then(|| routed.request.request_no.clone())
}

/// First agent message of a new session
fn greeting(session: &Session) -> String {
    let request = session.request();
    match session.status() {
        SessionStatus::PendingApproval => format!(
            "{} ({}) \"{}\" is waiting for approval. Approve or reject it?",
            request.request_no, request.request_type, request.title
        ),
        SessionStatus::PendingProcessStart => format!(
            "{} \"{}\" is ready. Start processing when you are ready.",
            request.request_no, request.title
        ),
        SessionStatus::PendingReportStart => format!(
            "Ready to draft the incident report for \"{}\". Generate it when you are ready.",
            request.title
        ),
        SessionStatus::InProgress if session.owner() == AgentType::Monitoring => {
            format!("Monitoring run {} started for {}.", request.request_no, request.title)
        }
        _ => format!("Opened {} \"{}\".", request.request_no, request.title),
    }
}

/// Canned agent reply to a free-form chat message
fn acknowledgement(session: &Session) -> String {
    if let Some(task) = session.running_task() {
        return format!("Still working on {}. I will report back when it is done.", task.label);
    }
    match session.status() {
        status if status.is_terminal() => {
            "This session is closed. No further actions are available.".to_string()
        }
        SessionStatus::InProgress => {
            "Understood. Send it as a task when you want me to run it.".to_string()
        }
        status => format!("Noted. {} is currently {}.", session.request().request_no, status),
    }
}
