use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::agent::AgentType;

/// Labels of the steps every processing simulation walks through
pub const PROCESSING_STEPS: [&str; 4] = [
    "Analyze request",
    "Collect data",
    "Execute task",
    "Generate result",
];

/// Who wrote a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Agent,
}

/// Progress of a single processing step
///
/// Moves strictly `Pending -> Running -> Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Running,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingStep {
    pub id: usize,
    pub step: String,
    pub status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// One-shot navigation affordance rendered under a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavLink {
    pub label: String,
    pub target_agent_id: String,
}

impl NavLink {
    /// Link that opens the given agent's dashboard
    pub fn to_agent(agent: AgentType) -> Self {
        Self {
            label: format!("Open {}", agent.display_name()),
            target_agent_id: agent.id().to_string(),
        }
    }
}

/// A transcript entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub role: MessageRole,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_steps: Option<Vec<ProcessingStep>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<NavLink>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn agent(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Agent, content)
    }

    fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            processing_steps: None,
            link: None,
            created_at: Utc::now(),
        }
    }

    /// Attaches a navigation link
    pub fn with_link(mut self, link: NavLink) -> Self {
        self.link = Some(link);
        self
    }

    /// Agent message carrying a fresh checklist with every step pending
    pub fn progress(task_label: &str) -> Self {
        let steps = PROCESSING_STEPS
            .iter()
            .enumerate()
            .map(|(index, label)| ProcessingStep {
                id: index + 1,
                step: label.to_string(),
                status: StepStatus::Pending,
                detail: None,
            })
            .collect();

        let mut message = Self::agent(format!("Working on: {}", task_label));
        message.processing_steps = Some(steps);
        message
    }
}

/// Advances a checklist by exactly one step
///
/// The running step (if any) completes and the next pending step starts.
/// With nothing running, the first pending step starts.
///
/// # Returns
/// `true` once every step is completed
pub fn advance_steps(steps: &mut [ProcessingStep]) -> bool {
    match steps.iter().position(|s| s.status != StepStatus::Completed) {
        None => true,
        Some(index) => {
            if steps[index].status == StepStatus::Running {
                steps[index].status = StepStatus::Completed;
                if let Some(next) = steps.get_mut(index + 1) {
                    next.status = StepStatus::Running;
                }
            } else {
                steps[index].status = StepStatus::Running;
            }
            steps.iter().all(|s| s.status == StepStatus::Completed)
        }
    }
}

/// Append-only, chronologically ordered list of messages
///
/// The only in-place mutation allowed is advancing the checklist of a
/// progress message, which never changes the message count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message and returns its id
    pub fn append(&mut self, message: Message) -> Uuid {
        let id = message.id;
        self.messages.push(message);
        id
    }

    /// Mutable access to the checklist of a progress message
    pub fn steps_mut(&mut self, message_id: Uuid) -> Option<&mut Vec<ProcessingStep>> {
        self.messages
            .iter_mut()
            .find(|m| m.id == message_id)
            .and_then(|m| m.processing_steps.as_mut())
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
