use serde::Serialize;

use super::value_objects::AgentType;

/// Entry in the worker agent directory
///
/// The directory is a read-only lookup table built at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: &'static str,
    pub agent_type: AgentType,
    pub name: &'static str,
    pub description: &'static str,
}

impl Agent {
    /// Builds the directory entry for an agent type
    pub fn of(agent_type: AgentType) -> Self {
        let description = match agent_type {
            AgentType::Its => "Receives ITS tickets and routes approved requests",
            AgentType::Sop => "Handles incidents by following standard operating procedures",
            AgentType::Monitoring => "Runs monitoring checks and registers detections",
            AgentType::Db => "Performs database operations and data requests",
            AgentType::ChangeManagement => "Plans and tracks improvement and change requests",
            AgentType::Report => "Drafts incident reports and knowledge entries",
            AgentType::BusinessSupport => "Answers business support questions",
        };

        Self {
            id: agent_type.id(),
            agent_type,
            name: agent_type.display_name(),
            description,
        }
    }

    /// Returns the full agent directory
    pub fn directory() -> Vec<Agent> {
        AgentType::ALL.into_iter().map(Agent::of).collect()
    }
}
