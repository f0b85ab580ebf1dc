use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::agent::AgentType;
use crate::domain::routing::RoutedRequest;

/// Per-agent inbound lists of routed requests
#[async_trait]
pub trait InboxRepository: Send + Sync {
    /// Append a routed request to its destination's inbox
    async fn push(&self, routed: RoutedRequest) -> Result<(), String>;

    /// Items waiting in an agent's inbox, in arrival order
    async fn list_for(&self, agent: AgentType) -> Result<Vec<RoutedRequest>, String>;

    /// Remove an item from an agent's inbox so a session can be opened for it
    async fn take(&self, agent: AgentType, id: Uuid) -> Result<Option<RoutedRequest>, String>;
}
