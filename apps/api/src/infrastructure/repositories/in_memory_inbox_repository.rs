use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::agent::AgentType;
use crate::domain::repositories::InboxRepository;
use crate::domain::routing::RoutedRequest;

/// In-memory implementation of InboxRepository
#[derive(Default)]
pub struct InMemoryInboxRepository {
    inboxes: RwLock<HashMap<AgentType, Vec<RoutedRequest>>>,
}

impl InMemoryInboxRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InboxRepository for InMemoryInboxRepository {
    async fn push(&self, routed: RoutedRequest) -> Result<(), String> {
        self.inboxes
            .write()
            .await
            .entry(routed.destination)
            .or_default()
            .push(routed);
        Ok(())
    }

    async fn list_for(&self, agent: AgentType) -> Result<Vec<RoutedRequest>, String> {
        Ok(self
            .inboxes
            .read()
            .await
            .get(&agent)
            .cloned()
            .unwrap_or_default())
    }

    async fn take(&self, agent: AgentType, id: Uuid) -> Result<Option<RoutedRequest>, String> {
        let mut inboxes = self.inboxes.write().await;
        let Some(inbox) = inboxes.get_mut(&agent) else {
            return Ok(None);
        };
        Ok(inbox
            .iter()
            .position(|item| item.id == id)
            .map(|index| inbox.remove(index)))
    }
}
