use std::sync::Arc;
use tracing::info;

use super::errors::{AgentError, AgentResult};
use crate::domain::repositories::InboxRepository;
use crate::domain::routing::RoutedRequest;

/// Delivers requests forwarded by one agent into another agent's inbox
///
/// Delivery is fire-and-forget: the sender does not wait for the
/// destination to act, and nothing flows back.
#[derive(Clone)]
pub struct CrossAgentRouter {
    inbox: Arc<dyn InboxRepository>,
}

impl CrossAgentRouter {
    pub fn new(inbox: Arc<dyn InboxRepository>) -> Self {
        Self { inbox }
    }

    /// Appends the routed request to its destination inbox
    pub async fn forward(&self, routed: RoutedRequest) -> AgentResult<()> {
        info!(
            request_no = %routed.request.request_no,
            source = %routed.source_agent,
            destination = %routed.destination,
            "Routing request"
        );
        self.inbox.push(routed).await.map_err(AgentError::Repository)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::agent::AgentType;
    use crate::domain::session::value_objects::{Request, RequestNo, RequestType};
    use crate::infrastructure::repositories::InMemoryInboxRepository;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn forward_lands_in_destination_inbox() {
        let inbox = Arc::new(InMemoryInboxRepository::new());
        let router = CrossAgentRouter::new(inbox.clone());
        let request = Request::new(
            RequestNo::new("ITS-2024-0300").unwrap(),
            RequestType::Improvement,
            "Faster login page",
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        )
        .unwrap();

        router
            .forward(RoutedRequest::forwarded(
                request,
                AgentType::Its,
                AgentType::ChangeManagement,
            ))
            .await
            .unwrap();

        let items = inbox.list_for(AgentType::ChangeManagement).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].source_agent, "ITS Agent");
    }
}
