use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::agent::AgentType;
use crate::domain::repositories::SessionRepository;
use crate::domain::session::Session;

/// In-memory implementation of SessionRepository
///
/// Sessions live for the lifetime of the process. Reads hand out clones so
/// callers never hold the lock across an await point.
#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn oldest_first(mut sessions: Vec<Session>) -> Vec<Session> {
    sessions.sort_by_key(|s| s.created_at());
    sessions
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn save(&self, session: &Session) -> Result<(), String> {
        self.sessions
            .write()
            .await
            .insert(session.id(), session.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, String> {
        Ok(self.sessions.read().await.get(&id).cloned())
    }

    async fn find_by_owner(&self, owner: AgentType) -> Result<Vec<Session>, String> {
        let sessions = self.sessions.read().await;
        Ok(oldest_first(
            sessions
                .values()
                .filter(|s| s.owner() == owner)
                .cloned()
                .collect(),
        ))
    }

    async fn list(&self) -> Result<Vec<Session>, String> {
        Ok(oldest_first(
            self.sessions.read().await.values().cloned().collect(),
        ))
    }

    async fn delete(&self, id: Uuid) -> Result<(), String> {
        match self.sessions.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(format!("Session not found: {}", id)),
        }
    }
}
