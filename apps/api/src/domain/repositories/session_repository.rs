use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::agent::AgentType;
use crate::domain::session::Session;

/// Repository trait for Session aggregate
///
/// Implementations store whole aggregates; callers that read, modify and
/// save a session are responsible for serializing those steps.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Save a session (insert or update)
    async fn save(&self, session: &Session) -> Result<(), String>;

    /// Find a session by its ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, String>;

    /// Find all sessions owned by an agent, oldest first
    async fn find_by_owner(&self, owner: AgentType) -> Result<Vec<Session>, String>;

    /// List every session, oldest first
    async fn list(&self) -> Result<Vec<Session>, String>;

    /// Delete a session by ID
    async fn delete(&self, id: Uuid) -> Result<(), String>;
}
