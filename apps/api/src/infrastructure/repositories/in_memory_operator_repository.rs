use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::operator::{Email, Operator};
use crate::domain::repositories::OperatorRepository;

/// In-memory implementation of OperatorRepository
#[derive(Default)]
pub struct InMemoryOperatorRepository {
    operators: RwLock<HashMap<Uuid, Operator>>,
}

impl InMemoryOperatorRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OperatorRepository for InMemoryOperatorRepository {
    async fn create(&self, operator: Operator) -> Result<Uuid, String> {
        let mut operators = self.operators.write().await;
        if operators.values().any(|o| o.email == operator.email) {
            return Err(format!("duplicate operator email: {}", operator.email));
        }
        let id = operator.id;
        operators.insert(id, operator);
        Ok(id)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Operator>, String> {
        Ok(self.operators.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Operator>, String> {
        Ok(self
            .operators
            .read()
            .await
            .values()
            .find(|o| &o.email == email)
            .cloned())
    }
}
