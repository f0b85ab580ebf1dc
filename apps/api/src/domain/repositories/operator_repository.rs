use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::operator::{Email, Operator};

/// Repository trait for console operators
#[async_trait]
pub trait OperatorRepository: Send + Sync {
    /// Create a new operator
    async fn create(&self, operator: Operator) -> Result<Uuid, String>;

    /// Find an operator by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Operator>, String>;

    /// Find an operator by email address
    async fn find_by_email(&self, email: &Email) -> Result<Option<Operator>, String>;
}
