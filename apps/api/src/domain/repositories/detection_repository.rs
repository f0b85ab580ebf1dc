use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::detection::Detection;

/// Repository trait for detection items
#[async_trait]
pub trait DetectionRepository: Send + Sync {
    /// Save a detection (insert or update)
    async fn save(&self, detection: &Detection) -> Result<(), String>;

    /// Find a detection by its ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Detection>, String>;

    /// List every detection, newest first
    async fn list(&self) -> Result<Vec<Detection>, String>;
}
