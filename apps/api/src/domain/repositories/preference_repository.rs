use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::preferences::LayoutPreferences;

/// Stores console layout preferences per operator
#[async_trait]
pub trait PreferenceRepository: Send + Sync {
    /// Preferences for an operator, if any were saved
    async fn get(&self, operator_id: Uuid) -> Result<Option<LayoutPreferences>, String>;

    /// Replace an operator's preferences
    async fn put(&self, operator_id: Uuid, preferences: LayoutPreferences) -> Result<(), String>;
}
