use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::preferences::LayoutPreferences;
use crate::domain::repositories::PreferenceRepository;

/// In-memory implementation of PreferenceRepository
#[derive(Default)]
pub struct InMemoryPreferenceRepository {
    preferences: RwLock<HashMap<Uuid, LayoutPreferences>>,
}

impl InMemoryPreferenceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceRepository for InMemoryPreferenceRepository {
    async fn get(&self, operator_id: Uuid) -> Result<Option<LayoutPreferences>, String> {
        Ok(self.preferences.read().await.get(&operator_id).cloned())
    }

    async fn put(&self, operator_id: Uuid, preferences: LayoutPreferences) -> Result<(), String> {
        self.preferences
            .write()
            .await
            .insert(operator_id, preferences);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn preferences_are_per_operator() {
        let repo = InMemoryPreferenceRepository::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let mut prefs = LayoutPreferences::default();
        prefs.panel_widths.left = 500;

        repo.put(alice, prefs.clone()).await.unwrap();

        assert_eq!(repo.get(alice).await.unwrap(), Some(prefs));
        assert_eq!(repo.get(bob).await.unwrap(), None);
    }
}
