use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::detection::Detection;
use crate::domain::repositories::DetectionRepository;

/// In-memory implementation of DetectionRepository
#[derive(Default)]
pub struct InMemoryDetectionRepository {
    detections: RwLock<HashMap<Uuid, Detection>>,
}

impl InMemoryDetectionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DetectionRepository for InMemoryDetectionRepository {
    async fn save(&self, detection: &Detection) -> Result<(), String> {
        self.detections
            .write()
            .await
            .insert(detection.id(), detection.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Detection>, String> {
        Ok(self.detections.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Detection>, String> {
        let mut detections: Vec<Detection> =
            self.detections.read().await.values().cloned().collect();
        detections.sort_by(|a, b| {
            b.date()
                .cmp(&a.date())
                .then_with(|| b.detection_no().as_str().cmp(a.detection_no().as_str()))
        });
        Ok(detections)
    }
}
