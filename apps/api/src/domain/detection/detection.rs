use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use super::value_objects::{DetectionStatus, Severity};
use crate::domain::session::value_objects::RequestNo;

/// An anomaly found during a monitoring run
///
/// # Invariants
/// - Title cannot be empty
/// - Status only moves forward (detected, in-progress, resolved)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    id: Uuid,
    detection_no: RequestNo,
    severity: Severity,
    title: String,
    source: String,
    date: NaiveDate,
    status: DetectionStatus,
    session_id: Option<Uuid>,
}

impl Detection {
    /// Creates a new detection in `Detected` status
    ///
    /// # Returns
    /// * `Ok(Detection)` - New detection
    /// * `Err(String)` - If the title is blank
    pub fn new(
        id: Uuid,
        detection_no: RequestNo,
        severity: Severity,
        title: impl Into<String>,
        source: impl Into<String>,
        date: NaiveDate,
        session_id: Option<Uuid>,
    ) -> Result<Self, String> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err("Detection title cannot be empty".to_string());
        }

        Ok(Self {
            id,
            detection_no,
            severity,
            title,
            source: source.into(),
            date,
            status: DetectionStatus::Detected,
            session_id,
        })
    }

    /// Moves the detection to `next`
    ///
    /// # Returns
    /// * `Err(String)` - If the status cannot move there from the current one
    pub fn advance_to(&mut self, next: DetectionStatus) -> Result<(), String> {
        if !self.status.can_transition_to(next) {
            return Err(format!(
                "Cannot move detection {} from {} to {}",
                self.detection_no, self.status, next
            ));
        }
        self.status = next;
        Ok(())
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn detection_no(&self) -> &RequestNo {
        &self.detection_no
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn status(&self) -> DetectionStatus {
        self.status
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.session_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection() -> Detection {
        Detection::new(
            Uuid::new_v4(),
            RequestNo::new("DET-2024-0001").unwrap(),
            Severity::Warning,
            "CPU above 90%",
            "web-01",
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            None,
        )
        .unwrap()
    }

    #[test]
    fn new_detection_is_detected() {
        let detection = detection();

        assert_eq!(detection.status(), DetectionStatus::Detected);
        assert_eq!(detection.title(), "CPU above 90%");
        assert_eq!(detection.source(), "web-01");
    }

    #[test]
    fn empty_title_fails() {
        let result = Detection::new(
            Uuid::new_v4(),
            RequestNo::new("DET-2024-0002").unwrap(),
            Severity::Info,
            "",
            "web-01",
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            None,
        );

        assert!(result.unwrap_err().contains("cannot be empty"));
    }

    #[test]
    fn progresses_to_resolved() {
        let mut detection = detection();

        detection.advance_to(DetectionStatus::InProgress).unwrap();
        detection.advance_to(DetectionStatus::Resolved).unwrap();

        assert_eq!(detection.status(), DetectionStatus::Resolved);
    }

    #[test]
    fn cannot_skip_in_progress() {
        let mut detection = detection();

        assert!(detection.advance_to(DetectionStatus::Resolved).is_err());
        assert_eq!(detection.status(), DetectionStatus::Detected);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(detection()).unwrap();

        assert_eq!(json["detectionNo"], "DET-2024-0001");
        assert_eq!(json["status"], "detected");
        assert_eq!(json["severity"], "warning");
    }
}
