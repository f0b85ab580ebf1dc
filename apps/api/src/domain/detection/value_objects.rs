use serde::{Deserialize, Serialize};

/// How serious a detected anomaly is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// Handling status of a detection
///
/// # Status Transitions
/// ```text
/// Detected -> InProgress -> Resolved
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectionStatus {
    Detected,
    InProgress,
    Resolved,
}

impl DetectionStatus {
    /// Checks if a transition from current status to next status is valid
    ///
    /// # Example
    /// ```
    /// use aiworker_console::domain::detection::DetectionStatus;
    ///
    /// assert!(DetectionStatus::Detected.can_transition_to(DetectionStatus::InProgress));
    /// assert!(!DetectionStatus::Detected.can_transition_to(DetectionStatus::Resolved));
    /// ```
    pub fn can_transition_to(&self, next: DetectionStatus) -> bool {
        use DetectionStatus::*;
        matches!((self, next), (Detected, InProgress) | (InProgress, Resolved))
    }
}

impl std::fmt::Display for DetectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectionStatus::Detected => write!(f, "detected"),
            DetectionStatus::InProgress => write!(f, "in-progress"),
            DetectionStatus::Resolved => write!(f, "resolved"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_transitions() {
        assert!(DetectionStatus::Detected.can_transition_to(DetectionStatus::InProgress));
        assert!(DetectionStatus::InProgress.can_transition_to(DetectionStatus::Resolved));
    }

    #[test]
    fn invalid_transitions() {
        assert!(!DetectionStatus::Detected.can_transition_to(DetectionStatus::Resolved));
        assert!(!DetectionStatus::Resolved.can_transition_to(DetectionStatus::Detected));
        assert!(!DetectionStatus::InProgress.can_transition_to(DetectionStatus::Detected));
    }

    #[test]
    fn status_display() {
        assert_eq!(DetectionStatus::InProgress.to_string(), "in-progress");
        assert_eq!(Severity::Critical.to_string(), "critical");
    }
}
