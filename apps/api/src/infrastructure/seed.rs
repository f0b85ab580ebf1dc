// Demo data installed at startup
// Gives every dashboard something to show before the first operator action

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::auth::password::hash_password;
use crate::domain::agent::AgentType;
use crate::domain::detection::{Detection, DetectionStatus, Severity};
use crate::domain::operator::{Email, Operator};
use crate::domain::repositories::{DetectionRepository, InboxRepository, OperatorRepository};
use crate::domain::routing::RoutedRequest;
use crate::domain::session::{Request, RequestNo, RequestType};

const SERVICE_DESK: &str = "Service Desk";

/// Counts of what `seed_demo_data` installed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub inbox_items: usize,
    pub detections: usize,
}

fn date(day: u32) -> Result<NaiveDate, String> {
    NaiveDate::from_ymd_opt(2024, 5, day).ok_or_else(|| format!("invalid seed day {}", day))
}

fn request(no: &str, request_type: RequestType, title: &str, day: u32) -> Result<Request, String> {
    Request::new(RequestNo::new(no)?, request_type, title, date(day)?)
}

/// Installs demo inbox items and detections
pub async fn seed_demo_data(
    inbox: &dyn InboxRepository,
    detections: &dyn DetectionRepository,
) -> Result<SeedSummary, String> {
    let items = [
        (AgentType::Its, "ITS-2024-0200", RequestType::Incident, "DB timeout", 14),
        (
            AgentType::Its,
            "ITS-2024-0201",
            RequestType::Improvement,
            "Add SSO to the expense portal",
            14,
        ),
        (AgentType::Its, "ITS-2024-0202", RequestType::Data, "Monthly sales extract", 15),
        (
            AgentType::Its,
            "ITS-2024-0203",
            RequestType::Account,
            "Account for new contractor",
            15,
        ),
        (AgentType::Db, "ITS-2024-0190", RequestType::Data, "Archive 2022 audit logs", 10),
        (
            AgentType::ChangeManagement,
            "ITS-2024-0185",
            RequestType::Improvement,
            "Upgrade load balancer firmware",
            9,
        ),
        (
            AgentType::BusinessSupport,
            "BIZ-2024-0042",
            RequestType::Simple,
            "Export the quarterly budget",
            13,
        ),
        (AgentType::Sop, "SOP-2024-0031", RequestType::Incident, "Nightly batch job failed", 16),
    ];
    for (destination, no, request_type, title, day) in items {
        let routed = RoutedRequest::submitted(
            request(no, request_type, title, day)?,
            SERVICE_DESK,
            destination,
        );
        inbox.push(routed).await?;
    }

    let found = [
        (
            "DET-2024-0011",
            Severity::Critical,
            "Disk usage above 95% on db-02",
            "db-02",
            16,
            DetectionStatus::Detected,
        ),
        (
            "DET-2024-0010",
            Severity::Warning,
            "Replication lag over 30s",
            "db-replica-1",
            15,
            DetectionStatus::InProgress,
        ),
        (
            "DET-2024-0009",
            Severity::Info,
            "TLS certificate expires in 20 days",
            "api-gateway",
            12,
            DetectionStatus::Resolved,
        ),
    ];
    for (no, severity, title, source, day, status) in found {
        let mut detection = Detection::new(
            Uuid::new_v4(),
            RequestNo::new(no)?,
            severity,
            title,
            source,
            date(day)?,
            None,
        )?;
        if status != DetectionStatus::Detected {
            detection.advance_to(DetectionStatus::InProgress)?;
        }
        if status == DetectionStatus::Resolved {
            detection.advance_to(DetectionStatus::Resolved)?;
        }
        detections.save(&detection).await?;
    }

    let summary = SeedSummary {
        inbox_items: items.len(),
        detections: found.len(),
    };
    info!(
        inbox_items = summary.inbox_items,
        detections = summary.detections,
        "Seeded demo data"
    );
    Ok(summary)
}

/// Creates the console operator account
pub async fn seed_operator(
    operators: &dyn OperatorRepository,
    email: &str,
    password: &str,
    full_name: &str,
    bcrypt_cost: u32,
) -> Result<Uuid, String> {
    let email = Email::new(email)?;
    let password_hash = hash_password(password, bcrypt_cost)?;
    let id = operators
        .create(Operator::new(email.clone(), password_hash, full_name))
        .await?;

    info!(operator_id = %id, email = %email, "Seeded console operator");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::verify_password;
    use crate::infrastructure::repositories::{
        InMemoryDetectionRepository, InMemoryInboxRepository, InMemoryOperatorRepository,
    };

    #[tokio::test]
    async fn seeds_inboxes_and_detections() {
        let inbox = InMemoryInboxRepository::new();
        let detections = InMemoryDetectionRepository::new();

        let summary = seed_demo_data(&inbox, &detections).await.unwrap();

        assert_eq!(summary.detections, 3);
        assert_eq!(inbox.list_for(AgentType::Its).await.unwrap().len(), 4);
        assert!(inbox
            .list_for(AgentType::Monitoring)
            .await
            .unwrap()
            .is_empty());

        let listed = detections.list().await.unwrap();
        assert_eq!(listed[0].detection_no().as_str(), "DET-2024-0011");
        assert_eq!(listed[2].status(), DetectionStatus::Resolved);
    }

    #[tokio::test]
    async fn seeded_items_wait_for_approval() {
        let inbox = InMemoryInboxRepository::new();
        let detections = InMemoryDetectionRepository::new();
        seed_demo_data(&inbox, &detections).await.unwrap();

        let its = inbox.list_for(AgentType::Its).await.unwrap();

        assert!(its.iter().all(|item| !item.is_pre_approved()));
        assert_eq!(its[0].source_agent, SERVICE_DESK);
    }

    #[tokio::test]
    async fn operator_password_is_hashed() {
        let operators = InMemoryOperatorRepository::new();

        let id = seed_operator(&operators, "Ops@Example.com", "night-shift", "Ops", 4)
            .await
            .unwrap();

        let operator = operators.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(operator.email.as_str(), "ops@example.com");
        assert_ne!(operator.password_hash, "night-shift");
        assert!(verify_password("night-shift", &operator.password_hash).unwrap());
    }
}
