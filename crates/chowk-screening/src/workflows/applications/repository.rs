use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ApplicantProfile, ApplicationId, ApplicationStatus};
use super::evaluation::{EvaluationResult, EvaluatorKind};

/// Audit entry persisted next to the application it scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub evaluator: EvaluatorKind,
    pub result: EvaluationResult,
    pub evaluated_at: DateTime<Utc>,
}

/// Repository record containing the profile, evaluation, and status metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub profile: ApplicantProfile,
    pub status: ApplicationStatus,
    pub evaluation: Option<EvaluationRecord>,
}

impl ApplicationRecord {
    pub fn feedback(&self) -> String {
        match &self.evaluation {
            Some(record) => record.result.feedback.clone(),
            None => "pending evaluation".to_string(),
        }
    }

    pub fn status_view(&self) -> ApplicationStatusView {
        let result = self.evaluation.as_ref().map(|record| &record.result);
        ApplicationStatusView {
            application_id: self.profile.application_id.clone(),
            name: self.profile.name.clone(),
            status: self.status.label(),
            feedback: self.feedback(),
            score: result.map(|result| result.score),
            ai_detected: result.map(|result| result.ai_detected),
            evaluator: self.evaluation.as_ref().map(|record| record.evaluator),
            submitted_at: self.profile.submitted_at,
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError>;
    fn update(&self, record: ApplicationRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError>;
    /// Most recent submission for an already-normalized email.
    fn latest_for_email(&self, email: &str) -> Result<Option<ApplicationRecord>, RepositoryError>;
    /// Newest submissions first.
    fn recent(&self, limit: usize) -> Result<Vec<ApplicationRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound applicant messaging (account invitations, e-mail adapters).
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notice: ApplicantNotice) -> Result<(), NotificationError>;
}

/// Notification payload so routes/tests can assert integration boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantNotice {
    pub template: String,
    pub application_id: ApplicationId,
    pub email: String,
    pub details: BTreeMap<String, String>,
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Sanitized representation of an application's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationStatusView {
    pub application_id: ApplicationId,
    pub name: String,
    pub status: &'static str,
    pub feedback: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_detected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluator: Option<EvaluatorKind>,
    pub submitted_at: DateTime<Utc>,
}
