use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{ApplicationAnswers, ApplicationId, ApplicationStatus, ApplicationSubmission};
use super::evaluation::{ApplicationEvaluator, EvaluationResult};
use super::intake::{IntakeGuard, IntakeViolation};
use super::repository::{
    ApplicantNotice, ApplicationRecord, ApplicationRepository, EvaluationRecord,
    NotificationPublisher, RepositoryError,
};

const ACCOUNT_INVITATION_TEMPLATE: &str = "account_invitation";

/// Service composing intake validation, the repository, notifications, and an evaluator.
pub struct MembershipApplicationService<R, A> {
    guard: Arc<IntakeGuard>,
    repository: Arc<R>,
    notifications: Arc<A>,
    evaluator: Arc<dyn ApplicationEvaluator>,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

impl<R, A> MembershipApplicationService<R, A>
where
    R: ApplicationRepository + 'static,
    A: NotificationPublisher + 'static,
{
    pub fn new(
        repository: Arc<R>,
        notifications: Arc<A>,
        evaluator: Arc<dyn ApplicationEvaluator>,
    ) -> Self {
        Self::with_guard(IntakeGuard::default(), repository, notifications, evaluator)
    }

    pub fn with_guard(
        guard: IntakeGuard,
        repository: Arc<R>,
        notifications: Arc<A>,
        evaluator: Arc<dyn ApplicationEvaluator>,
    ) -> Self {
        Self {
            guard: Arc::new(guard),
            repository,
            notifications,
            evaluator,
        }
    }

    pub fn evaluator(&self) -> &dyn ApplicationEvaluator {
        self.evaluator.as_ref()
    }

    /// Validate and store a new application as pending.
    pub fn submit(
        &self,
        submission: ApplicationSubmission,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let mut profile = self.guard.profile_from_submission(submission)?;
        profile.application_id = next_application_id();

        let record = ApplicationRecord {
            profile,
            status: ApplicationStatus::Pending,
            evaluation: None,
        };

        let stored = self.repository.insert(record)?;
        info!(
            application_id = %stored.profile.application_id.0,
            "application submitted"
        );
        Ok(stored)
    }

    /// Score a stored application, persist the outcome, and route it.
    ///
    /// A status change that lands while the evaluator runs (an operator review) is kept; the
    /// evaluation is still recorded, but no invitation is sent for an overridden record.
    pub async fn evaluate(
        &self,
        application_id: &ApplicationId,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let snapshot = self
            .repository
            .fetch(application_id)?
            .ok_or(RepositoryError::NotFound)?;
        let observed_status = snapshot.status;

        let result = self.evaluator.evaluate(&snapshot.profile.answers).await;

        let mut record = self
            .repository
            .fetch(application_id)?
            .ok_or(RepositoryError::NotFound)?;
        let routed = record.status == observed_status;
        if routed {
            record.status = if result.approved {
                ApplicationStatus::Approved
            } else {
                ApplicationStatus::Rejected
            };
        } else {
            info!(
                application_id = %application_id.0,
                status = record.status.label(),
                "status changed during evaluation; keeping reviewed status"
            );
        }
        record.evaluation = Some(EvaluationRecord {
            evaluator: self.evaluator.kind(),
            result: result.clone(),
            evaluated_at: Utc::now(),
        });

        self.repository.update(record.clone())?;

        info!(
            application_id = %application_id.0,
            evaluator = self.evaluator.kind().label(),
            score = result.score,
            ai_detected = result.ai_detected,
            status = record.status.label(),
            "application evaluated"
        );

        if routed && record.status == ApplicationStatus::Approved {
            self.send_invitation(&record, &result);
        }

        Ok(record)
    }

    /// Delivery failures are logged; the stored decision stands and callers are not told to retry.
    fn send_invitation(&self, record: &ApplicationRecord, result: &EvaluationResult) {
        let mut details = BTreeMap::new();
        details.insert("name".to_string(), record.profile.name.clone());
        details.insert("score".to_string(), format!("{:.1}", result.score));
        let notice = ApplicantNotice {
            template: ACCOUNT_INVITATION_TEMPLATE.to_string(),
            application_id: record.profile.application_id.clone(),
            email: record.profile.email.clone(),
            details,
        };

        if let Err(err) = self.notifications.publish(notice) {
            warn!(
                application_id = %record.profile.application_id.0,
                error = %err,
                "account invitation not delivered"
            );
        }
    }

    /// Submit then evaluate, as the wizard does on its final step.
    pub async fn apply(
        &self,
        submission: ApplicationSubmission,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let record = self.submit(submission)?;
        self.evaluate(&record.profile.application_id).await
    }

    /// Stateless scoring that neither validates nor persists.
    pub async fn preview(&self, answers: &ApplicationAnswers) -> EvaluationResult {
        self.evaluator.evaluate(answers).await
    }

    /// Fetch an application and current status for API responses.
    pub fn get(
        &self,
        application_id: &ApplicationId,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let record = self
            .repository
            .fetch(application_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn latest_for_email(
        &self,
        email: &str,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let normalized = email.trim().to_ascii_lowercase();
        let record = self
            .repository
            .latest_for_email(&normalized)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn recent(&self, limit: usize) -> Result<Vec<ApplicationRecord>, ApplicationServiceError> {
        Ok(self.repository.recent(limit)?)
    }

    /// Operator override of the routing decision; the evaluation record is kept as-is.
    pub fn review(
        &self,
        application_id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        if status == ApplicationStatus::Pending {
            return Err(ApplicationServiceError::InvalidReviewStatus);
        }

        let mut record = self.get(application_id)?;
        record.status = status;
        self.repository.update(record.clone())?;

        info!(
            application_id = %application_id.0,
            status = status.label(),
            "application status overridden"
        );
        Ok(record)
    }
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeViolation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("reviews must set the status to approved or rejected")]
    InvalidReviewStatus,
}
