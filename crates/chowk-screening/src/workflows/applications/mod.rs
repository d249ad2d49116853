//! Membership application intake, scoring, and routing.
//!
//! Submissions pass through [`intake`] validation, are stored as pending, scored by whichever
//! [`evaluation::ApplicationEvaluator`] the service was built with, and routed to approved or
//! rejected. Approved applicants receive an account invitation notice.

pub mod domain;
pub mod evaluation;
pub mod import;
pub mod intake;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicantProfile, ApplicationAnswers, ApplicationId, ApplicationStatus, ApplicationSubmission,
    QuestionId,
};
pub use evaluation::{
    ApplicationEvaluator, EvaluationResult, EvaluatorKind, HeuristicEvaluator,
    RemoteModelEvaluator, ScoreBreakdown,
};
pub use import::{ApplicationCsvImporter, ApplicationImportError};
pub use intake::{IntakeGuard, IntakePolicy, IntakeViolation};
pub use repository::{
    ApplicantNotice, ApplicationRecord, ApplicationRepository, ApplicationStatusView,
    EvaluationRecord, NotificationError, NotificationPublisher, RepositoryError,
};
pub use router::application_router;
pub use service::{ApplicationServiceError, MembershipApplicationService};
