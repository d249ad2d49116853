use super::common::*;
use std::sync::Arc;
use std::time::Duration;

use crate::workflows::applications::domain::{ApplicationId, ApplicationStatus};
use crate::workflows::applications::evaluation::{EvaluatorKind, RemoteModelEvaluator};
use crate::workflows::applications::repository::{ApplicationRepository, RepositoryError};
use crate::workflows::applications::{
    ApplicationServiceError, HeuristicEvaluator, IntakeViolation, MembershipApplicationService,
};

#[test]
fn submit_stores_pending_record_with_assigned_id() {
    let (service, repository, notifier) = build_service();

    let record = service
        .submit(submission("meera@example.com"))
        .expect("submission stored");

    assert!(record.profile.application_id.0.starts_with("app-"));
    assert_eq!(record.profile.application_id.0.len(), "app-000000".len());
    assert_eq!(record.status, ApplicationStatus::Pending);
    assert!(record.evaluation.is_none());
    assert_eq!(record.status_view().feedback, "pending evaluation");
    assert_eq!(repository.len(), 1);
    assert!(notifier.notices().is_empty());
}

#[test]
fn submit_assigns_distinct_ids() {
    let (service, _, _) = build_service();
    let first = service.submit(submission("a@example.com")).expect("stored");
    let second = service.submit(submission("b@example.com")).expect("stored");
    assert_ne!(first.profile.application_id, second.profile.application_id);
}

#[test]
fn submit_rejects_intake_violations_without_storing() {
    let (service, repository, _) = build_service();
    let mut short = submission("meera@example.com");
    short.answers.motivation = "because".to_string();

    let err = service.submit(short).expect_err("short answer rejected");
    assert!(matches!(
        err,
        ApplicationServiceError::Intake(IntakeViolation::AnswerTooShort { .. })
    ));
    assert_eq!(repository.len(), 0);
}

#[tokio::test]
async fn apply_approves_and_invites_strong_applicants() {
    let (service, repository, notifier) = build_service();

    let record = service
        .apply(submission("Meera@Example.com"))
        .await
        .expect("application processed");

    assert_eq!(record.status, ApplicationStatus::Approved);
    let evaluation = record.evaluation.as_ref().expect("evaluation recorded");
    assert_eq!(evaluation.evaluator, EvaluatorKind::Heuristic);
    assert!(evaluation.result.approved);

    let stored = repository
        .fetch(&record.profile.application_id)
        .expect("fetch works")
        .expect("record stored");
    assert_eq!(stored.status, ApplicationStatus::Approved);

    let notices = notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].template, "account_invitation");
    assert_eq!(notices[0].email, "meera@example.com");
    assert_eq!(notices[0].application_id, record.profile.application_id);
    assert_eq!(
        notices[0].details.get("score").map(String::as_str),
        Some("9.0")
    );
}

#[tokio::test]
async fn apply_rejects_promotional_applicants_without_notice() {
    let (service, _, notifier) = build_service();

    let record = service
        .apply(promotional_submission("growth@example.com"))
        .await
        .expect("application processed");

    assert_eq!(record.status, ApplicationStatus::Rejected);
    let view = record.status_view();
    assert_eq!(view.status, "rejected");
    assert_eq!(view.score, Some(2.2));
    assert_eq!(view.ai_detected, Some(false));
    assert!(notifier.notices().is_empty());
}

#[tokio::test]
async fn remote_fallback_routes_to_rejected_for_manual_review() {
    let evaluator = RemoteModelEvaluator::new(StubModel::with_reply(StubReply::Timeout));
    let (service, _, notifier) = build_service_with(Arc::new(evaluator));

    let record = service
        .apply(submission("meera@example.com"))
        .await
        .expect("application processed");

    assert_eq!(record.status, ApplicationStatus::Rejected);
    let evaluation = record.evaluation.expect("evaluation recorded");
    assert_eq!(evaluation.evaluator, EvaluatorKind::RemoteModel);
    assert_eq!(
        evaluation.result.feedback,
        "Unable to evaluate with AI. Manual review required."
    );
    assert!(notifier.notices().is_empty());
}

#[tokio::test]
async fn evaluate_unknown_application_is_not_found() {
    let (service, _, _) = build_service();
    let err = service
        .evaluate(&ApplicationId("app-missing".to_string()))
        .await
        .expect_err("unknown id");
    assert!(matches!(
        err,
        ApplicationServiceError::Repository(RepositoryError::NotFound)
    ));
}

#[tokio::test]
async fn notification_failure_keeps_stored_approval() {
    let repository = Arc::new(MemoryRepository::default());
    let service = MembershipApplicationService::new(
        repository.clone(),
        Arc::new(FailingNotifier),
        Arc::new(HeuristicEvaluator::standard()),
    );

    let record = service
        .apply(submission("meera@example.com"))
        .await
        .expect("delivery failure does not fail the application");
    assert_eq!(record.status, ApplicationStatus::Approved);
    assert_eq!(repository.len(), 1);

    let stored = repository
        .fetch(&record.profile.application_id)
        .expect("fetch works")
        .expect("record stored");
    assert_eq!(stored.status, ApplicationStatus::Approved);
    assert!(stored.evaluation.is_some());
}

#[tokio::test]
async fn review_during_evaluation_is_not_overwritten() {
    let evaluator = SlowEvaluator {
        delay: Duration::from_millis(200),
        inner: HeuristicEvaluator::standard(),
    };
    let (service, repository, notifier) = build_service_with(Arc::new(evaluator));
    let id = service
        .submit(submission("meera@example.com"))
        .expect("stored")
        .profile
        .application_id;

    let (evaluated, reviewed) = tokio::join!(service.evaluate(&id), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        service.review(&id, ApplicationStatus::Rejected)
    });
    let reviewed = reviewed.expect("review stored");
    assert_eq!(reviewed.status, ApplicationStatus::Rejected);

    let evaluated = evaluated.expect("evaluation stored");
    assert_eq!(evaluated.status, ApplicationStatus::Rejected);
    let evaluation = evaluated.evaluation.expect("evaluation recorded");
    assert!(evaluation.result.approved);

    let stored = repository
        .fetch(&id)
        .expect("fetch works")
        .expect("record stored");
    assert_eq!(stored.status, ApplicationStatus::Rejected);
    assert!(stored.evaluation.is_some());
    assert!(notifier.notices().is_empty());
}

#[tokio::test]
async fn re_evaluation_routes_again_when_status_is_unchanged() {
    let (service, _, notifier) = build_service();
    let record = service
        .apply(submission("meera@example.com"))
        .await
        .expect("processed");
    assert_eq!(record.status, ApplicationStatus::Approved);

    let again = service
        .evaluate(&record.profile.application_id)
        .await
        .expect("re-evaluated");
    assert_eq!(again.status, ApplicationStatus::Approved);
    assert_eq!(notifier.notices().len(), 2);
}

#[tokio::test]
async fn latest_for_email_is_case_insensitive_and_newest_first() {
    let (service, _, _) = build_service();

    let older = service
        .apply(promotional_submission("meera@example.com"))
        .await
        .expect("processed");
    let newer = service
        .apply(submission("meera@example.com"))
        .await
        .expect("processed");

    let latest = service
        .latest_for_email("  MEERA@example.com ")
        .expect("latest found");
    assert_eq!(latest.profile.application_id, newer.profile.application_id);
    assert_ne!(latest.profile.application_id, older.profile.application_id);

    assert!(matches!(
        service.latest_for_email("nobody@example.com"),
        Err(ApplicationServiceError::Repository(RepositoryError::NotFound))
    ));
}

#[test]
fn recent_lists_newest_first_with_limit() {
    let (service, _, _) = build_service();
    let ids: Vec<ApplicationId> = ["a", "b", "c"]
        .iter()
        .map(|local| {
            service
                .submit(submission(&format!("{local}@example.com")))
                .expect("stored")
                .profile
                .application_id
        })
        .collect();

    let recent = service.recent(2).expect("recent works");
    let recent_ids: Vec<ApplicationId> = recent
        .into_iter()
        .map(|record| record.profile.application_id)
        .collect();
    assert_eq!(recent_ids, vec![ids[2].clone(), ids[1].clone()]);
}

#[tokio::test]
async fn review_overrides_status_and_keeps_evaluation() {
    let (service, _, _) = build_service();
    let record = service
        .apply(promotional_submission("growth@example.com"))
        .await
        .expect("processed");

    let reviewed = service
        .review(&record.profile.application_id, ApplicationStatus::Approved)
        .expect("review stored");
    assert_eq!(reviewed.status, ApplicationStatus::Approved);
    assert_eq!(reviewed.evaluation, record.evaluation);

    let fetched = service
        .get(&record.profile.application_id)
        .expect("record exists");
    assert_eq!(fetched.status, ApplicationStatus::Approved);
}

#[test]
fn review_rejects_pending_and_unknown_ids() {
    let (service, _, _) = build_service();
    let record = service
        .submit(submission("meera@example.com"))
        .expect("stored");

    assert!(matches!(
        service.review(&record.profile.application_id, ApplicationStatus::Pending),
        Err(ApplicationServiceError::InvalidReviewStatus)
    ));
    assert!(matches!(
        service.review(
            &ApplicationId("app-unknown".to_string()),
            ApplicationStatus::Rejected
        ),
        Err(ApplicationServiceError::Repository(RepositoryError::NotFound))
    ));
}

#[test]
fn repository_outage_is_reported() {
    let service = MembershipApplicationService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryNotifier::default()),
        Arc::new(HeuristicEvaluator::standard()),
    );

    assert!(matches!(
        service.submit(submission("meera@example.com")),
        Err(ApplicationServiceError::Repository(RepositoryError::Unavailable(_)))
    ));
}
