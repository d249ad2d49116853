use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicationAnswers, ApplicationId, ApplicationStatus, ApplicationSubmission};
use super::repository::{ApplicationRepository, NotificationPublisher, RepositoryError};
use super::service::{ApplicationServiceError, MembershipApplicationService};

const DEFAULT_LIST_LIMIT: usize = 20;

/// Router builder exposing HTTP endpoints for intake, lookup, review, and evaluation.
pub fn application_router<R, A>(service: Arc<MembershipApplicationService<R, A>>) -> Router
where
    R: ApplicationRepository + 'static,
    A: NotificationPublisher + 'static,
{
    Router::new()
        .route(
            "/api/v1/applications",
            post(submit_handler::<R, A>).get(list_handler::<R, A>),
        )
        .route(
            "/api/v1/applications/:application_id",
            get(status_handler::<R, A>),
        )
        .route(
            "/api/v1/applications/:application_id/status",
            patch(review_handler::<R, A>),
        )
        .route("/api/v1/evaluations", post(evaluate_handler::<R, A>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListQuery {
    email: Option<String>,
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewRequest {
    status: ApplicationStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EvaluationRequest {
    #[serde(default)]
    answers: ApplicationAnswers,
}

pub(crate) async fn submit_handler<R, A>(
    State(service): State<Arc<MembershipApplicationService<R, A>>>,
    axum::Json(submission): axum::Json<ApplicationSubmission>,
) -> Response
where
    R: ApplicationRepository + 'static,
    A: NotificationPublisher + 'static,
{
    match service.apply(submission).await {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(ApplicationServiceError::Intake(violation)) => {
            let payload = json!({
                "error": violation.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(ApplicationServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({
                "error": "application already exists",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn list_handler<R, A>(
    State(service): State<Arc<MembershipApplicationService<R, A>>>,
    Query(query): Query<ListQuery>,
) -> Response
where
    R: ApplicationRepository + 'static,
    A: NotificationPublisher + 'static,
{
    if let Some(email) = query.email {
        return match service.latest_for_email(&email) {
            Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
            Err(ApplicationServiceError::Repository(RepositoryError::NotFound)) => {
                let payload = json!({
                    "error": "no application found for email",
                });
                (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
            }
            Err(other) => internal_error(other),
        };
    }

    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    match service.recent(limit) {
        Ok(records) => {
            let views: Vec<_> = records.iter().map(|record| record.status_view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn status_handler<R, A>(
    State(service): State<Arc<MembershipApplicationService<R, A>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    A: NotificationPublisher + 'static,
{
    let id = ApplicationId(application_id);
    match service.get(&id) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(ApplicationServiceError::Repository(RepositoryError::NotFound)) => not_found(&id),
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn review_handler<R, A>(
    State(service): State<Arc<MembershipApplicationService<R, A>>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<ReviewRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    A: NotificationPublisher + 'static,
{
    let id = ApplicationId(application_id);
    match service.review(&id, request.status) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(ApplicationServiceError::InvalidReviewStatus) => {
            let payload = json!({
                "error": ApplicationServiceError::InvalidReviewStatus.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(ApplicationServiceError::Repository(RepositoryError::NotFound)) => not_found(&id),
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn evaluate_handler<R, A>(
    State(service): State<Arc<MembershipApplicationService<R, A>>>,
    axum::Json(request): axum::Json<EvaluationRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    A: NotificationPublisher + 'static,
{
    let result = service.preview(&request.answers).await;
    (StatusCode::OK, axum::Json(result)).into_response()
}

fn not_found(id: &ApplicationId) -> Response {
    let payload = json!({
        "application_id": id.0,
        "error": "application not found",
    });
    (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
}

fn internal_error(error: ApplicationServiceError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
