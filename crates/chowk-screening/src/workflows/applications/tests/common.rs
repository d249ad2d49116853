use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::workflows::applications::domain::{
    ApplicantProfile, ApplicationAnswers, ApplicationId, ApplicationStatus, ApplicationSubmission,
};
use crate::workflows::applications::evaluation::{
    ApplicationEvaluator, EvaluationResult, EvaluatorKind, GenerationRequest, GenerativeModel,
    HeuristicEvaluator, ModelError,
};
use crate::workflows::applications::repository::{
    ApplicantNotice, ApplicationRecord, ApplicationRepository, NotificationError,
    NotificationPublisher, RepositoryError,
};
use crate::workflows::applications::{application_router, MembershipApplicationService};

/// Specific, first-person answers with one human typo. Heuristic sub-scores: 9, 10, 9, 8, 9.
pub(super) fn strong_answers() -> ApplicationAnswers {
    ApplicationAnswers {
        motivation: "I want to build things with people who care about craft. I have been making short films alone in Pune for three years. This community feels like the room I keep looking for.".to_string(),
        community: "A place where people share unfinished work. Nobody pretends, it stays authentic and a bit messy. We help each other when a draft falls apart.".to_string(),
        collaboration: "Last winter a few of us ran a free workshop for kids in my lane. I felt nervous but I learned that teaching made my own drawing better.".to_string(),
        growth: "I am making a picture book about my grandmother and I am excited about it. I want to improve my ink craft adn finish it this year.".to_string(),
        values: "I would like to give my time, organize monthly sketch walks and help newer members put up their first show.".to_string(),
    }
}

/// Self-promotional answers that still clear the intake length check.
pub(super) fn promotional_answers() -> ApplicationAnswers {
    ApplicationAnswers {
        motivation: "I am a founder and CEO growing my brand, followers, clients and revenue. Looking to scale into new markets with funding.".to_string(),
        community: "A platform for opportunity and networking with potential clients.".to_string(),
        collaboration: "I partnered with a brand to grow my audience last year.".to_string(),
        growth: "A revolutionary app that will disrupt the market.".to_string(),
        values: "I want to get exposure and benefit from access to investors.".to_string(),
    }
}

/// Polished, impersonal answers loaded with buzzwords.
pub(super) fn polished_answers() -> ApplicationAnswers {
    let text = "This community will leverage synergy to elevate the creative ecosystem and foster holistic collaboration across every project.";
    ApplicationAnswers {
        motivation: text.to_string(),
        community: text.to_string(),
        collaboration: text.to_string(),
        growth: text.to_string(),
        values: text.to_string(),
    }
}

pub(super) fn submission(email: &str) -> ApplicationSubmission {
    ApplicationSubmission {
        name: "Meera Iyer".to_string(),
        email: email.to_string(),
        city: Some("Pune".to_string()),
        profession: Some("Filmmaker".to_string()),
        past_events: vec!["chowk-baithak-03".to_string()],
        answers: strong_answers(),
    }
}

pub(super) fn promotional_submission(email: &str) -> ApplicationSubmission {
    ApplicationSubmission {
        answers: promotional_answers(),
        ..submission(email)
    }
}

pub(super) fn stored_record(id: &str, email: &str) -> ApplicationRecord {
    ApplicationRecord {
        profile: ApplicantProfile {
            application_id: ApplicationId(id.to_string()),
            name: "Stored Applicant".to_string(),
            email: email.to_string(),
            city: None,
            profession: None,
            past_events: Vec::new(),
            answers: strong_answers(),
            submitted_at: Utc::now(),
        },
        status: ApplicationStatus::Pending,
        evaluation: None,
    }
}

pub(super) fn build_service() -> (
    MembershipApplicationService<MemoryRepository, MemoryNotifier>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifier>,
) {
    build_service_with(Arc::new(HeuristicEvaluator::standard()))
}

pub(super) fn build_service_with(
    evaluator: Arc<dyn ApplicationEvaluator>,
) -> (
    MembershipApplicationService<MemoryRepository, MemoryNotifier>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifier>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service =
        MembershipApplicationService::new(repository.clone(), notifier.clone(), evaluator);
    (service, repository, notifier)
}

pub(super) fn application_router_with_service(
    service: MembershipApplicationService<MemoryRepository, MemoryNotifier>,
) -> axum::Router {
    application_router(Arc::new(service))
}

/// Insertion-ordered in-memory store.
#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<HashMap<ApplicationId, ApplicationRecord>>>,
    order: Arc<Mutex<Vec<ApplicationId>>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl ApplicationRepository for MemoryRepository {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.profile.application_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.profile.application_id.clone(), record.clone());
        self.order
            .lock()
            .expect("order mutex poisoned")
            .push(record.profile.application_id.clone());
        Ok(record)
    }

    fn update(&self, record: ApplicationRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if !guard.contains_key(&record.profile.application_id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(record.profile.application_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn latest_for_email(&self, email: &str) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let records = self.records.lock().expect("repository mutex poisoned");
        let order = self.order.lock().expect("order mutex poisoned");
        Ok(order
            .iter()
            .rev()
            .filter_map(|id| records.get(id))
            .find(|record| record.profile.email == email)
            .cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let records = self.records.lock().expect("repository mutex poisoned");
        let order = self.order.lock().expect("order mutex poisoned");
        Ok(order
            .iter()
            .rev()
            .filter_map(|id| records.get(id).cloned())
            .take(limit)
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    notices: Arc<Mutex<Vec<ApplicantNotice>>>,
}

impl MemoryNotifier {
    pub(super) fn notices(&self) -> Vec<ApplicantNotice> {
        self.notices.lock().expect("notice mutex poisoned").clone()
    }
}

impl NotificationPublisher for MemoryNotifier {
    fn publish(&self, notice: ApplicantNotice) -> Result<(), NotificationError> {
        self.notices
            .lock()
            .expect("notice mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(super) struct FailingNotifier;

impl NotificationPublisher for FailingNotifier {
    fn publish(&self, _notice: ApplicantNotice) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("smtp offline".to_string()))
    }
}

pub(super) struct UnavailableRepository;

impl ApplicationRepository for UnavailableRepository {
    fn insert(&self, _record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: ApplicationRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn latest_for_email(&self, _email: &str) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn recent(&self, _limit: usize) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Debug, Clone)]
pub(super) enum StubReply {
    Text(String),
    Status(u16),
    Timeout,
    MissingCredential,
}

/// Canned generative backend that records every request it receives.
#[derive(Clone)]
pub(super) struct StubModel {
    reply: StubReply,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl StubModel {
    pub(super) fn replying(text: &str) -> Self {
        Self::with_reply(StubReply::Text(text.to_string()))
    }

    pub(super) fn with_reply(reply: StubReply) -> Self {
        Self {
            reply,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(super) fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().expect("request mutex poisoned").clone()
    }
}

#[async_trait]
impl GenerativeModel for StubModel {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ModelError> {
        self.requests
            .lock()
            .expect("request mutex poisoned")
            .push(request.clone());

        match &self.reply {
            StubReply::Text(text) => Ok(text.clone()),
            StubReply::Status(status) => Err(ModelError::Status {
                status: *status,
                body: "upstream failure".to_string(),
            }),
            StubReply::Timeout => Err(ModelError::Timeout),
            StubReply::MissingCredential => Err(ModelError::MissingCredential),
        }
    }
}

/// Heuristic scoring behind an artificial delay, for interleaving with other service calls.
pub(super) struct SlowEvaluator {
    pub(super) delay: std::time::Duration,
    pub(super) inner: HeuristicEvaluator,
}

#[async_trait]
impl ApplicationEvaluator for SlowEvaluator {
    fn kind(&self) -> EvaluatorKind {
        self.inner.kind()
    }

    async fn evaluate(&self, answers: &ApplicationAnswers) -> EvaluationResult {
        tokio::time::sleep(self.delay).await;
        self.inner.evaluate(answers).await
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
