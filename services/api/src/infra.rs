use chowk_screening::config::EvaluatorConfig;
use chowk_screening::error::AppError;
use chowk_screening::workflows::applications::evaluation::{
    GeminiClient, RemoteModelEvaluator, ScoringTables,
};
use chowk_screening::workflows::applications::{
    ApplicantNotice, ApplicationEvaluator, ApplicationId, ApplicationRecord,
    ApplicationRepository, EvaluatorKind, HeuristicEvaluator, NotificationError,
    NotificationPublisher, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct Store {
    records: HashMap<ApplicationId, ApplicationRecord>,
    order: Vec<ApplicationId>,
}

/// Process-local store; submissions are kept in arrival order.
#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationRepository {
    store: Arc<Mutex<Store>>,
}

impl InMemoryApplicationRepository {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Store>, RepositoryError> {
        self.store
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.records.contains_key(&record.profile.application_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.order.push(record.profile.application_id.clone());
        guard
            .records
            .insert(record.profile.application_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ApplicationRecord) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        if guard.records.contains_key(&record.profile.application_id) {
            guard
                .records
                .insert(record.profile.application_id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.records.get(id).cloned())
    }

    fn latest_for_email(&self, email: &str) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .order
            .iter()
            .rev()
            .filter_map(|id| guard.records.get(id))
            .find(|record| record.profile.email == email)
            .cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .order
            .iter()
            .rev()
            .take(limit)
            .filter_map(|id| guard.records.get(id).cloned())
            .collect())
    }
}

/// Logs invitations instead of sending mail; keeps them for the demo output.
#[derive(Default, Clone)]
pub(crate) struct InMemoryNotificationPublisher {
    notices: Arc<Mutex<Vec<ApplicantNotice>>>,
}

impl NotificationPublisher for InMemoryNotificationPublisher {
    fn publish(&self, notice: ApplicantNotice) -> Result<(), NotificationError> {
        info!(
            template = %notice.template,
            application_id = %notice.application_id.0,
            "applicant notice queued"
        );
        let mut guard = self
            .notices
            .lock()
            .map_err(|_| NotificationError::Transport("notice mutex poisoned".to_string()))?;
        guard.push(notice);
        Ok(())
    }
}

impl InMemoryNotificationPublisher {
    pub(crate) fn notices(&self) -> Vec<ApplicantNotice> {
        self.notices
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

/// Build the configured scoring strategy.
pub(crate) fn build_evaluator(
    config: &EvaluatorConfig,
) -> Result<Arc<dyn ApplicationEvaluator>, AppError> {
    match config.engine {
        EvaluatorKind::Heuristic => {
            let evaluator = match &config.scoring_tables_path {
                Some(path) => {
                    let tables = ScoringTables::from_path(path)?.compile()?;
                    info!(path = %path.display(), "loaded scoring table overrides");
                    HeuristicEvaluator::new(tables)
                }
                None => HeuristicEvaluator::standard(),
            };
            Ok(Arc::new(evaluator))
        }
        EvaluatorKind::RemoteModel => {
            if config.remote.gemini.api_key.is_none() {
                warn!("GEMINI_API_KEY is not set; remote evaluations will return the fallback result");
            }
            let client = GeminiClient::new(config.remote.gemini.clone())?;
            let evaluator = RemoteModelEvaluator::new(client)
                .with_generation(config.remote.temperature, config.remote.max_output_tokens);
            Ok(Arc::new(evaluator))
        }
    }
}

pub(crate) fn parse_engine(raw: &str) -> Result<EvaluatorKind, String> {
    EvaluatorKind::parse(raw)
        .ok_or_else(|| format!("unknown evaluator '{raw}' (expected heuristic or remote)"))
}
