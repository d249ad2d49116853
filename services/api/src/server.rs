use crate::cli::ServeArgs;
use crate::infra::{
    build_evaluator, AppState, InMemoryApplicationRepository, InMemoryNotificationPublisher,
};
use crate::routes::with_application_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chowk_screening::config::AppConfig;
use chowk_screening::error::AppError;
use chowk_screening::telemetry;
use chowk_screening::workflows::applications::{
    ApplicationEvaluator, MembershipApplicationService,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(engine) = args.engine.take() {
        config.evaluator.engine = engine;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let evaluator = build_evaluator(&config.evaluator)?;
    let evaluator_kind = evaluator.kind();
    let repository = Arc::new(InMemoryApplicationRepository::default());
    let notifications = Arc::new(InMemoryNotificationPublisher::default());
    let application_service = Arc::new(MembershipApplicationService::new(
        repository,
        notifications,
        evaluator,
    ));

    let app = with_application_routes(application_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        evaluator = evaluator_kind.label(),
        "membership screening service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
