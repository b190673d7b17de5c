use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryChecklistStore};
use crate::routes::with_checklist_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use visabuddy::config::AppConfig;
use visabuddy::error::AppError;
use visabuddy::telemetry;
use visabuddy::workflows::checklist::{
    AiChecklistGenerator, BackendContextClient, ChecklistRequestGate, FallbackChecklistProvider,
    OpenAiCompletionClient,
};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryChecklistStore::default());
    let contexts = Arc::new(BackendContextClient::from_config(&config.backend)?);
    let gateway = Arc::new(OpenAiCompletionClient::from_config(&config.ai)?);
    let fallback = Arc::new(FallbackChecklistProvider::builtin()?);
    let gate = Arc::new(ChecklistRequestGate::new(
        store,
        contexts,
        AiChecklistGenerator::new(gateway),
        fallback,
    ));

    let app = with_checklist_routes(gate)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "checklist service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
