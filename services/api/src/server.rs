use crate::cli::ServeArgs;
use crate::infra::{cors_layer, shutdown_signal, AppState};
use crate::routes::with_application_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use student_intake::applications::{
    ApplicationRepository, ApplicationService, InMemoryApplicationStore, PgApplicationStore,
};
use student_intake::config::AppConfig;
use student_intake::error::AppError;
use student_intake::telemetry;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    if args.in_memory {
        warn!("serving from in-memory storage; applications are lost on exit");
        return serve(Arc::new(InMemoryApplicationStore::default()), &config).await;
    }

    let store = Arc::new(PgApplicationStore::connect(&config.database).await?);
    let outcome = serve(store.clone(), &config).await;
    store.close().await;
    info!("application store closed");
    outcome
}

/// Initializes the schema, then serves until a shutdown signal arrives.
async fn serve<R>(repository: Arc<R>, config: &AppConfig) -> Result<(), AppError>
where
    R: ApplicationRepository + 'static,
{
    repository.initialize().await?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = Arc::new(ApplicationService::new(repository));
    let app = with_application_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer)
        .layer(cors_layer(&config.server.cors_origins));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "student application intake ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    readiness_flag.store(false, Ordering::Release);
    Ok(())
}
