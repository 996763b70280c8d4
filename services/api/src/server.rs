use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryNotificationPublisher, InMemoryPlacementRepository};
use crate::routes::with_placement_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use campus_placement::config::AppConfig;
use campus_placement::error::AppError;
use campus_placement::telemetry;
use campus_placement::workflows::catalog::OpportunityCatalogImporter;
use campus_placement::workflows::placement::PlacementService;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(catalog) = args.catalog.take() {
        config.catalog.seed_csv = Some(catalog);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryPlacementRepository::default());
    let notifications = Arc::new(InMemoryNotificationPublisher::default());
    let placement_service = Arc::new(PlacementService::new(repository, notifications));

    if let Some(path) = config.catalog.seed_csv.as_deref() {
        seed_catalog(&placement_service, path)?;
    }

    let app = with_placement_routes(placement_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "campus placement service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn seed_catalog(
    service: &PlacementService<InMemoryPlacementRepository, InMemoryNotificationPublisher>,
    path: &Path,
) -> Result<(), AppError> {
    let import = OpportunityCatalogImporter::from_path(path)?;
    for row in &import.rejected {
        warn!(
            line = row.line,
            opportunity_id = row.opportunity_id.as_deref().unwrap_or("-"),
            reason = %row.reason,
            "seed catalog row skipped"
        );
    }

    let loaded = service.load_opportunities(import.opportunities)?;
    info!(path = %path.display(), loaded, "seed catalog imported");
    Ok(())
}
