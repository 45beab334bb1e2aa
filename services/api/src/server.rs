use crate::cli::ServeArgs;
use crate::infra::{seed_from_export, AppState, BoardDefaults, InMemoryTurnoverRepository};
use crate::routes::with_turnover_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use turnover_ai::config::AppConfig;
use turnover_ai::error::AppError;
use turnover_ai::telemetry;
use turnover_ai::workflows::pms::PmsReservationImporter;
use turnover_ai::workflows::turnover::{TurnoverService, TurnoverServiceError};

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

    let repository = InMemoryTurnoverRepository::default();
    if let Some(path) = args.pms_csv.take() {
        let import = PmsReservationImporter::from_path(&path)?;
        seed_from_export(&repository, &import).map_err(TurnoverServiceError::from)?;
        info!(
            reservations = import.reservations.len(),
            tasks = import.tasks.len(),
            path = %path.display(),
            "preloaded reservation export"
        );
    }

    let service = Arc::new(TurnoverService::new(Arc::new(repository)));
    let defaults = BoardDefaults {
        mode: config.board.default_mode,
    };

    let app = with_turnover_routes(service, defaults)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "turnover scheduling service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
