use crate::infra::{board_entries, deserialize_optional_date, AppState, BoardDefaults};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;
use turnover_ai::error::AppError;
use turnover_ai::workflows::pms::PmsReservationImporter;
use turnover_ai::workflows::turnover::{
    turnover_router, BoardRowView, DateWindow, StatusCountEntry, TimelineBoard, TimelineMode,
    TurnoverRepository, TurnoverService,
};

#[derive(Debug, Deserialize)]
pub(crate) struct BoardRequest {
    /// First visible date; when omitted the window anchors around `today`.
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) anchor: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) mode: Option<TimelineMode>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
    /// Raw reservation export; when present the board is built from it
    /// instead of the live store.
    #[serde(default)]
    pub(crate) pms_csv: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct BoardResponse {
    pub(crate) today: NaiveDate,
    pub(crate) data_source: BoardDataSource,
    pub(crate) mode: TimelineMode,
    pub(crate) mode_label: &'static str,
    pub(crate) window_start: NaiveDate,
    pub(crate) window_end: NaiveDate,
    pub(crate) dates: Vec<NaiveDate>,
    pub(crate) rows: Vec<BoardRowView>,
    pub(crate) off_window: usize,
    pub(crate) status_counts: Vec<StatusCountEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum BoardDataSource {
    Pms,
    Live,
}

pub(crate) fn with_turnover_routes<R>(
    service: Arc<TurnoverService<R>>,
    defaults: BoardDefaults,
) -> axum::Router
where
    R: TurnoverRepository + 'static,
{
    turnover_router(service.clone())
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/timeline/board",
            axum::routing::post(board_endpoint::<R>),
        )
        .layer(Extension(service))
        .layer(Extension(defaults))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn board_endpoint<R>(
    Extension(service): Extension<Arc<TurnoverService<R>>>,
    Extension(defaults): Extension<BoardDefaults>,
    Json(payload): Json<BoardRequest>,
) -> Result<Json<BoardResponse>, AppError>
where
    R: TurnoverRepository + 'static,
{
    let BoardRequest {
        anchor,
        mode,
        today,
        pms_csv,
    } = payload;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let mode = mode.unwrap_or(defaults.mode);
    let window = match anchor {
        Some(anchor) => DateWindow::new(anchor, mode),
        None => DateWindow::jump_to_today(today, mode),
    };

    let (board, data_source) = if let Some(csv) = pms_csv {
        let reader = Cursor::new(csv.into_bytes());
        let import = PmsReservationImporter::from_reader(reader)?;
        let board = TimelineBoard::build(window, &board_entries(&import));
        (board, BoardDataSource::Pms)
    } else {
        (service.board(window)?, BoardDataSource::Live)
    };

    let view = board.summary();
    Ok(Json(BoardResponse {
        today,
        data_source,
        mode: view.mode,
        mode_label: view.mode_label,
        window_start: view.window_start,
        window_end: view.window_end,
        dates: view.dates,
        rows: view.rows,
        off_window: view.off_window,
        status_counts: view.status_counts,
    }))
}
