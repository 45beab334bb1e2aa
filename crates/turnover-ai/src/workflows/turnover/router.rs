use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{ReservationId, TaskId, TaskStatus, TurnoverStatus};
use super::repository::{RepositoryError, TurnoverRepository};
use super::service::{NewTaskRequest, TurnoverService, TurnoverServiceError};

/// Router builder exposing HTTP endpoints for task creation and status.
pub fn turnover_router<R>(service: Arc<TurnoverService<R>>) -> Router
where
    R: TurnoverRepository + 'static,
{
    Router::new()
        .route("/api/v1/tasks", post(create_task_handler::<R>))
        .route(
            "/api/v1/tasks/:task_id/status",
            post(set_task_status_handler::<R>),
        )
        .route(
            "/api/v1/reservations/:reservation_id/status",
            get(turnover_status_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusUpdateRequest {
    pub(crate) status: TaskStatus,
}

/// Exposed aggregate status for one reservation.
#[derive(Debug, Clone, Serialize)]
pub struct TurnoverStatusView {
    pub reservation_id: ReservationId,
    pub turnover_status: TurnoverStatus,
    pub turnover_status_label: &'static str,
}

pub(crate) async fn create_task_handler<R>(
    State(service): State<Arc<TurnoverService<R>>>,
    axum::Json(request): axum::Json<NewTaskRequest>,
) -> Response
where
    R: TurnoverRepository + 'static,
{
    match service.create_task(request) {
        Ok(task) => (StatusCode::CREATED, axum::Json(task.to_view())).into_response(),
        Err(TurnoverServiceError::BlankTaskName) => {
            let payload = json!({
                "error": TurnoverServiceError::BlankTaskName.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(TurnoverServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "reservation not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(TurnoverServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({
                "error": "task already exists",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn set_task_status_handler<R>(
    State(service): State<Arc<TurnoverService<R>>>,
    Path(task_id): Path<String>,
    axum::Json(request): axum::Json<StatusUpdateRequest>,
) -> Response
where
    R: TurnoverRepository + 'static,
{
    let id = TaskId(task_id);
    match service.set_task_status(&id, request.status) {
        Ok(change) => (StatusCode::OK, axum::Json(change)).into_response(),
        Err(TurnoverServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "task not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn turnover_status_handler<R>(
    State(service): State<Arc<TurnoverService<R>>>,
    Path(reservation_id): Path<String>,
) -> Response
where
    R: TurnoverRepository + 'static,
{
    let id = ReservationId(reservation_id);
    match service.turnover_status(&id) {
        Ok(status) => {
            let view = TurnoverStatusView {
                reservation_id: id,
                turnover_status: status,
                turnover_status_label: status.label(),
            };
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(TurnoverServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "reservation_id": id.0,
                "turnover_status": TurnoverStatus::NoTasks,
                "turnover_status_label": TurnoverStatus::NoTasks.label(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
