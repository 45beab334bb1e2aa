use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::automation;
use super::board::TimelineBoard;
use super::domain::{
    ReservationId, TaskId, TaskStatus, TaskView, TemplateId, TurnoverStatus, TurnoverTask,
};
use super::repository::{RepositoryError, TurnoverRepository};
use super::status;
use super::timeline::DateWindow;

/// Service composing the repository with the one-shot automation evaluator.
pub struct TurnoverService<R> {
    repository: Arc<R>,
}

static TASK_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_task_id() -> TaskId {
    let id = TASK_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    TaskId(format!("task-{id:06}"))
}

/// Payload for creating a turnover task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTaskRequest {
    /// Stay the task belongs to; None for recurring or ad hoc work.
    #[serde(default)]
    pub reservation_id: Option<ReservationId>,
    /// Property used for the automation lookup when no reservation is
    /// given; ignored otherwise.
    #[serde(default)]
    pub property_name: Option<String>,
    pub template_id: TemplateId,
    pub name: String,
    #[serde(default)]
    pub contingent: bool,
}

/// Result of a status update, including the re-aggregated turnover status
/// of the parent reservation when there is one.
#[derive(Debug, Clone, Serialize)]
pub struct TaskStatusChange {
    pub task: TaskView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turnover_status: Option<TurnoverStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turnover_status_label: Option<&'static str>,
}

impl<R> TurnoverService<R>
where
    R: TurnoverRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Create a task, applying the property/template automation rules to
    /// fill in the initial schedule and assignees.
    ///
    /// Automation runs here and only here. If the reservation's dates
    /// change later, the stored `scheduled_start` stays where it is; there
    /// is deliberately no reschedule path.
    pub fn create_task(
        &self,
        request: NewTaskRequest,
    ) -> Result<TurnoverTask, TurnoverServiceError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(TurnoverServiceError::BlankTaskName);
        }

        let reservation = match &request.reservation_id {
            Some(id) => Some(
                self.repository
                    .reservation(id)?
                    .ok_or(RepositoryError::NotFound)?,
            ),
            None => None,
        };

        let property_name = reservation
            .as_ref()
            .map(|reservation| reservation.property_name.as_str())
            .or(request.property_name.as_deref());
        let config = match property_name {
            Some(property_name) => self
                .repository
                .automation_config(property_name, &request.template_id)?,
            None => None,
        };

        let outcome = automation::evaluate(
            config.as_ref(),
            reservation.as_ref().map(|reservation| reservation.check_out),
            reservation
                .as_ref()
                .and_then(|reservation| reservation.next_check_in),
        );

        let status = if request.contingent {
            TaskStatus::Contingent
        } else {
            TaskStatus::NotStarted
        };

        let task = TurnoverTask {
            id: next_task_id(),
            reservation_id: request.reservation_id,
            template_id: request.template_id,
            name: name.to_string(),
            status,
            scheduled_start: outcome.scheduled_start,
            assigned_user_ids: outcome.assigned_user_ids,
        };

        let stored = self.repository.insert_task(task)?;
        Ok(stored)
    }

    /// Move a task to a new status and re-aggregate its reservation.
    pub fn set_task_status(
        &self,
        task_id: &TaskId,
        status: TaskStatus,
    ) -> Result<TaskStatusChange, TurnoverServiceError> {
        let mut task = self
            .repository
            .task(task_id)?
            .ok_or(RepositoryError::NotFound)?;

        task.status = status;
        self.repository.update_task(task.clone())?;

        let turnover_status = match &task.reservation_id {
            Some(reservation_id) => Some(self.turnover_status(reservation_id)?),
            None => None,
        };

        Ok(TaskStatusChange {
            task: task.to_view(),
            turnover_status,
            turnover_status_label: turnover_status.map(TurnoverStatus::label),
        })
    }

    /// Aggregate status over the reservation's current task set.
    pub fn turnover_status(
        &self,
        reservation_id: &ReservationId,
    ) -> Result<TurnoverStatus, TurnoverServiceError> {
        self.repository
            .reservation(reservation_id)?
            .ok_or(RepositoryError::NotFound)?;

        let tasks = self.repository.tasks_for_reservation(reservation_id)?;
        Ok(status::aggregate(&tasks))
    }

    /// Build the timeline board for the given window over every stored
    /// reservation.
    pub fn board(&self, window: DateWindow) -> Result<TimelineBoard, TurnoverServiceError> {
        let reservations = self.repository.reservations()?;
        let mut entries = Vec::with_capacity(reservations.len());
        for reservation in reservations {
            let tasks = self.repository.tasks_for_reservation(&reservation.id)?;
            entries.push((reservation, tasks));
        }

        Ok(TimelineBoard::build(window, &entries))
    }
}

/// Error raised by the turnover service.
#[derive(Debug, thiserror::Error)]
pub enum TurnoverServiceError {
    #[error("task name must not be blank")]
    BlankTaskName,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
