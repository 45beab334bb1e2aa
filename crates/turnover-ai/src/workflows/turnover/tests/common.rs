use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::workflows::turnover::automation::{
    AutoAssignRule, AutomationConfig, SameDayOverride, ScheduleAnchor, ScheduleKind, ScheduleRule,
};
use crate::workflows::turnover::domain::{
    Reservation, ReservationId, TaskId, TemplateId, TurnoverTask, UserId,
};
use crate::workflows::turnover::repository::{RepositoryError, TurnoverRepository};
use crate::workflows::turnover::service::{NewTaskRequest, TurnoverService};
use crate::workflows::turnover::turnover_router;

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(super) fn dt(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").expect("valid datetime")
}

pub(super) fn reservation(
    id: &str,
    property: &str,
    check_in: &str,
    check_out: &str,
    next_check_in: Option<&str>,
) -> Reservation {
    Reservation {
        id: ReservationId(id.to_string()),
        property_name: property.to_string(),
        check_in: dt(check_in),
        check_out: dt(check_out),
        next_check_in: next_check_in.map(dt),
    }
}

pub(super) fn assignees(ids: &[&str]) -> BTreeSet<UserId> {
    ids.iter().map(|id| UserId(id.to_string())).collect()
}

pub(super) fn template(id: &str) -> TemplateId {
    TemplateId(id.to_string())
}

/// Fully featured config: next-day-at-09:00 scheduling relative to the
/// following check-in, an 11:30 same-day override, and two default
/// assignees.
pub(super) fn automation_config() -> AutomationConfig {
    AutomationConfig {
        enabled: true,
        schedule: ScheduleRule {
            enabled: true,
            kind: ScheduleKind::Before,
            relative_to: ScheduleAnchor::NextCheckIn,
            days_offset: 1,
            time: Some("09:00".to_string()),
        },
        same_day_override: SameDayOverride {
            enabled: true,
            schedule: ScheduleRule {
                enabled: false,
                kind: ScheduleKind::On,
                relative_to: ScheduleAnchor::CheckOut,
                days_offset: 0,
                time: Some("11:30".to_string()),
            },
        },
        auto_assign: AutoAssignRule {
            enabled: true,
            user_ids: assignees(&["user-ana", "user-bo"]),
        },
    }
}

pub(super) fn task_request(reservation_id: Option<&str>, name: &str) -> NewTaskRequest {
    NewTaskRequest {
        reservation_id: reservation_id.map(|id| ReservationId(id.to_string())),
        property_name: None,
        template_id: template("turnover_clean"),
        name: name.to_string(),
        contingent: false,
    }
}

pub(super) fn build_service() -> (TurnoverService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = TurnoverService::new(repository.clone());
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    reservations: Arc<Mutex<HashMap<ReservationId, Reservation>>>,
    tasks: Arc<Mutex<HashMap<TaskId, TurnoverTask>>>,
    configs: Arc<Mutex<HashMap<(String, TemplateId), AutomationConfig>>>,
}

impl MemoryRepository {
    pub(super) fn set_automation_config(
        &self,
        property: &str,
        template: &TemplateId,
        config: AutomationConfig,
    ) {
        self.configs
            .lock()
            .expect("config mutex poisoned")
            .insert((property.to_string(), template.clone()), config);
    }
}

impl TurnoverRepository for MemoryRepository {
    fn insert_reservation(
        &self,
        reservation: Reservation,
    ) -> Result<Reservation, RepositoryError> {
        let mut guard = self.reservations.lock().expect("reservation mutex poisoned");
        guard.insert(reservation.id.clone(), reservation.clone());
        Ok(reservation)
    }

    fn reservation(&self, id: &ReservationId) -> Result<Option<Reservation>, RepositoryError> {
        let guard = self.reservations.lock().expect("reservation mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn reservations(&self) -> Result<Vec<Reservation>, RepositoryError> {
        let guard = self.reservations.lock().expect("reservation mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn insert_task(&self, task: TurnoverTask) -> Result<TurnoverTask, RepositoryError> {
        let mut guard = self.tasks.lock().expect("task mutex poisoned");
        if guard.contains_key(&task.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(task.id.clone(), task.clone());
        Ok(task)
    }

    fn update_task(&self, task: TurnoverTask) -> Result<(), RepositoryError> {
        let mut guard = self.tasks.lock().expect("task mutex poisoned");
        if guard.contains_key(&task.id) {
            guard.insert(task.id.clone(), task);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn task(&self, id: &TaskId) -> Result<Option<TurnoverTask>, RepositoryError> {
        let guard = self.tasks.lock().expect("task mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn tasks_for_reservation(
        &self,
        id: &ReservationId,
    ) -> Result<Vec<TurnoverTask>, RepositoryError> {
        let guard = self.tasks.lock().expect("task mutex poisoned");
        Ok(guard
            .values()
            .filter(|task| task.reservation_id.as_ref() == Some(id))
            .cloned()
            .collect())
    }

    fn automation_config(
        &self,
        property_name: &str,
        template: &TemplateId,
    ) -> Result<Option<AutomationConfig>, RepositoryError> {
        let guard = self.configs.lock().expect("config mutex poisoned");
        Ok(guard
            .get(&(property_name.to_string(), template.clone()))
            .cloned())
    }
}

pub(super) struct UnavailableRepository;

impl TurnoverRepository for UnavailableRepository {
    fn insert_reservation(
        &self,
        _reservation: Reservation,
    ) -> Result<Reservation, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn reservation(&self, _id: &ReservationId) -> Result<Option<Reservation>, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn reservations(&self) -> Result<Vec<Reservation>, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn insert_task(&self, _task: TurnoverTask) -> Result<TurnoverTask, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn update_task(&self, _task: TurnoverTask) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn task(&self, _id: &TaskId) -> Result<Option<TurnoverTask>, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn tasks_for_reservation(
        &self,
        _id: &ReservationId,
    ) -> Result<Vec<TurnoverTask>, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn automation_config(
        &self,
        _property_name: &str,
        _template: &TemplateId,
    ) -> Result<Option<AutomationConfig>, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }
}

pub(super) fn turnover_router_with_service(
    service: TurnoverService<MemoryRepository>,
) -> axum::Router {
    turnover_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
