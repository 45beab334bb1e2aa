use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use turnover_ai::workflows::pms::{PmsImport, CLEANING_TEMPLATE};
use turnover_ai::workflows::turnover::automation::{
    SameDayOverride, ScheduleAnchor, ScheduleKind, ScheduleRule,
};
use turnover_ai::workflows::turnover::{
    AutomationConfig, Reservation, ReservationId, RepositoryError, TaskId, TemplateId,
    TimelineMode, TurnoverRepository, TurnoverTask,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Board settings a request can omit; injected as an extension so the
/// endpoint honors the configured default mode.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BoardDefaults {
    pub(crate) mode: TimelineMode,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryTurnoverRepository {
    reservations: Arc<Mutex<HashMap<ReservationId, Reservation>>>,
    tasks: Arc<Mutex<HashMap<TaskId, TurnoverTask>>>,
    configs: Arc<Mutex<HashMap<(String, TemplateId), AutomationConfig>>>,
}

impl InMemoryTurnoverRepository {
    pub(crate) fn set_automation_config(
        &self,
        property_name: &str,
        template: &TemplateId,
        config: AutomationConfig,
    ) {
        let mut guard = self.configs.lock().expect("config mutex poisoned");
        guard.insert((property_name.to_string(), template.clone()), config);
    }
}

impl TurnoverRepository for InMemoryTurnoverRepository {
    /// The feed re-sends the full snapshot on every sync, so reservation
    /// writes are upserts.
    fn insert_reservation(&self, reservation: Reservation) -> Result<Reservation, RepositoryError> {
        let mut guard = self
            .reservations
            .lock()
            .expect("reservation mutex poisoned");
        guard.insert(reservation.id.clone(), reservation.clone());
        Ok(reservation)
    }

    fn reservation(&self, id: &ReservationId) -> Result<Option<Reservation>, RepositoryError> {
        let guard = self
            .reservations
            .lock()
            .expect("reservation mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn reservations(&self) -> Result<Vec<Reservation>, RepositoryError> {
        let guard = self
            .reservations
            .lock()
            .expect("reservation mutex poisoned");
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

/// House policy for turnover cleans: schedule the day before the next
/// guest arrives (at the 10:00 default time), pull the clean forward to
/// 11:30 on same-day flips, and leave assignment to the coordinators.
pub(crate) fn default_automation_config() -> AutomationConfig {
    AutomationConfig {
        enabled: true,
        schedule: ScheduleRule {
            enabled: true,
            kind: ScheduleKind::Before,
            relative_to: ScheduleAnchor::NextCheckIn,
            days_offset: 1,
            time: None,
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
        auto_assign: Default::default(),
    }
}

/// Load an export into the store and register the house automation policy
/// for every property it mentions.
pub(crate) fn seed_from_export(
    repository: &InMemoryTurnoverRepository,
    import: &PmsImport,
) -> Result<(), RepositoryError> {
    import.seed_repository(repository)?;

    let properties: BTreeSet<&str> = import
        .reservations
        .iter()
        .map(|reservation| reservation.property_name.as_str())
        .collect();
    let template = TemplateId(CLEANING_TEMPLATE.to_string());
    for property in properties {
        repository.set_automation_config(property, &template, default_automation_config());
    }

    Ok(())
}

/// Pair each imported reservation with its seeded tasks for board building.
pub(crate) fn board_entries(import: &PmsImport) -> Vec<(Reservation, Vec<TurnoverTask>)> {
    import
        .reservations
        .iter()
        .map(|reservation| {
            let tasks: Vec<TurnoverTask> = import
                .tasks
                .iter()
                .filter(|task| task.reservation_id.as_ref() == Some(&reservation.id))
                .cloned()
                .collect();
            (reservation.clone(), tasks)
        })
        .collect()
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_mode(raw: &str) -> Result<TimelineMode, String> {
    TimelineMode::parse(raw)
        .ok_or_else(|| format!("unknown timeline mode '{raw}', expected week or month"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
