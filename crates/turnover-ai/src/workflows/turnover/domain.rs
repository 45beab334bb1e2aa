use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for reservations supplied by the property-management system.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReservationId(pub String);

/// Identifier wrapper for turnover tasks.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(pub String);

/// Identifier wrapper for staff members eligible for assignment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Identifier wrapper for task templates; automation rules are keyed per
/// property and template.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TemplateId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    Paused,
    Complete,
    Reopened,
    Contingent,
}

impl TaskStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Paused => "Paused",
            Self::Complete => "Complete",
            Self::Reopened => "Reopened",
            Self::Contingent => "Contingent",
        }
    }

    /// Folds raw status strings from external exports into the enum.
    /// Anything unrecognized lands in `NotStarted` so a stray value can
    /// never break the aggregation downstream.
    pub fn parse(value: &str) -> Self {
        let normalized = value
            .trim()
            .to_ascii_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");

        match normalized.as_str() {
            "in_progress" => Self::InProgress,
            "paused" => Self::Paused,
            "complete" | "completed" => Self::Complete,
            "reopened" => Self::Reopened,
            "contingent" => Self::Contingent,
            _ => Self::NotStarted,
        }
    }
}

/// Aggregate state of a turnover, derived from its task set and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnoverStatus {
    NoTasks,
    NotStarted,
    InProgress,
    Complete,
}

impl TurnoverStatus {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::NoTasks,
            Self::NotStarted,
            Self::InProgress,
            Self::Complete,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NoTasks => "No Tasks",
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Complete => "Complete",
        }
    }
}

/// A guest stay as supplied by the upstream reservation feed. Instants are
/// already projected into the property's working calendar, so no timezone
/// handling happens on this side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub property_name: String,
    pub check_in: NaiveDateTime,
    pub check_out: NaiveDateTime,
    /// Check-in of the following reservation at the same property, supplied
    /// by the feed; the engine never derives it.
    pub next_check_in: Option<NaiveDateTime>,
}

impl Reservation {
    /// True when this checkout and the following check-in share a calendar
    /// day, regardless of the hours involved.
    pub fn same_day_turnover(&self) -> bool {
        self.next_check_in
            .is_some_and(|next| next.date() == self.check_out.date())
    }

    pub fn stay_dates(&self) -> (NaiveDate, NaiveDate) {
        (self.check_in.date(), self.check_out.date())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnoverTask {
    pub id: TaskId,
    /// None for unscheduled or recurring work not tied to a stay.
    pub reservation_id: Option<ReservationId>,
    pub template_id: TemplateId,
    pub name: String,
    pub status: TaskStatus,
    pub scheduled_start: Option<NaiveDateTime>,
    pub assigned_user_ids: BTreeSet<UserId>,
}

impl TurnoverTask {
    /// Contingent tasks exist and can be scheduled, but stay out of the
    /// turnover-completion accounting.
    pub fn counts_toward_turnover(&self) -> bool {
        self.status != TaskStatus::Contingent
    }

    pub fn to_view(&self) -> TaskView {
        TaskView {
            task_id: self.id.clone(),
            reservation_id: self.reservation_id.clone(),
            template_id: self.template_id.clone(),
            name: self.name.clone(),
            status: self.status,
            status_label: self.status.label(),
            scheduled_start: self.scheduled_start,
            assigned_user_ids: self.assigned_user_ids.iter().cloned().collect(),
        }
    }
}

/// Serialized representation of a task for API responses and CLI output.
#[derive(Debug, Clone, Serialize)]
pub struct TaskView {
    pub task_id: TaskId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation_id: Option<ReservationId>,
    pub template_id: TemplateId,
    pub name: String,
    pub status: TaskStatus,
    pub status_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_start: Option<NaiveDateTime>,
    pub assigned_user_ids: Vec<UserId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn stay(check_out: &str, next_check_in: Option<&str>) -> Reservation {
        let parse = |value: &str| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").expect("valid datetime")
        };
        Reservation {
            id: ReservationId("res-1".to_string()),
            property_name: "Cedar Loft".to_string(),
            check_in: parse("2024-05-28T16:00:00"),
            check_out: parse(check_out),
            next_check_in: next_check_in.map(parse),
        }
    }

    #[test]
    fn parse_folds_unknown_statuses_to_not_started() {
        assert_eq!(TaskStatus::parse("Complete"), TaskStatus::Complete);
        assert_eq!(TaskStatus::parse("  In  Progress "), TaskStatus::InProgress);
        assert_eq!(TaskStatus::parse("reopened"), TaskStatus::Reopened);
        assert_eq!(TaskStatus::parse("awaiting parts"), TaskStatus::NotStarted);
        assert_eq!(TaskStatus::parse(""), TaskStatus::NotStarted);
    }

    #[test]
    fn same_day_turnover_compares_calendar_dates_only() {
        let flip = stay("2024-06-01T23:00:00", Some("2024-06-01T00:30:00"));
        assert!(flip.same_day_turnover());

        let gap = stay("2024-06-01T10:00:00", Some("2024-06-02T15:00:00"));
        assert!(!gap.same_day_turnover());

        let tail = stay("2024-06-01T10:00:00", None);
        assert!(!tail.same_day_turnover());
    }

    #[test]
    fn stay_dates_projects_instants_to_days() {
        let reservation = stay("2024-06-01T11:00:00", None);
        let (check_in, check_out) = reservation.stay_dates();
        assert_eq!(check_in, NaiveDate::from_ymd_opt(2024, 5, 28).expect("valid"));
        assert_eq!(check_out, NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid"));
    }

    #[test]
    fn contingent_tasks_do_not_count_toward_turnover() {
        let task = TurnoverTask {
            id: TaskId("task-1".to_string()),
            reservation_id: None,
            template_id: TemplateId("turnover_clean".to_string()),
            name: "Turnover clean".to_string(),
            status: TaskStatus::Contingent,
            scheduled_start: None,
            assigned_user_ids: BTreeSet::new(),
        };
        assert!(!task.counts_toward_turnover());
    }
}
