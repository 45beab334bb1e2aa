use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::super::domain::UserId;

/// Wall-clock time applied when a schedule rule omits one or carries an
/// unparseable value.
pub const DEFAULT_TASK_TIME: &str = "10:00";

/// Per-property, per-template ruleset applied once when a task is created.
///
/// Every branch is explicit and defaults to disabled, so a sparse or
/// partially filled document from the settings store deserializes into a
/// config that simply does nothing rather than failing the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AutomationConfig {
    /// Master switch; when false no schedule and no assignment applies.
    pub enabled: bool,
    pub schedule: ScheduleRule,
    pub same_day_override: SameDayOverride,
    pub auto_assign: AutoAssignRule,
}

/// How to derive a task's scheduled start from a reservation's dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleRule {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub kind: ScheduleKind,
    pub relative_to: ScheduleAnchor,
    pub days_offset: u32,
    /// "HH:MM" 24-hour wall-clock time; see [`DEFAULT_TASK_TIME`].
    pub time: Option<String>,
}

impl ScheduleRule {
    /// Parses the configured time, falling back to [`DEFAULT_TASK_TIME`]
    /// when absent or malformed. Seconds are always zero.
    pub fn wall_clock_time(&self) -> NaiveTime {
        self.time
            .as_deref()
            .and_then(|value| NaiveTime::parse_from_str(value.trim(), "%H:%M").ok())
            .unwrap_or_else(|| {
                NaiveTime::parse_from_str(DEFAULT_TASK_TIME, "%H:%M")
                    .expect("default task time is a valid wall-clock time")
            })
    }
}

impl Default for ScheduleRule {
    fn default() -> Self {
        Self {
            enabled: false,
            kind: ScheduleKind::On,
            relative_to: ScheduleAnchor::CheckOut,
            days_offset: 0,
            time: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleKind {
    On,
    Before,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleAnchor {
    CheckOut,
    NextCheckIn,
}

/// Alternate schedule used when checkout and the next check-in land on the
/// same calendar day. The nested rule's own `enabled` flag is ignored;
/// enabling the override is what activates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SameDayOverride {
    pub enabled: bool,
    pub schedule: ScheduleRule,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AutoAssignRule {
    pub enabled: bool,
    pub user_ids: BTreeSet<UserId>,
}
