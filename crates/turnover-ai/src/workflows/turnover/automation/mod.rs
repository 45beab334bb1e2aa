//! One-shot automation applied when a turnover task is created.
//!
//! The evaluator reads a property/template [`AutomationConfig`] together
//! with the reservation's checkout and following check-in, and produces the
//! task's initial schedule and assignees. It runs exactly once per task;
//! later changes to the reservation never re-trigger it.

mod config;
mod evaluator;

pub use config::{
    AutoAssignRule, AutomationConfig, SameDayOverride, ScheduleAnchor, ScheduleKind, ScheduleRule,
    DEFAULT_TASK_TIME,
};

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeSet;

use super::domain::UserId;

/// What automation decided for a newly created task.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AutomationOutcome {
    pub scheduled_start: Option<NaiveDateTime>,
    pub assigned_user_ids: BTreeSet<UserId>,
}

/// Apply an automation config to a reservation's dates.
///
/// A missing config, a disabled master or schedule switch, a missing base
/// instant, or a day offset that leaves the calendar all collapse to the
/// same quiet answer: no scheduled start. Auto-assignment is decided
/// independently of the schedule branch.
pub fn evaluate(
    config: Option<&AutomationConfig>,
    check_out: Option<NaiveDateTime>,
    next_check_in: Option<NaiveDateTime>,
) -> AutomationOutcome {
    let config = match config {
        Some(config) => config,
        None => return AutomationOutcome::default(),
    };

    AutomationOutcome {
        scheduled_start: evaluator::scheduled_start(config, check_out, next_check_in),
        assigned_user_ids: evaluator::assignments(config),
    }
}
