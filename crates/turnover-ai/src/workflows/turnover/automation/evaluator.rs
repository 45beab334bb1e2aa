use chrono::{Days, NaiveDateTime};
use std::collections::BTreeSet;

use super::super::domain::UserId;
use super::config::{AutomationConfig, ScheduleAnchor, ScheduleKind, ScheduleRule};

/// Computes the scheduled start for a new task, or `None` when any gate or
/// input rules it out. Degrading to "no automatic schedule" is the only
/// failure mode; nothing in here returns an error.
pub(crate) fn scheduled_start(
    config: &AutomationConfig,
    check_out: Option<NaiveDateTime>,
    next_check_in: Option<NaiveDateTime>,
) -> Option<NaiveDateTime> {
    // The base schedule flag gates the whole feature, including the
    // same-day override path.
    if !config.enabled || !config.schedule.enabled {
        return None;
    }

    let rule = active_rule(config, same_day(check_out, next_check_in));

    let base = match rule.relative_to {
        ScheduleAnchor::CheckOut => check_out,
        ScheduleAnchor::NextCheckIn => next_check_in,
    }?;

    let offset = Days::new(u64::from(rule.days_offset));
    let date = match rule.kind {
        ScheduleKind::On => Some(base.date()),
        ScheduleKind::Before => base.date().checked_sub_days(offset),
        ScheduleKind::After => base.date().checked_add_days(offset),
    }?;

    Some(date.and_time(rule.wall_clock_time()))
}

pub(crate) fn assignments(config: &AutomationConfig) -> BTreeSet<UserId> {
    if config.enabled && config.auto_assign.enabled {
        config.auto_assign.user_ids.clone()
    } else {
        BTreeSet::new()
    }
}

fn active_rule(config: &AutomationConfig, same_day: bool) -> &ScheduleRule {
    if same_day && config.same_day_override.enabled {
        // The override rule is taken as-is; its own enabled flag is not
        // consulted.
        &config.same_day_override.schedule
    } else {
        &config.schedule
    }
}

fn same_day(check_out: Option<NaiveDateTime>, next_check_in: Option<NaiveDateTime>) -> bool {
    match (check_out, next_check_in) {
        (Some(out), Some(next)) => out.date() == next.date(),
        _ => false,
    }
}
