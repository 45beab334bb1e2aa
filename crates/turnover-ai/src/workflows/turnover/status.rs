//! Derives the aggregate status a turnover card shows from its task set.

use super::domain::{TaskStatus, TurnoverStatus, TurnoverTask};

/// Reduce a turnover's tasks to a single displayable status.
///
/// Contingent tasks are skipped entirely. The remainder maps to
/// `Complete` only when every task is complete; any in-progress task, or a
/// partial set of completions, reads as `InProgress`. Paused and reopened
/// tasks count as open work. Recomputed from scratch on every call; there
/// is no incremental path.
pub fn aggregate(tasks: &[TurnoverTask]) -> TurnoverStatus {
    let mut counted = 0usize;
    let mut complete = 0usize;
    let mut in_progress = false;

    for task in tasks {
        if !task.counts_toward_turnover() {
            continue;
        }
        counted += 1;
        match task.status {
            TaskStatus::Complete => complete += 1,
            TaskStatus::InProgress => in_progress = true,
            _ => {}
        }
    }

    if counted == 0 {
        TurnoverStatus::NoTasks
    } else if complete == counted {
        TurnoverStatus::Complete
    } else if in_progress || complete > 0 {
        TurnoverStatus::InProgress
    } else {
        TurnoverStatus::NotStarted
    }
}
