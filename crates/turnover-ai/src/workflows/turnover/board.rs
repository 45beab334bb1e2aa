//! Assembles the timeline board the grid renderer consumes: one row per
//! reservation with its aggregate status and window placement.

use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{Reservation, ReservationId, TaskStatus, TurnoverStatus, TurnoverTask};
use super::status;
use super::timeline::{place, DateWindow, IntervalPlacement, TimelineMode};

#[derive(Debug)]
pub struct TimelineBoard {
    window: DateWindow,
    rows: Vec<BoardRow>,
}

#[derive(Debug, Clone)]
pub struct BoardRow {
    pub reservation: Reservation,
    pub status: TurnoverStatus,
    pub placement: IntervalPlacement,
    pub same_day_turnover: bool,
    pub open_tasks: usize,
    pub task_count: usize,
}

impl BoardRow {
    fn to_view(&self) -> BoardRowView {
        BoardRowView {
            reservation_id: self.reservation.id.clone(),
            property_name: self.reservation.property_name.clone(),
            check_in: self.reservation.check_in.date(),
            check_out: self.reservation.check_out.date(),
            status: self.status,
            status_label: self.status.label(),
            placement: self.placement,
            same_day_turnover: self.same_day_turnover,
            open_tasks: self.open_tasks,
            task_count: self.task_count,
        }
    }
}

impl TimelineBoard {
    /// Derive a board from reservation/task snapshots. Placements and
    /// statuses are computed fresh; nothing here survives a window change.
    pub fn build(window: DateWindow, entries: &[(Reservation, Vec<TurnoverTask>)]) -> Self {
        let mut rows: Vec<BoardRow> = entries
            .iter()
            .map(|(reservation, tasks)| {
                let (check_in, check_out) = reservation.stay_dates();
                let task_count = tasks
                    .iter()
                    .filter(|task| task.counts_toward_turnover())
                    .count();
                let open_tasks = tasks
                    .iter()
                    .filter(|task| {
                        task.counts_toward_turnover() && task.status != TaskStatus::Complete
                    })
                    .count();

                BoardRow {
                    status: status::aggregate(tasks),
                    placement: place(check_in, check_out, &window),
                    same_day_turnover: reservation.same_day_turnover(),
                    open_tasks,
                    task_count,
                    reservation: reservation.clone(),
                }
            })
            .collect();

        rows.sort_by(|a, b| {
            a.reservation
                .check_in
                .cmp(&b.reservation.check_in)
                .then_with(|| a.reservation.id.cmp(&b.reservation.id))
        });

        Self { window, rows }
    }

    pub fn window(&self) -> &DateWindow {
        &self.window
    }

    pub fn rows(&self) -> &[BoardRow] {
        &self.rows
    }

    /// Serializable projection: visible rows only, with the count of
    /// reservations the current window excludes.
    pub fn summary(&self) -> BoardView {
        let visible: Vec<BoardRowView> = self
            .rows
            .iter()
            .filter(|row| row.placement.is_visible())
            .map(BoardRow::to_view)
            .collect();
        let off_window = self.rows.len() - visible.len();

        let status_counts = TurnoverStatus::ordered()
            .into_iter()
            .map(|status| StatusCountEntry {
                status,
                status_label: status.label(),
                count: visible.iter().filter(|row| row.status == status).count(),
            })
            .collect();

        BoardView {
            mode: self.window.mode(),
            mode_label: self.window.mode().label(),
            window_start: self.window.first(),
            window_end: self.window.last(),
            dates: self.window.dates().to_vec(),
            rows: visible,
            off_window,
            status_counts,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BoardRowView {
    pub reservation_id: ReservationId,
    pub property_name: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub status: TurnoverStatus,
    pub status_label: &'static str,
    pub placement: IntervalPlacement,
    pub same_day_turnover: bool,
    pub open_tasks: usize,
    pub task_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusCountEntry {
    pub status: TurnoverStatus,
    pub status_label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    pub mode: TimelineMode,
    pub mode_label: &'static str,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub dates: Vec<NaiveDate>,
    pub rows: Vec<BoardRowView>,
    pub off_window: usize,
    pub status_counts: Vec<StatusCountEntry>,
}
