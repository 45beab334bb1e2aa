use chrono::NaiveDate;
use serde::Serialize;

use super::window::DateWindow;

/// Where a stay interval lands on the current window, in grid terms.
///
/// `start_index` and `span` are only meaningful against the window that
/// produced them; recompute after any navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntervalPlacement {
    /// Column of the first rendered day, -1 when nothing is visible.
    pub start_index: i32,
    /// Number of columns covered, checkout day included; 0 when hidden.
    pub span: u32,
    pub starts_before_range: bool,
    pub ends_after_range: bool,
}

impl IntervalPlacement {
    pub const HIDDEN: Self = Self {
        start_index: -1,
        span: 0,
        starts_before_range: false,
        ends_after_range: false,
    };

    pub const fn is_visible(&self) -> bool {
        self.span > 0
    }
}

/// Place a stay's calendar interval onto the window.
///
/// Comparisons are date-only. An interval wholly before or wholly after
/// the window is hidden; a checkout landing exactly on the window's first
/// day still renders, which is what keeps just-passed turnovers on screen
/// when the window anchors at yesterday. Intervals spilling over either
/// edge are clamped and flagged instead of dropped.
pub fn place(check_in: NaiveDate, check_out: NaiveDate, window: &DateWindow) -> IntervalPlacement {
    if check_out < window.first() || check_in > window.last() {
        return IntervalPlacement::HIDDEN;
    }

    let starts_before_range = check_in < window.first();
    let ends_after_range = check_out > window.last();

    let start_index = match window.index_of(check_in) {
        Some(index) => index,
        None if starts_before_range => 0,
        // Contiguous windows always index an in-range date; guard anyway.
        None => return IntervalPlacement::HIDDEN,
    };

    let span = window.dates()[start_index..]
        .iter()
        .take_while(|date| **date <= check_out)
        .count();

    // Inverted or otherwise degenerate intervals normalize to hidden.
    if span == 0 {
        return IntervalPlacement::HIDDEN;
    }

    IntervalPlacement {
        start_index: start_index as i32,
        span: span as u32,
        starts_before_range,
        ends_after_range,
    }
}


#[cfg(test)]
mod properties {
    use super::*;
    use crate::workflows::turnover::timeline::window::TimelineMode;
    use chrono::Duration;
    use proptest::prelude::*;

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date")
    }

    proptest! {
        #[test]
        fn visible_exactly_when_the_interval_overlaps(start in -45i64..45, nights in 0i64..45) {
            let window = DateWindow::new(anchor(), TimelineMode::Week);
            let check_in = anchor() + Duration::days(start);
            let check_out = check_in + Duration::days(nights);

            let placement = place(check_in, check_out, &window);
            let overlaps = check_out >= window.first() && check_in <= window.last();

            prop_assert_eq!(placement.is_visible(), overlaps);
        }

        #[test]
        fn span_counts_window_days_inside_the_interval(start in -45i64..45, nights in 0i64..45) {
            let window = DateWindow::new(anchor(), TimelineMode::Week);
            let check_in = anchor() + Duration::days(start);
            let check_out = check_in + Duration::days(nights);

            let placement = place(check_in, check_out, &window);
            let covered = window
                .dates()
                .iter()
                .filter(|date| **date >= check_in && **date <= check_out)
                .count() as u32;

            if placement.is_visible() {
                prop_assert_eq!(placement.span, covered);
                prop_assert!(placement.start_index >= 0);
                prop_assert!((placement.start_index as u32) + placement.span <= 7);
            } else {
                prop_assert_eq!(covered, 0);
            }
        }
    }
}
