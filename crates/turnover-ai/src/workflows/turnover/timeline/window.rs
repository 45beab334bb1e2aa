use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Zoom level of the timeline grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineMode {
    Week,
    Month,
}

impl TimelineMode {
    pub const fn length_days(self) -> u32 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Week => "Week",
            Self::Month => "Month",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            _ => None,
        }
    }
}

/// A contiguous run of calendar dates the grid renders as columns.
///
/// Windows are cheap throwaway values; navigation builds a fresh one and
/// every placement computed against the old window is discarded with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateWindow {
    anchor: NaiveDate,
    mode: TimelineMode,
    dates: Vec<NaiveDate>,
}

impl DateWindow {
    /// Window starting at `anchor` inclusive, 7 or 30 days long per mode.
    pub fn new(anchor: NaiveDate, mode: TimelineMode) -> Self {
        let dates = anchor
            .iter_days()
            .take(mode.length_days() as usize)
            .collect();

        Self {
            anchor,
            mode,
            dates,
        }
    }

    /// Window anchored one day before `today`, so a turnover whose checkout
    /// just passed still renders at the left edge.
    pub fn jump_to_today(today: NaiveDate, mode: TimelineMode) -> Self {
        Self::new(today - Duration::days(1), mode)
    }

    /// The adjacent earlier window; shares no dates with this one.
    pub fn previous(&self) -> Self {
        Self::new(
            self.anchor - Duration::days(i64::from(self.mode.length_days())),
            self.mode,
        )
    }

    /// The adjacent later window; shares no dates with this one.
    pub fn next(&self) -> Self {
        Self::new(
            self.anchor + Duration::days(i64::from(self.mode.length_days())),
            self.mode,
        )
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn mode(&self) -> TimelineMode {
        self.mode
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn first(&self) -> NaiveDate {
        self.anchor
    }

    pub fn last(&self) -> NaiveDate {
        self.anchor + Duration::days(i64::from(self.mode.length_days()) - 1)
    }

    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.dates.iter().position(|candidate| *candidate == date)
    }
}
