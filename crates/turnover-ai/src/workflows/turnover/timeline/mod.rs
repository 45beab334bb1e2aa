//! Date-window pagination and interval layout for the timeline grid.

mod placement;
mod window;

pub use placement::{place, IntervalPlacement};
pub use window::{DateWindow, TimelineMode};
