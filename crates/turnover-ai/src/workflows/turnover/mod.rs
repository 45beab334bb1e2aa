//! Turnover scheduling between guest stays: aggregate status, one-shot
//! task automation, and the date-window layout behind the timeline view.
//!
//! Everything in here computes over snapshots handed in by the caller.
//! There is no clock access, no caching, and no I/O; the repository trait
//! is the only seam to the outside.

pub mod automation;
pub mod board;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod status;
pub mod timeline;

#[cfg(test)]
mod tests;

pub use automation::{evaluate, AutomationConfig, AutomationOutcome};
pub use board::{BoardRowView, BoardView, StatusCountEntry, TimelineBoard};
pub use domain::{
    Reservation, ReservationId, TaskId, TaskStatus, TaskView, TemplateId, TurnoverStatus,
    TurnoverTask, UserId,
};
pub use repository::{RepositoryError, TurnoverRepository};
pub use router::turnover_router;
pub use service::{NewTaskRequest, TaskStatusChange, TurnoverService, TurnoverServiceError};
pub use status::aggregate;
pub use timeline::{place, DateWindow, IntervalPlacement, TimelineMode};
