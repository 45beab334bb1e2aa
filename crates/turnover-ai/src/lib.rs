//! Core engine for coordinating turnover cleaning and maintenance between
//! guest stays at managed properties.
//!
//! Everything under [`workflows`] is pure computation over snapshots the
//! caller passes in: aggregate turnover status, automation-driven task
//! scheduling, and the date-window placement that backs the timeline grid.
//! The surrounding modules carry service plumbing (configuration,
//! telemetry, error mapping) shared by the API binary.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
