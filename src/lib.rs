//! Volunteer shift roster planning: shift catalog, preference scoring, group
//! disaggregation, an exact assignment model and reporting over its solution.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
