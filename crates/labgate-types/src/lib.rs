//! Stable DTOs shared across the labgate workspace.
//!
//! This crate is intentionally boring:
//! - the report emitted once per lab run
//! - metric values with fixed serialization
//! - declarations of the input documents a lab consumes
//! - canonical repo-relative path handling for boundary checks

#![forbid(unsafe_code)]

pub mod inputs;
pub mod metric;
pub mod path;
pub mod report;

pub use inputs::{InputFormat, InputSpec};
pub use metric::{INFINITE_SENTINEL, Metric, MetricMap};
pub use path::ChangePath;
pub use report::{DEFAULT_CHANGE_ID, Report, SCHEMA_CONFIG_V1, SCHEMA_REPORT_V1, Status};
