//! Pure policy evaluation (no IO).
//!
//! Input: a [`Snapshot`] assembled elsewhere from already-parsed documents.
//! Output: a [`Report`](labgate_types::Report) with per-check booleans,
//! ordered messages, metrics, and an accept/reject status.
//!
//! Every check runs on every evaluation. Nothing here reads the clock, the
//! environment, or the filesystem, so the same snapshot always yields the
//! same report.

#![forbid(unsafe_code)]

pub mod check;
pub mod checks;
pub mod error;
pub mod registry;
pub mod report;
pub mod snapshot;
pub mod verdict;

mod engine;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use check::{Check, CheckResult, MessageTemplate, Observation, Rule, from_fn};
pub use engine::{evaluate, run};
pub use error::{CheckError, RegistryError};
pub use registry::{ChangeId, CheckRegistry, SummaryFn};
pub use report::{ReportBuilder, fail_closed_report};
pub use snapshot::{Field, InputFailure, Items, Snapshot, SnapshotBuilder, Table};
