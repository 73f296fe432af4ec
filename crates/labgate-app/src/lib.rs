//! Use case orchestration for labgate.
//!
//! This crate provides the application layer: use cases that coordinate the
//! settings, input, and domain layers. It is intentionally thin and
//! delegates heavy lifting to the appropriate layers.
//!
//! The CLI crate depends on this; it only handles argument parsing and
//! process exit codes.

#![forbid(unsafe_code)]

mod artifacts;
mod batch;
mod report;
mod run;

pub use artifacts::{read_config_text, write_report, write_text};
pub use batch::{BatchOutcome, batch_exit_code, run_batch};
pub use report::{parse_report_json, runtime_error_report, serialize_report};
pub use run::{
    RunInput, RunOutput, infer_chapter, run_lab, runtime_failure, status_exit_code,
};

#[cfg(test)]
mod test_support;
