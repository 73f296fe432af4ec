//! The `run` use case: resolve a lab's config, load its inputs, evaluate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use labgate_settings::{DEFAULT_REPORT_OUT, LabConfigV1, Overrides, ResolvedConfig};
use labgate_types::{Report, Status};

use crate::report::runtime_error_report;

/// Input for the run use case.
#[derive(Clone, Debug)]
pub struct RunInput<'a> {
    /// Lab directory; input and report paths are relative to it.
    pub lab_dir: &'a Utf8Path,
    /// `lab.toml` contents (empty string if not found).
    pub config_text: &'a str,
    pub overrides: Overrides,
}

#[derive(Clone, Debug)]
pub struct RunOutput {
    pub report: Report,
    /// Where the report belongs, already joined onto the lab directory.
    pub report_path: Utf8PathBuf,
    pub resolved_config: ResolvedConfig,
}

/// Run the lab use case: parse config, load inputs, evaluate, produce report.
///
/// Missing or malformed inputs do not error; they produce a fail-closed
/// report. Errors are reserved for configuration problems.
pub fn run_lab(input: RunInput<'_>) -> anyhow::Result<RunOutput> {
    let cfg = if input.config_text.trim().is_empty() {
        LabConfigV1::default()
    } else {
        labgate_settings::parse_config_toml(input.config_text).context("parse lab.toml")?
    };

    let mut overrides = input.overrides;
    if overrides.inferred_chapter.is_none() {
        overrides.inferred_chapter = infer_chapter(input.lab_dir);
    }

    let resolved = labgate_settings::resolve_config(cfg, overrides).context("resolve config")?;
    let registry = resolved.registry()?;

    let snapshot = labgate_inputs::load_snapshot(input.lab_dir, &resolved.inputs);
    let report = labgate_domain::run(&registry, &snapshot);
    tracing::info!(
        chapter = %report.chapter,
        status = %report.status,
        failed = report.failed_checks().count(),
        "lab evaluated"
    );

    Ok(RunOutput {
        report_path: input.lab_dir.join(&resolved.report_out),
        report,
        resolved_config: resolved,
    })
}

/// Chapter named by the lab directory (`ch05_single_change_highway` -> `CH05`).
pub fn infer_chapter(lab_dir: &Utf8Path) -> Option<String> {
    lab_dir
        .file_name()
        .and_then(labgate_settings::chapter_from_dir_name)
}

/// The fail-closed report for a lab that could not be run, and where it
/// belongs.
///
/// Chapter and report path follow the usual precedence (overrides, then
/// `lab.toml`, then the directory name and default path). A config that
/// does not parse contributes nothing.
pub fn runtime_failure(
    lab_dir: &Utf8Path,
    config_text: &str,
    overrides: &Overrides,
    message: &str,
) -> (Utf8PathBuf, Report) {
    let cfg = labgate_settings::parse_config_toml(config_text).unwrap_or_default();
    let chapter = overrides
        .chapter
        .clone()
        .or(cfg.chapter)
        .or_else(|| overrides.inferred_chapter.clone())
        .or_else(|| infer_chapter(lab_dir));
    let report_out = overrides
        .report_out
        .clone()
        .or(cfg.report_out)
        .unwrap_or_else(|| DEFAULT_REPORT_OUT.to_string());

    let report = runtime_error_report(chapter.as_deref(), message);
    (lab_dir.join(report_out), report)
}

/// Map status to exit code: 0 = accept, 2 = reject.
pub fn status_exit_code(status: Status) -> i32 {
    match status {
        Status::Accept => 0,
        Status::Reject => 2,
    }
}
