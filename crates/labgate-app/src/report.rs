use anyhow::Context;
use labgate_types::Report;

pub fn parse_report_json(text: &str) -> anyhow::Result<Report> {
    serde_json::from_str(text).context("parse report json")
}

/// Pretty JSON plus a trailing newline. Byte-identical for equal reports.
pub fn serialize_report(report: &Report) -> anyhow::Result<Vec<u8>> {
    let mut data = serde_json::to_vec_pretty(report).context("serialize report")?;
    data.push(b'\n');
    Ok(data)
}

/// The report written when the tool itself failed before evaluating.
///
/// Every check the chapter declares is reported `false` so a reader never
/// mistakes the artifact for a passing run.
pub fn runtime_error_report(chapter: Option<&str>, message: &str) -> Report {
    let lab = chapter.and_then(labgate_labs::lab);
    let check_ids = lab.and_then(|l| l.check_ids().ok()).unwrap_or_default();
    let chapter = lab
        .map(|l| l.chapter.to_string())
        .or_else(|| chapter.map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string());

    labgate_domain::fail_closed_report(
        &chapter,
        None,
        [format!("[runtime] {message}")],
        check_ids.iter().map(String::as_str),
    )
}
