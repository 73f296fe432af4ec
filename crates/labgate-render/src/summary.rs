use labgate_types::Report;

/// `[CH05] Lab completed. status=accept → artifacts/result.json`
pub fn render_summary_line(report: &Report, report_path: &str) -> String {
    format!(
        "[{}] Lab completed. status={} → {}",
        report.chapter, report.status, report_path
    )
}
