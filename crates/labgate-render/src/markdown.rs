use labgate_types::{Metric, Report};

pub fn render_markdown(report: &Report) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {} lab report\n\n", report.chapter));
    let status = if report.status.is_accept() {
        "ACCEPT"
    } else {
        "REJECT"
    };
    let passed = report.checks.values().filter(|p| **p).count();
    out.push_str(&format!(
        "- Status: **{}**\n- Change: {}\n- Checks: {} passed / {} total\n\n",
        status,
        report
            .change_id
            .as_deref()
            .map(|c| format!("`{c}`"))
            .unwrap_or_else(|| "none".to_string()),
        passed,
        report.checks.len()
    ));

    if report.checks.is_empty() {
        out.push_str("No checks.\n");
    } else {
        out.push_str("## Checks\n\n| Check | Result |\n|---|---|\n");
        for (id, ok) in &report.checks {
            let result = if *ok { "pass" } else { "**fail**" };
            out.push_str(&format!("| `{}` | {} |\n", cell(id), result));
        }
    }

    if !report.messages.is_empty() {
        out.push_str("\n## Messages\n\n");
        for m in &report.messages {
            out.push_str(&format!("- {}\n", m));
        }
    }

    if !report.metrics.is_empty() {
        out.push_str("\n## Metrics\n\n| Metric | Value |\n|---|---|\n");
        for (name, value) in &report.metrics {
            out.push_str(&format!("| `{}` | {} |\n", cell(name), cell(&metric_text(value))));
        }
    }

    out
}

fn metric_text(metric: &Metric) -> String {
    match metric {
        Metric::Text(s) => s.clone(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
