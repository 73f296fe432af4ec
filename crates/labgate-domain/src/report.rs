use crate::check::CheckResult;
use labgate_types::{MetricMap, Report, Status};
use std::collections::BTreeMap;

/// Assembles a [`Report`]. Metrics are merged in call order, so a later
/// writer of the same key replaces an earlier one.
#[derive(Clone, Debug)]
pub struct ReportBuilder {
    chapter: String,
    status: Status,
    change_id: Option<String>,
    messages: Vec<String>,
    checks: BTreeMap<String, bool>,
    metrics: MetricMap,
}

impl ReportBuilder {
    pub fn new(chapter: impl Into<String>) -> Self {
        Self {
            chapter: chapter.into(),
            status: Status::Reject,
            change_id: None,
            messages: Vec::new(),
            checks: BTreeMap::new(),
            metrics: MetricMap::new(),
        }
    }

    pub fn change_id(mut self, change_id: Option<String>) -> Self {
        self.change_id = change_id;
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }

    pub fn metrics(mut self, metrics: MetricMap) -> Self {
        self.metrics.extend(metrics);
        self
    }

    /// Record each result's boolean, message, and metrics, in slice order.
    pub fn results(mut self, results: &[CheckResult]) -> Self {
        for result in results {
            self.checks.insert(result.check_id.clone(), result.passed);
            self.messages.push(result.message.clone());
            self.metrics
                .extend(result.metrics.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        self
    }

    /// Record a check as not passed without evaluating it.
    pub fn unevaluated(mut self, check_id: &str, message: impl Into<String>) -> Self {
        self.checks.insert(check_id.to_string(), false);
        self.messages.push(message.into());
        self
    }

    pub fn build(self) -> Report {
        Report {
            chapter: self.chapter,
            status: self.status,
            change_id: self.change_id,
            messages: self.messages,
            checks: self.checks,
            metrics: self.metrics,
        }
    }
}

/// The report for a run that could not be evaluated at all: every named
/// check is `false`, the status is `reject`, metrics are empty, and the
/// reasons lead the messages.
pub fn fail_closed_report<'a>(
    chapter: &str,
    change_id: Option<String>,
    reasons: impl IntoIterator<Item = String>,
    check_ids: impl IntoIterator<Item = &'a str>,
) -> Report {
    let mut builder = ReportBuilder::new(chapter)
        .change_id(change_id)
        .status(Status::Reject);
    for reason in reasons {
        builder = builder.message(reason);
    }
    for id in check_ids {
        let message = format!("[{id}] not evaluated: required input unavailable");
        builder = builder.unevaluated(id, message);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use labgate_types::Metric;

    #[test]
    fn later_metrics_replace_earlier_ones() {
        let mut summary = MetricMap::new();
        summary.insert("stage_count".to_string(), Metric::Int(0));
        let result = CheckResult {
            check_id: "order_ok".to_string(),
            required: true,
            passed: true,
            message: "[order_ok] ok".to_string(),
            metrics: [("stage_count".to_string(), Metric::Int(6))].into(),
        };

        let report = ReportBuilder::new("CH05")
            .metrics(summary)
            .results(&[result])
            .status(Status::Accept)
            .build();
        assert_eq!(report.metrics["stage_count"], Metric::Int(6));
        assert_eq!(report.messages, vec!["[order_ok] ok".to_string()]);
        assert!(report.checks["order_ok"]);
    }

    #[test]
    fn fail_closed_report_marks_everything_false() {
        let report = fail_closed_report(
            "CH03",
            Some("baseline".to_string()),
            ["[io] File not found: integration_pipeline.json".to_string()],
            ["sli_slo_ok", "roi_ok"],
        );
        assert_eq!(report.status, Status::Reject);
        assert!(report.checks.values().all(|v| !v));
        assert!(report.metrics.is_empty());
        assert_eq!(
            report.messages,
            vec![
                "[io] File not found: integration_pipeline.json".to_string(),
                "[sli_slo_ok] not evaluated: required input unavailable".to_string(),
                "[roi_ok] not evaluated: required input unavailable".to_string(),
            ]
        );
    }
}
