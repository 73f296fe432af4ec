use crate::check::CheckResult;
use crate::registry::CheckRegistry;
use crate::report::{ReportBuilder, fail_closed_report};
use crate::snapshot::Snapshot;
use crate::verdict::aggregate;
use labgate_types::{MetricMap, Report};

/// Run every registered check in registration order. Never short-circuits.
pub fn evaluate(registry: &CheckRegistry, snapshot: &Snapshot) -> Vec<CheckResult> {
    registry
        .checks()
        .iter()
        .map(|check| check.run(snapshot))
        .collect()
}

/// Evaluate a snapshot into a complete report.
///
/// A snapshot carrying input failures is not evaluated: the run fails
/// closed with the failure reasons recorded as `[io]` messages.
pub fn run(registry: &CheckRegistry, snapshot: &Snapshot) -> Report {
    let change_id = registry.change_id().resolve(snapshot);

    if !snapshot.failures().is_empty() {
        return fail_closed_report(
            registry.chapter(),
            change_id,
            snapshot.failures().iter().map(|f| format!("[io] {f}")),
            registry.ids(),
        );
    }

    let mut summary = MetricMap::new();
    for derive in registry.summaries() {
        summary.extend(derive(snapshot));
    }

    let results = evaluate(registry, snapshot);
    let status = aggregate(&results);

    ReportBuilder::new(registry.chapter())
        .change_id(change_id)
        .metrics(summary)
        .results(&results)
        .status(status)
        .build()
}
