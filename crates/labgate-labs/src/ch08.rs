//! CH08: guard coverage and ownership for a tiny CI/CD pipeline.

use crate::Lab;
use labgate_domain::checks::{EveryItemHas, NonEmpty};
use labgate_domain::snapshot::scalar_to_string;
use labgate_domain::{ChangeId, Check, CheckRegistry, Field, RegistryError, Snapshot};
use labgate_types::{InputFormat, InputSpec, Metric, MetricMap};
use serde_json::Value;

pub(crate) const LAB: Lab = Lab {
    chapter: "CH08",
    title: "Pipeline guard coverage",
    inputs,
    build,
};

fn inputs() -> Vec<InputSpec> {
    vec![InputSpec::required(
        "pipeline",
        "inputs/pipeline.json",
        InputFormat::Json,
    )]
}

fn stages() -> Field {
    Field::new("pipeline", "stages")
}

fn summary(snapshot: &Snapshot) -> MetricMap {
    let Ok(stages) = snapshot.list(&stages()) else {
        return MetricMap::new();
    };
    let guards = stages.iter().map(|stage| {
        stage
            .get("guards")
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    });
    let owners = stages
        .iter()
        .filter_map(|stage| stage.get("owner_team").and_then(scalar_to_string))
        .filter(|owner| !owner.is_empty());

    let mut metrics = MetricMap::new();
    metrics.insert("guards_per_stage".to_string(), Metric::list(guards));
    metrics.insert("owner_teams".to_string(), Metric::sorted_list(owners));
    metrics
}

fn build() -> Result<CheckRegistry, RegistryError> {
    Ok(CheckRegistry::new("CH08")
        .with_change_id(ChangeId::first_of([Field::new("pipeline", "pipeline_id")]).or("unknown"))
        .with_summary(summary)
        .with(Check::new(
            "has_stages",
            NonEmpty::new(stages()).count_as("stage_count"),
        ))?
        .with(Check::new(
            "all_stages_have_guard",
            EveryItemHas::new(stages(), "guards").missing_as("missing_guards"),
        ))?
        .with(Check::new(
            "all_stages_have_owner",
            EveryItemHas::new(stages(), "owner_team").missing_as("missing_owners"),
        ))?)
}

#[cfg(test)]
mod tests {
    use crate::test_support::evaluate;
    use labgate_domain::Snapshot;
    use labgate_types::{Metric, Status};
    use serde_json::{Value, json};

    fn pipeline(value: Value) -> Snapshot {
        Snapshot::builder().document("pipeline", value).build()
    }

    #[test]
    fn guarded_and_owned_stages_are_accepted() {
        let report = evaluate(
            "CH08",
            &pipeline(json!({
                "pipeline_id": "payments-ci",
                "stages": [
                    { "name": "build", "guards": ["lint", "unit"], "owner_team": "platform" },
                    { "name": "deploy", "guards": ["approval"], "owner_team": "payments" },
                ],
            })),
        );
        assert_eq!(report.status, Status::Accept);
        assert_eq!(report.change_id.as_deref(), Some("payments-ci"));
        assert_eq!(report.metrics["stage_count"], Metric::Int(2));
        assert_eq!(
            report.metrics["guards_per_stage"],
            Metric::list([Metric::Int(2), Metric::Int(1)])
        );
        assert_eq!(
            report.metrics["owner_teams"],
            Metric::sorted_list(["payments", "platform"])
        );
    }

    #[test]
    fn unguarded_stage_rejects() {
        let report = evaluate(
            "CH08",
            &pipeline(json!({
                "stages": [
                    { "name": "build", "guards": ["lint"], "owner_team": "platform" },
                    { "name": "deploy", "guards": [] },
                ],
            })),
        );
        assert_eq!(report.status, Status::Reject);
        assert_eq!(report.change_id.as_deref(), Some("unknown"));
        assert_eq!(report.metrics["missing_guards"], Metric::list(["deploy"]));
        assert_eq!(report.metrics["missing_owners"], Metric::list(["deploy"]));
    }

    #[test]
    fn empty_pipeline_fails_has_stages() {
        let report = evaluate("CH08", &pipeline(json!({})));
        assert!(!report.checks["has_stages"]);
        assert!(report.checks["all_stages_have_guard"]);
        assert_eq!(report.status, Status::Reject);
    }
}
