//! CH05: the single change highway. Stages must run
//! validate → dry_run → gate → apply → export → rb30_verify.

use crate::Lab;
use labgate_domain::checks::{
    CanonicalOrder, KnownElements, RequiredElements, TerminalElement, Vocabulary,
};
use labgate_domain::{ChangeId, Check, CheckRegistry, Field, Items, RegistryError, Snapshot};
use labgate_types::{InputFormat, InputSpec, Metric, MetricMap};
use std::collections::BTreeSet;

pub(crate) const LAB: Lab = Lab {
    chapter: "CH05",
    title: "Single Change Highway stage order",
    inputs,
    build,
};

pub const CANONICAL_STAGES: [&str; 6] = [
    "validate",
    "dry_run",
    "gate",
    "apply",
    "export",
    "rb30_verify",
];

fn inputs() -> Vec<InputSpec> {
    vec![InputSpec::required(
        "pipeline",
        "inputs/pipeline.json",
        InputFormat::Json,
    )]
}

fn stages() -> Items {
    Items::key(Field::new("pipeline", "stages"), "name")
}

fn canonical() -> Vocabulary {
    Vocabulary::fixed(CANONICAL_STAGES)
}

fn summary(snapshot: &Snapshot) -> MetricMap {
    let mut metrics = MetricMap::new();
    let name = ["pipeline_name", "name"]
        .iter()
        .filter_map(|key| snapshot.text(&Field::new("pipeline", *key)))
        .find(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string());
    metrics.insert("pipeline_name".to_string(), Metric::Text(name));

    if let Ok(stages) = snapshot.items(&stages()) {
        // Distinct, matching `num_unknown_stages`.
        let extra = stages
            .iter()
            .filter(|s| !CANONICAL_STAGES.contains(&s.as_str()))
            .collect::<BTreeSet<_>>()
            .len();
        metrics.insert("stage_count".to_string(), Metric::from(stages.len()));
        metrics.insert("num_extra_stages".to_string(), Metric::from(extra));
    }
    metrics
}

fn build() -> Result<CheckRegistry, RegistryError> {
    Ok(CheckRegistry::new("CH05")
        .with_change_id(ChangeId::first_of([Field::new("pipeline", "scenario")]).or("baseline"))
        .with_summary(summary)
        .with(
            Check::new("order_ok", CanonicalOrder::new(stages(), canonical())).with_template(
                "Pipeline stages follow the canonical {detail} order.",
                "Pipeline stages do not follow the canonical Single Change Highway order: {detail}.",
            ),
        )?
        .with(
            Check::new(
                "required_stages_ok",
                RequiredElements::new(stages(), canonical())
                    .missing_as("missing_stages")
                    .count_as("num_missing_stages"),
            )
            .with_template(
                "All required stages are present.",
                "Some required stages are {detail}",
            ),
        )?
        .with(
            Check::new(
                "unknown_stages_ok",
                KnownElements::new(stages(), canonical())
                    .unknown_as("unknown_stages")
                    .count_as("num_unknown_stages"),
            )
            .with_template(
                "There are no unknown stages in the pipeline.",
                "Pipeline contains stages that are {detail}",
            ),
        )?
        .with(
            Check::new("rb30_ok", TerminalElement::new(stages(), "rb30_verify")).with_template(
                "RB-30 verification stage (rb30_verify) is present at the end of the pipeline.",
                "RB-30 verification stage is missing or not at the end of the pipeline: {detail}.",
            ),
        )?)
}
