//! CH07: an AI-generated change pack checked against the labs global
//! snapshot. The pack is data only; nothing in it is executed.

use crate::Lab;
use crate::ch02::ANCHOR_TYPES;
use labgate_domain::checks::{Anchor, Containment, DeltaThreshold, Shape, Vocabulary};
use labgate_domain::snapshot::scalar_to_string;
use labgate_domain::{
    ChangeId, Check, CheckRegistry, Field, Items, Observation, RegistryError, Snapshot, from_fn,
};
use labgate_types::{InputFormat, InputSpec, Metric, MetricMap};
use serde_json::Value;

pub(crate) const LAB: Lab = Lab {
    chapter: "CH07",
    title: "AI-generated change pack evaluation",
    inputs,
    build,
};

fn inputs() -> Vec<InputSpec> {
    vec![
        InputSpec::required("snapshot", "inputs/state_snapshot.json", InputFormat::Json),
        InputSpec::required(
            "pack",
            "inputs/ai_generated_change_pack_example.json",
            InputFormat::Json,
        ),
    ]
}

fn state(path: &str) -> Field {
    Field::new("snapshot", path)
}

fn summary(snapshot: &Snapshot) -> MetricMap {
    let changes = snapshot
        .document("pack")
        .and_then(|pack| pack.get("changes"))
        .and_then(Value::as_array);
    let change_count = changes.map_or(0, Vec::len);
    let targets = changes
        .into_iter()
        .flatten()
        .filter_map(|c| c.get("target").and_then(scalar_to_string));

    let mut metrics = MetricMap::new();
    metrics.insert("change_count".to_string(), Metric::from(change_count));
    metrics.insert("boundary_targets".to_string(), Metric::sorted_list(targets));
    metrics
}

/// The snapshot need not list chapters, but when it does CH07 should be
/// among them.
fn snapshot_lists_chapter(snapshot: &Snapshot) -> Observation {
    let chapters = snapshot.value(&state("chapters"));
    let listed = match chapters {
        None => true,
        Some(Value::Object(map)) => map.is_empty() || map.contains_key("CH07"),
        Some(Value::Array(items)) => {
            items.is_empty() || items.iter().any(|c| c.as_str() == Some("CH07"))
        }
        Some(_) => false,
    };
    if listed {
        Observation::pass("snapshot chapters include CH07 or are not listed")
    } else {
        Observation::fail("snapshot.chapters is present but does not contain CH07")
    }
}

fn build() -> Result<CheckRegistry, RegistryError> {
    Ok(CheckRegistry::new("CH07")
        .with_change_id(ChangeId::none())
        .with_summary(summary)
        .with(
            Check::new(
                "schema_ok",
                Shape::new("pack")
                    .require(["kind", "chapter", "mode", "rb30_anchor", "summary", "changes"])
                    .expect("kind", "ai_generated_change_pack")
                    .list("changes"),
            )
            .with_template("[schema] {detail}", "[schema] {detail}"),
        )?
        .with(
            Check::new(
                "chapter_ok",
                Shape::new("pack").expect("chapter", "CH07").expect("mode", "labs"),
            )
            .with_template("[chapter] {detail}", "[chapter] {detail}"),
        )?
        .with(
            Check::new(
                "snapshot_chapter_listed",
                from_fn(|s| Ok(snapshot_lists_chapter(s))),
            )
            .informational()
            .with_template("[chapter] {detail}", "[chapter] {detail}"),
        )?
        .with(
            Check::new(
                "rb30_ok",
                Anchor::new(Field::new("pack", "rb30_anchor"), Vocabulary::fixed(ANCHOR_TYPES)),
            )
            .with_template("[rb30] {detail}", "[rb30] {detail}"),
        )?
        .with(
            Check::new(
                "boundary_ok",
                Containment::new(
                    Items::key(Field::new("pack", "changes"), "target"),
                    Vocabulary::field(Items::strings(state("boundary.allowed_targets"))),
                )
                .exact(),
            )
            .with_template("[boundary] {detail}", "[boundary] {detail}"),
        )?
        .with(
            Check::new(
                "metrics_ok",
                DeltaThreshold::new(
                    "auc",
                    state("metrics.candidate_model.auc"),
                    state("metrics.current_model.auc"),
                    state("metrics.min_auc"),
                    state("metrics.max_delta_auc"),
                ),
            )
            .with_template("[metrics] {detail}", "[metrics] {detail}"),
        )?)
}
