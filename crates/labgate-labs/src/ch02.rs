//! CH02: a change unit stays inside its boundary, within size limits, and
//! carries an RB-30 rollback anchor.

use crate::Lab;
use labgate_domain::checks::{Anchor, Containment, Limit, Quantity, Vocabulary};
use labgate_domain::{ChangeId, Check, CheckRegistry, Field, Items, RegistryError};
use labgate_types::{InputFormat, InputSpec};

pub(crate) const LAB: Lab = Lab {
    chapter: "CH02",
    title: "Boundary, change unit, and RB-30 evidence",
    inputs,
    build,
};

pub(crate) const ANCHOR_TYPES: [&str; 3] = ["tag", "swap", "tt"];

fn inputs() -> Vec<InputSpec> {
    vec![
        InputSpec::required("policy", "inputs/policy.json", InputFormat::Json),
        InputSpec::required("change", "inputs/change.json", InputFormat::Json),
    ]
}

fn policy(path: &str) -> Field {
    Field::new("policy", path)
}

fn files() -> Field {
    Field::new("change", "files")
}

fn build() -> Result<CheckRegistry, RegistryError> {
    Ok(CheckRegistry::new("CH02")
        .with_change_id(ChangeId::first_of([Field::new("change", "change_id")]).or("baseline"))
        .with(Check::new(
            "boundary_ok",
            Containment::new(
                Items::key(files(), "path"),
                Vocabulary::field(Items::strings(policy("allowed_prefixes"))),
            )
            .outside_as("outside_boundary"),
        ))?
        .with(Check::new(
            "unit_ok",
            Limit::new(Quantity::count(files()), policy("max_files_changed"))
                .noun("files changed")
                .observed_as("files_changed"),
        ))?
        .with(Check::new(
            "lines_ok",
            Limit::new(
                Quantity::sum(files(), ["added", "removed"]),
                policy("max_lines_changed"),
            )
            .noun("lines changed")
            .observed_as("lines_changed"),
        ))?
        .with(
            Check::new(
                "rb30_ok",
                Anchor::new(
                    Field::new("change", "rb30_anchor"),
                    Vocabulary::field(Items::strings(policy("rb30_anchor_types"))).or(ANCHOR_TYPES),
                ),
            )
            .with_template("[{id}] RB-30 {detail}", "[{id}] RB-30 evidence missing: {detail}"),
        )?)
}

#[cfg(test)]
mod tests {
    use crate::test_support::evaluate;
    use labgate_domain::Snapshot;
    use labgate_types::{Metric, Status};
    use serde_json::{Value, json};

    fn snapshot(policy: Value, change: Value) -> Snapshot {
        Snapshot::builder()
            .document("policy", policy)
            .document("change", change)
            .build()
    }

    fn change(paths: &[&str]) -> Value {
        let files: Vec<Value> = paths
            .iter()
            .map(|p| json!({ "path": p, "added": 3, "removed": 1 }))
            .collect();
        json!({
            "change_id": "CU-42",
            "files": files,
            "rb30_anchor": { "type": "tag", "ref": "rb30/CU-42" },
        })
    }

    #[test]
    fn change_inside_the_boundary_is_accepted() {
        let report = evaluate(
            "CH02",
            &snapshot(
                json!({ "allowed_prefixes": ["src/", "docs/"], "max_files_changed": 3 }),
                change(&["src/app.py", "docs/readme.md"]),
            ),
        );
        assert_eq!(report.status, Status::Accept);
        assert_eq!(report.change_id.as_deref(), Some("CU-42"));
        assert_eq!(report.metrics["files_changed"], Metric::Int(2));
        assert_eq!(report.metrics["lines_changed"], Metric::Int(8));
        assert_eq!(report.messages[3], "[rb30_ok] RB-30 anchor tag:rb30/CU-42");
    }

    #[test]
    fn path_outside_the_boundary_rejects() {
        let report = evaluate(
            "CH02",
            &snapshot(
                json!({ "allowed_prefixes": ["src/", "docs/"] }),
                change(&["src/app.py", "infra/main.tf"]),
            ),
        );
        assert_eq!(report.status, Status::Reject);
        assert!(!report.checks["boundary_ok"]);
        assert!(report.checks["unit_ok"]);
        assert_eq!(
            report.metrics["outside_boundary"],
            Metric::sorted_list(["infra/main.tf"])
        );
    }

    #[test]
    fn file_limit_applies_only_when_configured() {
        let paths = ["src/a", "src/b", "src/c", "src/d"];
        let unlimited = evaluate(
            "CH02",
            &snapshot(
                json!({ "allowed_prefixes": ["src/"], "max_files_changed": 0 }),
                change(&paths),
            ),
        );
        assert!(unlimited.checks["unit_ok"]);

        let limited = evaluate(
            "CH02",
            &snapshot(
                json!({ "allowed_prefixes": ["src/"], "max_files_changed": 3 }),
                change(&paths),
            ),
        );
        assert!(!limited.checks["unit_ok"]);
        assert_eq!(limited.status, Status::Reject);
    }

    #[test]
    fn missing_anchor_rejects_and_id_defaults() {
        let report = evaluate(
            "CH02",
            &snapshot(
                json!({ "allowed_prefixes": ["src/"] }),
                json!({ "files": [{ "path": "src/app.py" }] }),
            ),
        );
        assert!(!report.checks["rb30_ok"]);
        assert_eq!(report.change_id.as_deref(), Some("baseline"));
        assert_eq!(
            report.messages[3],
            "[rb30_ok] RB-30 evidence missing: `change.rb30_anchor` is missing"
        );
    }
}
