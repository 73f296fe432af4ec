//! CH09: an on-prem/cloud coexistence plan. Tables are loaded from the
//! `onprem/` and `cloud/` directories as `onprem/<name>` and `cloud/<name>`.

use crate::Lab;
use labgate_domain::checks::{PlanEntries, RowCountsMatch, TablesPresent};
use labgate_domain::{ChangeId, Check, CheckRegistry, Field, RegistryError};
use labgate_types::{InputFormat, InputSpec};

pub(crate) const LAB: Lab = Lab {
    chapter: "CH09",
    title: "Cloud migration coexistence",
    inputs,
    build,
};

fn inputs() -> Vec<InputSpec> {
    vec![
        InputSpec::required(
            "plan",
            "inputs/ch09_migration_plan.json",
            InputFormat::Json,
        ),
        InputSpec::optional("onprem", "onprem", InputFormat::CsvDir),
        InputSpec::optional("cloud", "cloud", InputFormat::CsvDir),
    ]
}

fn plan() -> PlanEntries {
    PlanEntries::new(Field::new("plan", "tables"))
}

fn build() -> Result<CheckRegistry, RegistryError> {
    Ok(CheckRegistry::new("CH09")
        .with_change_id(ChangeId::first_of([Field::new("plan", "plan_id")]).or("baseline"))
        .with(Check::new(
            "all_plan_tables_exist_onprem",
            TablesPresent::new(plan(), "onprem/").missing_as("missing_onprem"),
        ))?
        .with(Check::new(
            "all_dual_or_cutover_tables_exist_in_cloud",
            TablesPresent::new(plan().with_modes(["dual_write", "cutover"]), "cloud/")
                .missing_as("missing_cloud"),
        ))?
        .with(Check::new(
            "no_rowcount_mismatch_for_migrated_tables",
            RowCountsMatch::new(plan(), ("onprem", "onprem/"), ("cloud", "cloud/")),
        ))?)
}

#[cfg(test)]
mod tests {
    use crate::test_support::{evaluate, numbered};
    use labgate_domain::{Snapshot, SnapshotBuilder};
    use labgate_types::{Metric, MetricMap, Status};
    use serde_json::json;

    fn plan() -> SnapshotBuilder {
        Snapshot::builder().document(
            "plan",
            json!({
                "plan_id": "mig-2024",
                "tables": [
                    { "name": "customers", "mode": "dual_write" },
                    { "name": "orders", "mode": "onprem_only" },
                ],
            }),
        )
    }

    #[test]
    fn coexisting_tables_are_accepted() {
        let snapshot = plan()
            .table("onprem/customers", numbered(2))
            .table("onprem/orders", numbered(2))
            .table("cloud/customers", numbered(2))
            .build();
        let report = evaluate("CH09", &snapshot);
        assert_eq!(report.status, Status::Accept);
        assert_eq!(report.change_id.as_deref(), Some("mig-2024"));
        assert_eq!(report.metrics["row_mismatch"], Metric::Map(MetricMap::new()));
    }

    #[test]
    fn missing_cloud_table_and_row_drift_reject() {
        let snapshot = plan()
            .table("onprem/customers", numbered(2))
            .table("cloud/orders", numbered(1))
            .table("onprem/orders", numbered(2))
            .build();
        let report = evaluate("CH09", &snapshot);
        assert_eq!(report.status, Status::Reject);
        assert!(report.checks["all_plan_tables_exist_onprem"]);
        assert_eq!(report.metrics["missing_cloud"], Metric::list(["customers"]));
        let mismatch = report.metrics["row_mismatch"].as_map().expect("map");
        let orders = mismatch["orders"].as_map().expect("orders");
        assert_eq!(orders["onprem"], Metric::Int(2));
        assert_eq!(orders["cloud"], Metric::Int(1));
    }
}
