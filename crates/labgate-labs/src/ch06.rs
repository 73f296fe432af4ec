//! CH06: hub/satellite governance for policies referenced by transactions.

use crate::Lab;
use labgate_domain::checks::{KeyConsistency, Keys};
use labgate_domain::{Check, CheckRegistry, RegistryError, Snapshot};
use labgate_types::{InputFormat, InputSpec, Metric, MetricMap};

pub(crate) const LAB: Lab = Lab {
    chapter: "CH06",
    title: "Data Vault hub/satellite governance",
    inputs,
    build,
};

const KEY: &str = "policy_id";

fn inputs() -> Vec<InputSpec> {
    vec![
        InputSpec::required("transactions", "inputs/raw/transactions.csv", InputFormat::Csv),
        InputSpec::required("hub", "inputs/vault/hub_policy.csv", InputFormat::Csv),
        InputSpec::required("sat", "inputs/vault/sat_policy_details.csv", InputFormat::Csv),
    ]
}

fn summary(snapshot: &Snapshot) -> MetricMap {
    let count = |table: &str| snapshot.table(table).map_or(0, |t| t.len());
    let counts: MetricMap = [
        ("transactions", count("transactions")),
        ("hub_policies", count("hub")),
        ("sat_policies", count("sat")),
    ]
    .into_iter()
    .map(|(name, n)| (name.to_string(), Metric::from(n)))
    .collect();
    [("counts".to_string(), Metric::Map(counts))].into()
}

fn hub() -> Keys {
    Keys::column("hub", KEY)
}

fn build() -> Result<CheckRegistry, RegistryError> {
    Ok(CheckRegistry::new("CH06")
        .with_summary(summary)
        .with(Check::new(
            "all_transactions_have_hub",
            KeyConsistency::new(hub(), Keys::column("transactions", KEY))
                .labels("hub", "transaction")
                .orphans_as("missing_in_hub")
                .skip_missing(),
        ))?
        .with(Check::new(
            "no_orphan_satellite",
            KeyConsistency::new(hub(), Keys::column("sat", KEY))
                .labels("hub", "satellite")
                .orphans_as("orphan_sat")
                .skip_missing(),
        ))?
        .with(Check::new(
            "all_hubs_have_satellite",
            KeyConsistency::new(hub(), Keys::column("sat", KEY))
                .labels("hub", "satellite")
                .missing_as("missing_sat")
                .skip_orphans(),
        ))?)
}

#[cfg(test)]
mod tests {
    use crate::test_support::{evaluate, table};
    use labgate_domain::{Snapshot, Table};
    use labgate_types::{Metric, Status};

    fn policies(ids: &[&str]) -> Table {
        let rows: Vec<[&str; 2]> = ids.iter().map(|id| [*id, "x"]).collect();
        let refs: Vec<&[&str]> = rows.iter().map(|r| r.as_slice()).collect();
        table(&["policy_id", "attr"], &refs)
    }

    fn snapshot(txn: &[&str], hub: &[&str], sat: &[&str]) -> Snapshot {
        Snapshot::builder()
            .table("transactions", policies(txn))
            .table("hub", policies(hub))
            .table("sat", policies(sat))
            .build()
    }

    #[test]
    fn governed_vault_is_accepted() {
        let report = evaluate("CH06", &snapshot(&["P1", "P2", "P1"], &["P1", "P2"], &["P2", "P1"]));
        assert_eq!(report.status, Status::Accept);
        let counts = report.metrics["counts"].as_map().expect("counts");
        assert_eq!(counts["transactions"], Metric::Int(3));
        assert_eq!(report.metrics["missing_in_hub"], Metric::List(vec![]));
    }

    #[test]
    fn each_direction_is_reported_separately() {
        let report = evaluate("CH06", &snapshot(&["P1", "P3"], &["P1", "P2"], &["P1", "P9"]));
        assert_eq!(report.status, Status::Reject);
        assert!(!report.checks["all_transactions_have_hub"]);
        assert!(!report.checks["no_orphan_satellite"]);
        assert!(!report.checks["all_hubs_have_satellite"]);
        assert_eq!(report.metrics["missing_in_hub"], Metric::sorted_list(["P3"]));
        assert_eq!(report.metrics["orphan_sat"], Metric::sorted_list(["P9"]));
        assert_eq!(report.metrics["missing_sat"], Metric::sorted_list(["P2"]));
        assert_eq!(
            report.messages[0],
            "[all_transactions_have_hub] transaction keys without hub: P3"
        );
    }
}
