//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - the verdict following exactly the required checks
//! - byte-identical reports for identical snapshots
//! - verdict independence from registration order

use crate::check::{Check, Observation, from_fn};
use crate::engine::run;
use crate::registry::CheckRegistry;
use crate::snapshot::{Field, Snapshot};
use labgate_types::{Metric, Status};
use proptest::prelude::*;
use serde_json::{Value, json};

/// One `required` flag per generated check.
fn arb_specs() -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(any::<bool>(), 0..8)
}

fn flag_check(index: usize, required: bool) -> Check {
    let check = Check::new(
        format!("check_{index}"),
        from_fn(move |s: &Snapshot| {
            let passed = s
                .value(&Field::new("flags", &format!("f{index}")))
                .and_then(Value::as_bool)
                .unwrap_or(false);
            Ok(Observation::new(passed, format!("flag {index}"))
                .with_metric(format!("seen_{index}"), Metric::sorted_list(["b", "a"])))
        }),
    );
    if required { check } else { check.informational() }
}

fn registry(specs: &[(usize, bool)]) -> CheckRegistry {
    let mut registry = CheckRegistry::new("CHXX");
    for (index, required) in specs {
        registry
            .register(flag_check(*index, *required))
            .expect("indices are unique");
    }
    registry
}

fn snapshot(flags: &[bool]) -> Snapshot {
    let mut map = serde_json::Map::new();
    for (i, flag) in flags.iter().enumerate() {
        map.insert(format!("f{i}"), json!(flag));
    }
    Snapshot::builder()
        .document("flags", Value::Object(map))
        .build()
}

proptest! {
    #[test]
    fn status_is_accept_iff_every_required_check_passed(
        required in arb_specs(),
        flags in prop::collection::vec(any::<bool>(), 8),
    ) {
        let specs: Vec<(usize, bool)> = required.iter().copied().enumerate().collect();
        let report = run(&registry(&specs), &snapshot(&flags));

        let expected = specs
            .iter()
            .filter(|(_, required)| *required)
            .all(|(i, _)| report.checks[&format!("check_{i}")]);
        prop_assert_eq!(report.status == Status::Accept, expected);
        prop_assert_eq!(report.checks.len(), specs.len());
        prop_assert_eq!(report.messages.len(), specs.len());
    }

    #[test]
    fn identical_snapshots_serialize_identically(
        required in arb_specs(),
        flags in prop::collection::vec(any::<bool>(), 8),
    ) {
        let specs: Vec<(usize, bool)> = required.iter().copied().enumerate().collect();
        let first = serde_json::to_vec(&run(&registry(&specs), &snapshot(&flags))).expect("json");
        let second = serde_json::to_vec(&run(&registry(&specs), &snapshot(&flags))).expect("json");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn verdict_does_not_depend_on_registration_order(
        required in arb_specs(),
        flags in prop::collection::vec(any::<bool>(), 8),
    ) {
        let specs: Vec<(usize, bool)> = required.iter().copied().enumerate().collect();
        let mut reversed = specs.clone();
        reversed.reverse();

        let forward = run(&registry(&specs), &snapshot(&flags));
        let backward = run(&registry(&reversed), &snapshot(&flags));
        prop_assert_eq!(forward.status, backward.status);
        prop_assert_eq!(&forward.checks, &backward.checks);
        prop_assert_eq!(&forward.metrics, &backward.metrics);

        let mut messages = backward.messages.clone();
        messages.reverse();
        prop_assert_eq!(forward.messages, messages);
    }
}
