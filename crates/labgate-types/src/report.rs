use crate::metric::MetricMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stable schema identifiers, used by `xtask emit-schemas`.
pub const SCHEMA_REPORT_V1: &str = "labgate.report.v1";
pub const SCHEMA_CONFIG_V1: &str = "labgate.config.v1";

/// Change id used when the input carries none.
pub const DEFAULT_CHANGE_ID: &str = "baseline";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Accept,
    Reject,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Accept => "accept",
            Status::Reject => "reject",
        }
    }

    pub fn is_accept(self) -> bool {
        self == Status::Accept
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single artifact a lab run produces.
///
/// Field order is the serialized key order. `checks` and `metrics` are
/// `BTreeMap`s so their key order never depends on insertion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Report {
    pub chapter: String,
    pub status: Status,
    pub change_id: Option<String>,
    pub messages: Vec<String>,
    pub checks: BTreeMap<String, bool>,
    pub metrics: MetricMap,
}

impl Report {
    pub fn failed_checks(&self) -> impl Iterator<Item = &str> {
        self.checks
            .iter()
            .filter(|(_, passed)| !**passed)
            .map(|(id, _)| id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Metric;

    #[test]
    fn serializes_with_fixed_key_order() {
        let mut checks = BTreeMap::new();
        checks.insert("order_ok".to_string(), true);
        checks.insert("b_check".to_string(), false);
        let mut metrics = MetricMap::new();
        metrics.insert("stage_count".to_string(), Metric::Int(6));

        let report = Report {
            chapter: "CH05".to_string(),
            status: Status::Reject,
            change_id: None,
            messages: vec!["m".to_string()],
            checks,
            metrics,
        };

        let json = serde_json::to_string(&report).expect("serialize");
        assert_eq!(
            json,
            r#"{"chapter":"CH05","status":"reject","change_id":null,"messages":["m"],"checks":{"b_check":false,"order_ok":true},"metrics":{"stage_count":6}}"#
        );
        assert_eq!(report.failed_checks().collect::<Vec<_>>(), vec!["b_check"]);
    }
}
