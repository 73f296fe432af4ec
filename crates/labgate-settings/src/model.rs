use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_REPORT_OUT: &str = "artifacts/result.json";

/// `lab.toml` schema v1.
///
/// Every field is optional; an empty file selects the catalog defaults for
/// the chapter inferred from the lab directory name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LabConfigV1 {
    /// Optional schema string for tooling (`labgate.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Chapter id such as `CH05`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,

    /// Report path relative to the lab directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_out: Option<String>,

    /// Map of input name -> path relative to the lab directory.
    #[serde(default)]
    pub inputs: BTreeMap<String, String>,

    /// Map of check_id -> config.
    #[serde(default)]
    pub checks: BTreeMap<String, CheckConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CheckConfig {
    /// `false` makes the check informational: still reported, never gating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}
