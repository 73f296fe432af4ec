//! Presence and governance checks: non-empty lists, document shape, and
//! per-item coverage.

use super::utils::{is_truthy, join};
use crate::check::{Observation, Rule};
use crate::error::CheckError;
use crate::snapshot::{Field, Snapshot, Table, scalar_to_string};
use labgate_types::{Metric, MetricMap};
use serde_json::Value;

/// The list at `field` has at least one entry.
#[derive(Clone, Debug)]
pub struct NonEmpty {
    field: Field,
    count_metric: Option<String>,
}

impl NonEmpty {
    pub fn new(field: Field) -> Self {
        Self {
            field,
            count_metric: None,
        }
    }

    pub fn count_as(mut self, metric: &str) -> Self {
        self.count_metric = Some(metric.to_string());
        self
    }
}

impl Rule for NonEmpty {
    fn evaluate(&self, snapshot: &Snapshot) -> Result<Observation, CheckError> {
        let n = snapshot.list(&self.field)?.len();
        let obs = if n > 0 {
            Observation::pass(format!("`{}` has {n} entries", self.field))
        } else {
            Observation::fail(format!("`{}` is empty or missing", self.field))
        };
        Ok(obs.with_optional_metric(self.count_metric.as_deref(), n))
    }
}

/// Top-level keys and fixed values of one document.
#[derive(Clone, Debug)]
pub struct Shape {
    document: String,
    required: Vec<String>,
    expected: Vec<(String, Value)>,
    lists: Vec<String>,
}

impl Shape {
    pub fn new(document: &str) -> Self {
        Self {
            document: document.to_string(),
            required: Vec::new(),
            expected: Vec::new(),
            lists: Vec::new(),
        }
    }

    /// Keys that must be present (a `null` value counts as present).
    pub fn require<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn expect(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.expected.push((key.to_string(), value.into()));
        self
    }

    pub fn list(mut self, key: &str) -> Self {
        self.lists.push(key.to_string());
        self
    }
}

impl Rule for Shape {
    fn evaluate(&self, snapshot: &Snapshot) -> Result<Observation, CheckError> {
        let empty = serde_json::Map::new();
        let object = snapshot
            .document(&self.document)
            .and_then(Value::as_object)
            .unwrap_or(&empty);

        let mut problems = Vec::new();
        for key in &self.required {
            if !object.contains_key(key) {
                problems.push(format!("missing required key `{key}`"));
            }
        }
        for (key, want) in &self.expected {
            let got = object.get(key).unwrap_or(&Value::Null);
            if got != want {
                problems.push(format!("`{key}` must be {want}, got {got}"));
            }
        }
        for key in &self.lists {
            if !object.get(key).is_some_and(Value::is_array) {
                problems.push(format!("`{key}` must be a list"));
            }
        }

        if problems.is_empty() {
            Ok(Observation::pass(format!("`{}` is well-formed", self.document)))
        } else {
            Ok(Observation::fail(problems.join("; ")))
        }
    }
}

/// Every object in a list has a truthy `key`. Offenders are named by their
/// `name` member, or by index when unnamed, in list order.
#[derive(Clone, Debug)]
pub struct EveryItemHas {
    list: Field,
    key: String,
    missing_metric: Option<String>,
}

impl EveryItemHas {
    pub fn new(list: Field, key: &str) -> Self {
        Self {
            list,
            key: key.to_string(),
            missing_metric: None,
        }
    }

    pub fn missing_as(mut self, metric: &str) -> Self {
        self.missing_metric = Some(metric.to_string());
        self
    }
}

impl Rule for EveryItemHas {
    fn evaluate(&self, snapshot: &Snapshot) -> Result<Observation, CheckError> {
        let items = snapshot.list(&self.list)?;
        let missing: Vec<String> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| !is_truthy(item.get(&self.key)))
            .map(|(i, item)| {
                item.get("name")
                    .and_then(scalar_to_string)
                    .unwrap_or_else(|| format!("#{i}"))
            })
            .collect();

        let obs = if missing.is_empty() {
            Observation::pass(format!("all {} entries have `{}`", items.len(), self.key))
        } else {
            Observation::fail(format!("missing `{}`: {}", self.key, join(&missing)))
        };
        Ok(obs.with_optional_metric(self.missing_metric.as_deref(), Metric::list(missing)))
    }
}

/// Named entries of a plan document, optionally filtered by mode.
#[derive(Clone, Debug)]
pub struct PlanEntries {
    list: Field,
    name_key: String,
    mode_key: String,
    modes: Option<Vec<String>>,
}

impl PlanEntries {
    pub fn new(list: Field) -> Self {
        Self {
            list,
            name_key: "name".to_string(),
            mode_key: "mode".to_string(),
            modes: None,
        }
    }

    pub fn with_modes<I, S>(mut self, modes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modes = Some(modes.into_iter().map(Into::into).collect());
        self
    }

    /// Entry names in plan order; entries without a name are skipped.
    fn names(&self, snapshot: &Snapshot) -> Result<Vec<String>, CheckError> {
        Ok(snapshot
            .list(&self.list)?
            .iter()
            .filter(|entry| match &self.modes {
                None => true,
                Some(modes) => entry
                    .get(&self.mode_key)
                    .and_then(Value::as_str)
                    .is_some_and(|m| modes.iter().any(|x| x == m)),
            })
            .filter_map(|entry| entry.get(&self.name_key).and_then(scalar_to_string))
            .filter(|name| !name.is_empty())
            .collect())
    }
}

/// Every plan entry has a table named `<prefix><name>` in the snapshot.
#[derive(Clone, Debug)]
pub struct TablesPresent {
    plan: PlanEntries,
    prefix: String,
    missing_metric: Option<String>,
}

impl TablesPresent {
    pub fn new(plan: PlanEntries, prefix: &str) -> Self {
        Self {
            plan,
            prefix: prefix.to_string(),
            missing_metric: None,
        }
    }

    pub fn missing_as(mut self, metric: &str) -> Self {
        self.missing_metric = Some(metric.to_string());
        self
    }
}

impl Rule for TablesPresent {
    fn evaluate(&self, snapshot: &Snapshot) -> Result<Observation, CheckError> {
        let names = self.plan.names(snapshot)?;
        let missing: Vec<String> = names
            .iter()
            .filter(|name| snapshot.table(&format!("{}{name}", self.prefix)).is_none())
            .cloned()
            .collect();

        let obs = if missing.is_empty() {
            Observation::pass(format!(
                "all {} planned tables exist under {}",
                names.len(),
                self.prefix
            ))
        } else {
            Observation::fail(format!(
                "missing under {}: {}",
                self.prefix,
                join(&missing)
            ))
        };
        Ok(obs.with_optional_metric(self.missing_metric.as_deref(), Metric::list(missing)))
    }
}

/// Where both sides hold a plan entry's table, their row counts match.
#[derive(Clone, Debug)]
pub struct RowCountsMatch {
    plan: PlanEntries,
    left: (String, String),
    right: (String, String),
    metric: String,
}

impl RowCountsMatch {
    /// `left` and `right` are `(label, table prefix)` pairs.
    pub fn new(plan: PlanEntries, left: (&str, &str), right: (&str, &str)) -> Self {
        Self {
            plan,
            left: (left.0.to_string(), left.1.to_string()),
            right: (right.0.to_string(), right.1.to_string()),
            metric: "row_mismatch".to_string(),
        }
    }

    fn side<'s>(&self, snapshot: &'s Snapshot, prefix: &str, name: &str) -> Option<&'s Table> {
        snapshot.table(&format!("{prefix}{name}"))
    }
}

impl Rule for RowCountsMatch {
    fn evaluate(&self, snapshot: &Snapshot) -> Result<Observation, CheckError> {
        let mut mismatches = MetricMap::new();
        let mut problems = Vec::new();
        for name in self.plan.names(snapshot)? {
            let (Some(left), Some(right)) = (
                self.side(snapshot, &self.left.1, &name),
                self.side(snapshot, &self.right.1, &name),
            ) else {
                continue;
            };
            if left.len() != right.len() {
                problems.push(format!(
                    "{name} ({}={}, {}={})",
                    self.left.0,
                    left.len(),
                    self.right.0,
                    right.len()
                ));
                let mut entry = MetricMap::new();
                entry.insert(self.left.0.clone(), Metric::from(left.len()));
                entry.insert(self.right.0.clone(), Metric::from(right.len()));
                mismatches.insert(name, Metric::Map(entry));
            }
        }

        let obs = if problems.is_empty() {
            Observation::pass("row counts match wherever both sides exist")
        } else {
            Observation::fail(format!("row-count mismatches: {}", problems.join(", ")))
        };
        Ok(obs.with_metric(self.metric.clone(), mismatches))
    }
}
