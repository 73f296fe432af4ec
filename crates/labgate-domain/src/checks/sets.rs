use super::utils::join;
use crate::check::{Observation, Rule};
use crate::error::CheckError;
use crate::snapshot::{Items, Snapshot};
use labgate_types::Metric;
use std::collections::BTreeSet;

/// A key population: one column of a table, or a list in a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Keys {
    Column { table: String, column: String },
    Items(Items),
}

impl Keys {
    pub fn column(table: &str, column: &str) -> Self {
        Keys::Column {
            table: table.to_string(),
            column: column.to_string(),
        }
    }

    pub fn items(items: Items) -> Self {
        Keys::Items(items)
    }

    fn collect(&self, snapshot: &Snapshot) -> Result<BTreeSet<String>, CheckError> {
        match self {
            Keys::Column { table, column } => Ok(snapshot
                .require_table(table)?
                .column_values(table, column)?
                .into_iter()
                .map(str::to_string)
                .collect()),
            Keys::Items(items) => Ok(snapshot.items(items)?.into_iter().collect()),
        }
    }
}

#[derive(Clone, Debug)]
struct Side {
    metric: String,
    checked: bool,
}

/// Every child key references a parent key, and every parent key has a
/// child. Either direction can be dropped from the check.
#[derive(Clone, Debug)]
pub struct KeyConsistency {
    parent: Keys,
    child: Keys,
    labels: (String, String),
    orphans: Side,
    missing: Side,
}

impl KeyConsistency {
    pub fn new(parent: Keys, child: Keys) -> Self {
        Self {
            parent,
            child,
            labels: ("parent".to_string(), "child".to_string()),
            orphans: Side {
                metric: "orphan_child".to_string(),
                checked: true,
            },
            missing: Side {
                metric: "missing_child".to_string(),
                checked: true,
            },
        }
    }

    pub fn labels(mut self, parent: &str, child: &str) -> Self {
        self.labels = (parent.to_string(), child.to_string());
        self
    }

    /// Metric name for child keys with no parent.
    pub fn orphans_as(mut self, metric: &str) -> Self {
        self.orphans.metric = metric.to_string();
        self
    }

    /// Metric name for parent keys with no child.
    pub fn missing_as(mut self, metric: &str) -> Self {
        self.missing.metric = metric.to_string();
        self
    }

    pub fn skip_orphans(mut self) -> Self {
        self.orphans.checked = false;
        self
    }

    pub fn skip_missing(mut self) -> Self {
        self.missing.checked = false;
        self
    }
}

impl Rule for KeyConsistency {
    fn evaluate(&self, snapshot: &Snapshot) -> Result<Observation, CheckError> {
        let parent = self.parent.collect(snapshot)?;
        let child = self.child.collect(snapshot)?;
        let (parent_label, child_label) = &self.labels;

        let orphans: Vec<String> = child.difference(&parent).cloned().collect();
        let missing: Vec<String> = parent.difference(&child).cloned().collect();

        let mut problems = Vec::new();
        if self.orphans.checked && !orphans.is_empty() {
            problems.push(format!(
                "{child_label} keys without {parent_label}: {}",
                join(&orphans)
            ));
        }
        if self.missing.checked && !missing.is_empty() {
            problems.push(format!(
                "{parent_label} keys without {child_label}: {}",
                join(&missing)
            ));
        }

        let mut obs = if problems.is_empty() {
            Observation::pass(format!(
                "{} {child_label} keys consistent with {} {parent_label} keys",
                child.len(),
                parent.len()
            ))
        } else {
            Observation::fail(problems.join("; "))
        };
        if self.orphans.checked {
            obs = obs.with_metric(self.orphans.metric.clone(), Metric::sorted_list(orphans));
        }
        if self.missing.checked {
            obs = obs.with_metric(self.missing.metric.clone(), Metric::sorted_list(missing));
        }
        Ok(obs)
    }
}
