//! Layered data progression: the same key population carried through a
//! sequence of tables (raw → bronze → silver → gold).

use crate::check::{Observation, Rule};
use crate::error::CheckError;
use crate::snapshot::{Snapshot, Table};
use labgate_types::{Metric, MetricMap};
use std::collections::BTreeSet;

/// One stage of a progression: report label and snapshot table name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layer {
    pub label: String,
    pub table: String,
}

pub fn layers<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Vec<Layer> {
    pairs
        .into_iter()
        .map(|(label, table)| Layer {
            label: label.to_string(),
            table: table.to_string(),
        })
        .collect()
}

fn resolve<'s>(snapshot: &'s Snapshot, layers: &[Layer]) -> Result<Vec<&'s Table>, CheckError> {
    layers
        .iter()
        .map(|layer| snapshot.require_table(&layer.table))
        .collect()
}

/// Every layer has the same number of rows.
#[derive(Clone, Debug)]
pub struct LayeredRowCounts {
    layers: Vec<Layer>,
    metric: String,
}

impl LayeredRowCounts {
    pub fn new(layers: Vec<Layer>) -> Self {
        Self {
            layers,
            metric: "row_counts".to_string(),
        }
    }
}

impl Rule for LayeredRowCounts {
    fn evaluate(&self, snapshot: &Snapshot) -> Result<Observation, CheckError> {
        let tables = resolve(snapshot, &self.layers)?;
        let counts: Vec<usize> = tables.iter().map(|t| t.len()).collect();
        let summary = self
            .layers
            .iter()
            .zip(&counts)
            .map(|(layer, n)| format!("{}={n}", layer.label))
            .collect::<Vec<_>>()
            .join(", ");
        let map: MetricMap = self
            .layers
            .iter()
            .zip(&counts)
            .map(|(layer, n)| (layer.label.clone(), Metric::from(*n)))
            .collect();

        let consistent = counts.windows(2).all(|w| w[0] == w[1]);
        let obs = if consistent {
            Observation::pass(format!("row counts match: {summary}"))
        } else {
            Observation::fail(format!("row counts differ: {summary}"))
        };
        Ok(obs.with_metric(self.metric.clone(), map))
    }
}

/// Every layer carries exactly the key set of the first layer.
#[derive(Clone, Debug)]
pub struct LayeredKeys {
    layers: Vec<Layer>,
    column: String,
    mismatch_metric: Option<String>,
}

impl LayeredKeys {
    pub fn new(layers: Vec<Layer>, column: &str) -> Self {
        Self {
            layers,
            column: column.to_string(),
            mismatch_metric: None,
        }
    }

    /// Per layer, the sorted keys that differ from the first layer.
    pub fn mismatches_as(mut self, metric: &str) -> Self {
        self.mismatch_metric = Some(metric.to_string());
        self
    }
}

impl Rule for LayeredKeys {
    fn evaluate(&self, snapshot: &Snapshot) -> Result<Observation, CheckError> {
        let tables = resolve(snapshot, &self.layers)?;
        let mut sets = Vec::with_capacity(tables.len());
        for (layer, table) in self.layers.iter().zip(&tables) {
            let keys: BTreeSet<&str> = table
                .column_values(&layer.table, &self.column)?
                .into_iter()
                .collect();
            sets.push(keys);
        }

        let mut mismatches = MetricMap::new();
        let mut differing = Vec::new();
        if let Some(first) = sets.first() {
            for (layer, keys) in self.layers.iter().zip(&sets).skip(1) {
                let diff: Vec<&str> = first.symmetric_difference(keys).copied().collect();
                if !diff.is_empty() {
                    differing.push(format!("{} ({})", layer.label, diff.join(", ")));
                    mismatches.insert(layer.label.clone(), Metric::sorted_list(diff));
                }
            }
        }

        let obs = if differing.is_empty() {
            Observation::pass(format!(
                "all layers share the same {} set",
                self.column
            ))
        } else {
            Observation::fail(format!(
                "{} differs from the first layer in: {}",
                self.column,
                differing.join("; ")
            ))
        };
        Ok(obs.with_optional_metric(self.mismatch_metric.as_deref(), mismatches))
    }
}

/// Every layer declares at least one column.
#[derive(Clone, Debug)]
pub struct ColumnsPresent {
    layers: Vec<Layer>,
    metric: String,
}

impl ColumnsPresent {
    pub fn new(layers: Vec<Layer>) -> Self {
        Self {
            layers,
            metric: "num_columns".to_string(),
        }
    }
}

impl Rule for ColumnsPresent {
    fn evaluate(&self, snapshot: &Snapshot) -> Result<Observation, CheckError> {
        let tables = resolve(snapshot, &self.layers)?;
        let mut map = MetricMap::new();
        let mut empty = Vec::new();
        for (layer, table) in self.layers.iter().zip(&tables) {
            let n = table.columns().len();
            if n == 0 {
                empty.push(layer.label.clone());
            }
            map.insert(layer.label.clone(), Metric::from(n));
        }

        let obs = if empty.is_empty() {
            Observation::pass("every layer declares columns")
        } else {
            Observation::fail(format!("layers without columns: {}", empty.join(", ")))
        };
        Ok(obs.with_metric(self.metric.clone(), map))
    }
}
