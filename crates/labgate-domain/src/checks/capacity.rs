use crate::check::{Observation, Rule};
use crate::error::CheckError;
use crate::snapshot::{Field, Snapshot, scalar_to_string, value_number};
use labgate_types::{Metric, MetricMap};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
struct MetricNames {
    capacity: String,
    used: String,
    overcommitted: String,
}

/// Aggregated consumer usage per resource stays within declared capacity.
///
/// Capacity and usage values are truncated to whole units; a total that
/// leaves the integer range fails the check instead of wrapping. A consumer that
/// names a resource not declared in `resources` is ignored; it never
/// creates a resource.
#[derive(Clone, Debug)]
pub struct Capacity {
    resources: Field,
    consumers: Field,
    resource_id: String,
    capacity_key: String,
    consumer_resource: String,
    usage_key: String,
    names: MetricNames,
}

impl Capacity {
    pub fn new(resources: Field, consumers: Field) -> Self {
        Self {
            resources,
            consumers,
            resource_id: "id".to_string(),
            capacity_key: "capacity".to_string(),
            consumer_resource: "resource".to_string(),
            usage_key: "usage".to_string(),
            names: MetricNames {
                capacity: "capacity".to_string(),
                used: "used".to_string(),
                overcommitted: "overcommitted".to_string(),
            },
        }
    }

    pub fn resource_keys(mut self, id: &str, capacity: &str) -> Self {
        self.resource_id = id.to_string();
        self.capacity_key = capacity.to_string();
        self
    }

    pub fn consumer_keys(mut self, resource: &str, usage: &str) -> Self {
        self.consumer_resource = resource.to_string();
        self.usage_key = usage.to_string();
        self
    }

    pub fn metrics_as(mut self, capacity: &str, used: &str, overcommitted: &str) -> Self {
        self.names = MetricNames {
            capacity: capacity.to_string(),
            used: used.to_string(),
            overcommitted: overcommitted.to_string(),
        };
        self
    }
}

fn whole_units(item: &Value, key: &str, label: &str) -> Result<i64, CheckError> {
    let value = match item.get(key) {
        Some(v) => value_number(v, label)?.unwrap_or(0.0),
        None => 0.0,
    };
    Ok(value.trunc() as i64)
}

impl Rule for Capacity {
    fn evaluate(&self, snapshot: &Snapshot) -> Result<Observation, CheckError> {
        let mut capacity: BTreeMap<String, i64> = BTreeMap::new();
        for (i, resource) in snapshot.list(&self.resources)?.iter().enumerate() {
            let id = resource
                .get(&self.resource_id)
                .and_then(scalar_to_string)
                .ok_or_else(|| {
                    CheckError::MissingField(format!("{}[{i}].{}", self.resources, self.resource_id))
                })?;
            let label = format!("{}[{i}].{}", self.resources, self.capacity_key);
            capacity.insert(id, whole_units(resource, &self.capacity_key, &label)?);
        }

        let mut used: BTreeMap<String, i64> = capacity.keys().map(|k| (k.clone(), 0)).collect();
        for (i, consumer) in snapshot.list(&self.consumers)?.iter().enumerate() {
            let Some(target) = consumer
                .get(&self.consumer_resource)
                .and_then(scalar_to_string)
            else {
                continue;
            };
            let Some(slot) = used.get_mut(&target) else {
                continue;
            };
            let label = format!("{}[{i}].{}", self.consumers, self.usage_key);
            let usage = whole_units(consumer, &self.usage_key, &label)?;
            *slot = slot
                .checked_add(usage)
                .ok_or_else(|| CheckError::Invalid(format!("usage for `{target}` overflows")))?;
        }

        let mut overcommitted = MetricMap::new();
        let mut problems = Vec::new();
        for (id, total) in &used {
            let max = capacity.get(id).copied().unwrap_or(0);
            if *total > max {
                problems.push(format!("{id} (used {total} > max {max})"));
                let mut entry = MetricMap::new();
                entry.insert("max".to_string(), Metric::Int(max));
                entry.insert("used".to_string(), Metric::Int(*total));
                overcommitted.insert(id.clone(), Metric::Map(entry));
            }
        }

        let obs = if problems.is_empty() {
            Observation::pass(format!(
                "no resource is overcommitted across {} resources",
                capacity.len()
            ))
        } else {
            Observation::fail(format!("overcommitted: {}", problems.join(", ")))
        };
        let to_map = |m: &BTreeMap<String, i64>| -> MetricMap {
            m.iter().map(|(k, v)| (k.clone(), Metric::Int(*v))).collect()
        };
        Ok(obs
            .with_metric(self.names.capacity.clone(), to_map(&capacity))
            .with_metric(self.names.used.clone(), to_map(&used))
            .with_metric(self.names.overcommitted.clone(), overcommitted))
    }
}
