use schemars::JsonSchema;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

/// String written in place of a non-finite float (e.g. a payback period with
/// no revenue). JSON has no infinity literal, so reports carry this instead.
pub const INFINITE_SENTINEL: &str = "infinite";

pub type MetricMap = BTreeMap<String, Metric>;

/// A named value in the report `metrics` map.
///
/// Serialization is untagged and deterministic: maps keep lexicographic key
/// order, lists keep the order they were built in (set-derived lists are
/// sorted on construction via [`Metric::sorted_list`]).
#[derive(Clone, Debug, PartialEq, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Metric {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<Metric>),
    Map(MetricMap),
}

impl Metric {
    /// Deduplicate and sort a population of strings.
    pub fn sorted_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = items.into_iter().map(Into::into).collect();
        Metric::List(set.into_iter().map(Metric::Text).collect())
    }

    /// Keep the given order (sequence-derived lists such as per-stage counts).
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Metric>,
    {
        Metric::List(items.into_iter().map(Into::into).collect())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Metric::Int(n) => Some(*n as f64),
            Metric::Float(f) => Some(*f),
            Metric::Text(t) if t == INFINITE_SENTINEL => Some(f64::INFINITY),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Metric::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Metric]> {
        match self {
            Metric::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MetricMap> {
        match self {
            Metric::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Metric::Bool(b) => serializer.serialize_bool(*b),
            Metric::Int(n) => serializer.serialize_i64(*n),
            Metric::Float(f) if f.is_finite() => serializer.serialize_f64(*f),
            Metric::Float(f) if f.is_nan() => serializer.serialize_str("nan"),
            Metric::Float(f) if *f > 0.0 => serializer.serialize_str(INFINITE_SENTINEL),
            Metric::Float(_) => serializer.serialize_str("-infinite"),
            Metric::Text(t) => serializer.serialize_str(t),
            Metric::List(items) => items.serialize(serializer),
            Metric::Map(map) => map.serialize(serializer),
        }
    }
}

impl From<bool> for Metric {
    fn from(value: bool) -> Self {
        Metric::Bool(value)
    }
}

impl From<i64> for Metric {
    fn from(value: i64) -> Self {
        Metric::Int(value)
    }
}

impl From<usize> for Metric {
    fn from(value: usize) -> Self {
        Metric::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Metric {
    fn from(value: f64) -> Self {
        Metric::Float(value)
    }
}

impl From<&str> for Metric {
    fn from(value: &str) -> Self {
        Metric::Text(value.to_string())
    }
}

impl From<String> for Metric {
    fn from(value: String) -> Self {
        Metric::Text(value)
    }
}

impl From<MetricMap> for Metric {
    fn from(value: MetricMap) -> Self {
        Metric::Map(value)
    }
}
