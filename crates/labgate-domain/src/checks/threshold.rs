use super::utils::fmt_number;
use crate::check::{Observation, Rule};
use crate::error::CheckError;
use crate::snapshot::{Field, Snapshot};
use labgate_types::Metric;

/// Computes a value from the snapshot (ratios, totals).
pub type DeriveFn = fn(&Snapshot) -> Result<f64, CheckError>;

/// A numeric operand of a bound.
#[derive(Clone, Debug)]
pub enum Num {
    Const(f64),
    /// `default` applies when the field is absent; without one the field
    /// is required.
    Field { field: Field, default: Option<f64> },
    Derived(DeriveFn),
}

impl Num {
    pub fn field(field: Field) -> Self {
        Num::Field {
            field,
            default: None,
        }
    }

    pub fn field_or(field: Field, default: f64) -> Self {
        Num::Field {
            field,
            default: Some(default),
        }
    }

    pub fn resolve(&self, snapshot: &Snapshot) -> Result<f64, CheckError> {
        match self {
            Num::Const(v) => Ok(*v),
            Num::Field {
                field,
                default: Some(default),
            } => snapshot.number_or(field, *default),
            Num::Field {
                field,
                default: None,
            } => snapshot.require_number(field),
            Num::Derived(derive) => derive(snapshot),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relation {
    AtMost,
    AtLeast,
}

impl Relation {
    fn holds(self, value: f64, limit: f64) -> bool {
        match self {
            Relation::AtMost => value <= limit,
            Relation::AtLeast => value >= limit,
        }
    }

    fn symbol(self, holds: bool) -> &'static str {
        match (self, holds) {
            (Relation::AtMost, true) => "<=",
            (Relation::AtMost, false) => ">",
            (Relation::AtLeast, true) => ">=",
            (Relation::AtLeast, false) => "<",
        }
    }
}

/// `value <relation> limit`, reported under `name`.
#[derive(Clone, Debug)]
pub struct Bound {
    name: String,
    value: Num,
    relation: Relation,
    limit: Num,
}

impl Bound {
    pub fn at_most(name: &str, value: Num, limit: Num) -> Self {
        Self {
            name: name.to_string(),
            value,
            relation: Relation::AtMost,
            limit,
        }
    }

    pub fn at_least(name: &str, value: Num, limit: Num) -> Self {
        Self {
            name: name.to_string(),
            value,
            relation: Relation::AtLeast,
            limit,
        }
    }
}

/// All bounds hold. Each bound's value is emitted as a float metric named
/// after the bound; non-finite values serialize as the infinity sentinel.
#[derive(Clone, Debug)]
pub struct Bounds {
    bounds: Vec<Bound>,
}

impl Bounds {
    pub fn new(bounds: Vec<Bound>) -> Self {
        Self { bounds }
    }
}

impl Rule for Bounds {
    fn evaluate(&self, snapshot: &Snapshot) -> Result<Observation, CheckError> {
        let mut passed = true;
        let mut parts = Vec::with_capacity(self.bounds.len());
        let mut metrics = Vec::with_capacity(self.bounds.len());
        for bound in &self.bounds {
            let value = bound.value.resolve(snapshot)?;
            let limit = bound.limit.resolve(snapshot)?;
            let holds = bound.relation.holds(value, limit);
            passed &= holds;
            parts.push(format!(
                "{}={} {} {}",
                bound.name,
                fmt_number(value),
                bound.relation.symbol(holds),
                fmt_number(limit)
            ));
            metrics.push((bound.name.clone(), Metric::Float(value)));
        }

        let mut obs = Observation::new(passed, parts.join(", "));
        obs.metrics.extend(metrics);
        Ok(obs)
    }
}

/// A candidate measurement against a floor and a maximum allowed
/// degradation from the current measurement. Every operand is required.
#[derive(Clone, Debug)]
pub struct DeltaThreshold {
    candidate: Field,
    current: Field,
    min: Field,
    max_delta: Field,
    name: String,
}

impl DeltaThreshold {
    pub fn new(name: &str, candidate: Field, current: Field, min: Field, max_delta: Field) -> Self {
        Self {
            candidate,
            current,
            min,
            max_delta,
            name: name.to_string(),
        }
    }
}

impl Rule for DeltaThreshold {
    fn evaluate(&self, snapshot: &Snapshot) -> Result<Observation, CheckError> {
        let current = snapshot.require_number(&self.current)?;
        let candidate = snapshot.require_number(&self.candidate)?;
        let min = snapshot.require_number(&self.min)?;
        let max_delta = snapshot.require_number(&self.max_delta)?;
        let delta = candidate - current;
        let name = &self.name;

        let mut problems = Vec::new();
        if candidate < min {
            problems.push(format!(
                "candidate_{name}={} < min_{name}={}",
                fmt_number(candidate),
                fmt_number(min)
            ));
        }
        if delta < -max_delta {
            problems.push(format!(
                "candidate is worse than current by {}, allowed degradation is {}",
                fmt_number(delta),
                fmt_number(max_delta)
            ));
        }

        let obs = if problems.is_empty() {
            Observation::pass(format!(
                "candidate_{name}={} satisfies min_{name}={} and max_delta_{name}={} (delta {})",
                fmt_number(candidate),
                fmt_number(min),
                fmt_number(max_delta),
                fmt_number(delta)
            ))
        } else {
            Observation::fail(problems.join("; "))
        };
        Ok(obs
            .with_metric(format!("current_{name}"), current)
            .with_metric(format!("candidate_{name}"), candidate)
            .with_metric(format!("min_{name}"), min)
            .with_metric(format!("max_delta_{name}"), max_delta)
            .with_metric(format!("delta_{name}"), delta))
    }
}
