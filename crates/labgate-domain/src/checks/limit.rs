use super::utils::{fmt_number, number_metric};
use crate::check::{Observation, Rule};
use crate::error::CheckError;
use crate::snapshot::{Field, Snapshot, value_number};

/// What a [`Limit`] measures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Quantity {
    /// Number of entries in a list.
    Count(Field),
    /// Sum of numeric members `keys` over every object in a list. Entries
    /// that are not objects count as zero.
    Sum { list: Field, keys: Vec<String> },
}

impl Quantity {
    pub fn count(list: Field) -> Self {
        Quantity::Count(list)
    }

    pub fn sum<I, S>(list: Field, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Quantity::Sum {
            list,
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    fn observe(&self, snapshot: &Snapshot) -> Result<f64, CheckError> {
        match self {
            Quantity::Count(list) => Ok(snapshot.list(list)?.len() as f64),
            Quantity::Sum { list, keys } => {
                let mut total = 0.0;
                for (i, item) in snapshot.list(list)?.iter().enumerate() {
                    // Bare entries (plain paths) carry no deltas.
                    let Some(obj) = item.as_object() else {
                        continue;
                    };
                    for key in keys {
                        if let Some(v) = obj.get(key) {
                            let label = format!("{list}[{i}].{key}");
                            total += value_number(v, &label)?.unwrap_or(0.0);
                        }
                    }
                }
                Ok(total)
            }
        }
    }
}

/// Observed quantity ≤ configured limit. A limit that is absent or not
/// positive means "no limit configured" and the check passes.
#[derive(Clone, Debug)]
pub struct Limit {
    observed: Quantity,
    limit: Field,
    noun: String,
    observed_metric: Option<String>,
}

impl Limit {
    pub fn new(observed: Quantity, limit: Field) -> Self {
        Self {
            observed,
            limit,
            noun: "items".to_string(),
            observed_metric: None,
        }
    }

    /// Word used in messages, e.g. `files changed`.
    pub fn noun(mut self, noun: &str) -> Self {
        self.noun = noun.to_string();
        self
    }

    pub fn observed_as(mut self, metric: &str) -> Self {
        self.observed_metric = Some(metric.to_string());
        self
    }
}

impl Rule for Limit {
    fn evaluate(&self, snapshot: &Snapshot) -> Result<Observation, CheckError> {
        let observed = self.observed.observe(snapshot)?;
        let limit = snapshot.number(&self.limit)?.filter(|l| *l > 0.0);

        let obs = match limit {
            None => Observation::pass(format!(
                "{} {}; no limit configured ({})",
                fmt_count(observed),
                self.noun,
                self.limit.path()
            )),
            Some(limit) if observed <= limit => Observation::pass(format!(
                "{} {} within {} = {}",
                fmt_count(observed),
                self.noun,
                self.limit.path(),
                fmt_count(limit)
            )),
            Some(limit) => Observation::fail(format!(
                "{} {} exceeds {} = {}",
                fmt_count(observed),
                self.noun,
                self.limit.path(),
                fmt_count(limit)
            )),
        };
        Ok(obs.with_optional_metric(self.observed_metric.as_deref(), number_metric(observed)))
    }
}

fn fmt_count(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        fmt_number(value)
    }
}
