use super::utils::join;
use super::vocabulary::Vocabulary;
use crate::check::{Observation, Rule};
use crate::error::CheckError;
use crate::snapshot::{Items, Snapshot};
use labgate_types::{ChangePath, Metric};

/// What an empty allow-list means.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmptyPrefixes {
    /// Nothing is allowed; the check fails.
    FailClosed,
    /// No boundary is configured; the check passes.
    Vacuous,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchMode {
    Prefix,
    Exact,
}

/// Every touched path falls under at least one allowed prefix.
#[derive(Clone, Debug)]
pub struct Containment {
    touched: Items,
    allowed: Vocabulary,
    on_empty: EmptyPrefixes,
    mode: MatchMode,
    outside_metric: Option<String>,
    touched_metric: Option<String>,
}

impl Containment {
    pub fn new(touched: Items, allowed: Vocabulary) -> Self {
        Self {
            touched,
            allowed,
            on_empty: EmptyPrefixes::FailClosed,
            mode: MatchMode::Prefix,
            outside_metric: None,
            touched_metric: None,
        }
    }

    pub fn vacuous_when_empty(mut self) -> Self {
        self.on_empty = EmptyPrefixes::Vacuous;
        self
    }

    /// Compare whole targets instead of prefixes.
    pub fn exact(mut self) -> Self {
        self.mode = MatchMode::Exact;
        self
    }

    pub fn outside_as(mut self, metric: &str) -> Self {
        self.outside_metric = Some(metric.to_string());
        self
    }

    pub fn touched_as(mut self, metric: &str) -> Self {
        self.touched_metric = Some(metric.to_string());
        self
    }

    fn allows(&self, allowed: &[ChangePath], path: &ChangePath) -> bool {
        allowed.iter().any(|prefix| match self.mode {
            MatchMode::Prefix => path.is_within(prefix),
            MatchMode::Exact => path == prefix,
        })
    }
}

impl Rule for Containment {
    fn evaluate(&self, snapshot: &Snapshot) -> Result<Observation, CheckError> {
        let allowed_raw = self.allowed.resolve(snapshot)?;
        let touched: Vec<ChangePath> = snapshot
            .items(&self.touched)?
            .iter()
            .map(ChangePath::new)
            .collect();
        let touched_names: Vec<&str> = touched.iter().map(ChangePath::as_str).collect();

        if allowed_raw.is_empty() {
            let (obs, outside) = match self.on_empty {
                EmptyPrefixes::FailClosed => (
                    Observation::fail("no allowed boundary configured; nothing is allowed"),
                    touched_names.clone(),
                ),
                EmptyPrefixes::Vacuous => {
                    (Observation::pass("no boundary configured"), Vec::new())
                }
            };
            return Ok(obs
                .with_optional_metric(self.outside_metric.as_deref(), Metric::sorted_list(outside))
                .with_optional_metric(
                    self.touched_metric.as_deref(),
                    Metric::sorted_list(touched_names),
                ));
        }

        let allowed: Vec<ChangePath> = allowed_raw.iter().map(ChangePath::new).collect();
        let mut outside: Vec<String> = touched
            .iter()
            .filter(|p| !self.allows(&allowed, p))
            .map(ToString::to_string)
            .collect();
        outside.sort();
        outside.dedup();

        let obs = if outside.is_empty() {
            Observation::pass(format!(
                "all {} touched paths are within: {}",
                touched.len(),
                join(&allowed_raw)
            ))
        } else {
            Observation::fail(format!(
                "outside the allowed boundary ({}): {}",
                join(&allowed_raw),
                join(&outside)
            ))
        };
        Ok(obs
            .with_optional_metric(
                self.outside_metric.as_deref(),
                Metric::sorted_list(outside),
            )
            .with_optional_metric(
                self.touched_metric.as_deref(),
                Metric::sorted_list(touched_names),
            ))
    }
}
