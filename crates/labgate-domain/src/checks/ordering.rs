//! Sequence checks against a canonical vocabulary (pipeline stages).

use super::utils::join;
use super::vocabulary::Vocabulary;
use crate::check::{Observation, Rule};
use crate::error::CheckError;
use crate::snapshot::{Items, Snapshot};
use labgate_types::Metric;
use std::collections::BTreeSet;

/// Filtering the observed sequence to canonical elements yields exactly the
/// canonical sequence.
#[derive(Clone, Debug)]
pub struct CanonicalOrder {
    observed: Items,
    canonical: Vocabulary,
}

impl CanonicalOrder {
    pub fn new(observed: Items, canonical: Vocabulary) -> Self {
        Self {
            observed,
            canonical,
        }
    }
}

impl Rule for CanonicalOrder {
    fn evaluate(&self, snapshot: &Snapshot) -> Result<Observation, CheckError> {
        let canonical = self.canonical.resolve(snapshot)?;
        let observed = snapshot.items(&self.observed)?;
        let filtered: Vec<String> = observed
            .iter()
            .filter(|e| canonical.contains(e))
            .cloned()
            .collect();

        if filtered == canonical {
            Ok(Observation::pass(canonical.join(" → ")))
        } else {
            Ok(Observation::fail(format!(
                "observed {} but expected {}",
                render_sequence(&filtered),
                canonical.join(" → ")
            )))
        }
    }
}

/// No observed element falls outside the vocabulary.
#[derive(Clone, Debug)]
pub struct KnownElements {
    observed: Items,
    vocabulary: Vocabulary,
    unknown_metric: Option<String>,
    count_metric: Option<String>,
}

impl KnownElements {
    pub fn new(observed: Items, vocabulary: Vocabulary) -> Self {
        Self {
            observed,
            vocabulary,
            unknown_metric: None,
            count_metric: None,
        }
    }

    pub fn unknown_as(mut self, metric: &str) -> Self {
        self.unknown_metric = Some(metric.to_string());
        self
    }

    pub fn count_as(mut self, metric: &str) -> Self {
        self.count_metric = Some(metric.to_string());
        self
    }
}

impl Rule for KnownElements {
    fn evaluate(&self, snapshot: &Snapshot) -> Result<Observation, CheckError> {
        let vocabulary = self.vocabulary.resolve(snapshot)?;
        let unknown: Vec<String> = snapshot
            .items(&self.observed)?
            .into_iter()
            .filter(|e| !vocabulary.contains(e))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let obs = if unknown.is_empty() {
            Observation::pass("no unknown elements")
        } else {
            Observation::fail(format!("unknown: {}", join(&unknown)))
        };
        Ok(obs
            .with_optional_metric(self.count_metric.as_deref(), unknown.len())
            .with_optional_metric(self.unknown_metric.as_deref(), Metric::sorted_list(unknown)))
    }
}

/// Every vocabulary element appears in the observed sequence.
#[derive(Clone, Debug)]
pub struct RequiredElements {
    observed: Items,
    vocabulary: Vocabulary,
    missing_metric: Option<String>,
    count_metric: Option<String>,
}

impl RequiredElements {
    pub fn new(observed: Items, vocabulary: Vocabulary) -> Self {
        Self {
            observed,
            vocabulary,
            missing_metric: None,
            count_metric: None,
        }
    }

    pub fn missing_as(mut self, metric: &str) -> Self {
        self.missing_metric = Some(metric.to_string());
        self
    }

    pub fn count_as(mut self, metric: &str) -> Self {
        self.count_metric = Some(metric.to_string());
        self
    }
}

impl Rule for RequiredElements {
    fn evaluate(&self, snapshot: &Snapshot) -> Result<Observation, CheckError> {
        let observed = snapshot.items(&self.observed)?;
        let missing: Vec<String> = self
            .vocabulary
            .resolve(snapshot)?
            .into_iter()
            .filter(|e| !observed.contains(e))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let obs = if missing.is_empty() {
            Observation::pass("all required elements are present")
        } else {
            Observation::fail(format!("missing: {}", join(&missing)))
        };
        Ok(obs
            .with_optional_metric(self.count_metric.as_deref(), missing.len())
            .with_optional_metric(self.missing_metric.as_deref(), Metric::sorted_list(missing)))
    }
}

/// `element` is present and is the last observed element.
#[derive(Clone, Debug)]
pub struct TerminalElement {
    observed: Items,
    element: String,
}

impl TerminalElement {
    pub fn new(observed: Items, element: &str) -> Self {
        Self {
            observed,
            element: element.to_string(),
        }
    }
}

impl Rule for TerminalElement {
    fn evaluate(&self, snapshot: &Snapshot) -> Result<Observation, CheckError> {
        let observed = snapshot.items(&self.observed)?;
        match observed.last() {
            Some(last) if *last == self.element => {
                Ok(Observation::pass(format!("`{}` is the final element", self.element)))
            }
            Some(last) if observed.contains(&self.element) => Ok(Observation::fail(format!(
                "`{}` is present but `{last}` comes after it",
                self.element
            ))),
            _ => Ok(Observation::fail(format!("`{}` is missing", self.element))),
        }
    }
}

fn render_sequence(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(" → ")
    }
}
