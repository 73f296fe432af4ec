use super::utils::join;
use super::vocabulary::Vocabulary;
use crate::check::{Observation, Rule};
use crate::error::CheckError;
use crate::snapshot::{Field, Snapshot, scalar_to_string};
use serde_json::Value;

/// Whether a change may omit its anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorPresence {
    Required,
    Optional,
}

/// A rollback anchor `{type, ref}`: an allow-listed `type` and a non-empty
/// `ref` string.
#[derive(Clone, Debug)]
pub struct Anchor {
    field: Field,
    allowed_types: Vocabulary,
    presence: AnchorPresence,
}

impl Anchor {
    pub fn new(field: Field, allowed_types: Vocabulary) -> Self {
        Self {
            field,
            allowed_types,
            presence: AnchorPresence::Required,
        }
    }

    pub fn optional(mut self) -> Self {
        self.presence = AnchorPresence::Optional;
        self
    }
}

impl Rule for Anchor {
    fn evaluate(&self, snapshot: &Snapshot) -> Result<Observation, CheckError> {
        let anchor = match (snapshot.value(&self.field), self.presence) {
            (None, AnchorPresence::Required) => {
                return Ok(Observation::fail(format!("`{}` is missing", self.field)));
            }
            (None, AnchorPresence::Optional) => {
                return Ok(Observation::pass(format!("no `{}` (optional)", self.field)));
            }
            (Some(Value::Object(obj)), _) => obj,
            (Some(_), _) => {
                return Ok(Observation::fail(format!(
                    "`{}` must be an object",
                    self.field
                )));
            }
        };

        let mut allowed = self.allowed_types.resolve(snapshot)?;
        allowed.sort();
        let kind = anchor.get("type").and_then(scalar_to_string);
        let reference = anchor.get("ref").and_then(Value::as_str).unwrap_or("");

        let mut problems = Vec::new();
        match &kind {
            Some(k) if allowed.contains(k) => {}
            Some(k) => problems.push(format!(
                "type must be one of [{}], got `{k}`",
                join(&allowed)
            )),
            None => problems.push(format!("type must be one of [{}]", join(&allowed))),
        }
        if reference.trim().is_empty() {
            problems.push("ref must be a non-empty string".to_string());
        }

        if problems.is_empty() {
            Ok(Observation::pass(format!(
                "anchor {}:{reference}",
                kind.unwrap_or_default()
            )))
        } else {
            Ok(Observation::fail(format!(
                "`{}`: {}",
                self.field,
                problems.join("; ")
            )))
        }
    }
}
