use crate::check::Check;
use crate::error::RegistryError;
use crate::snapshot::{Field, Snapshot};
use labgate_types::{DEFAULT_CHANGE_ID, MetricMap};

/// Derives report-level metrics straight from the snapshot.
pub type SummaryFn = fn(&Snapshot) -> MetricMap;

/// How a registry resolves the report's change/scenario identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChangeId {
    /// The report carries `change_id: null`.
    None,
    Fixed(String),
    /// The first non-empty text among `fields`, else `default`.
    FirstOf {
        fields: Vec<Field>,
        default: Option<String>,
    },
}

impl ChangeId {
    pub fn none() -> Self {
        ChangeId::None
    }

    pub fn fixed(id: impl Into<String>) -> Self {
        ChangeId::Fixed(id.into())
    }

    pub fn first_of(fields: impl IntoIterator<Item = Field>) -> Self {
        ChangeId::FirstOf {
            fields: fields.into_iter().collect(),
            default: None,
        }
    }

    /// Fallback for [`ChangeId::FirstOf`]; no effect on the other variants.
    pub fn or(self, fallback: impl Into<String>) -> Self {
        match self {
            ChangeId::FirstOf { fields, .. } => ChangeId::FirstOf {
                fields,
                default: Some(fallback.into()),
            },
            other => other,
        }
    }

    pub fn resolve(&self, snapshot: &Snapshot) -> Option<String> {
        match self {
            ChangeId::None => None,
            ChangeId::Fixed(id) => Some(id.clone()),
            ChangeId::FirstOf { fields, default } => fields
                .iter()
                .filter_map(|f| snapshot.text(f))
                .find(|s| !s.trim().is_empty())
                .or_else(|| default.clone()),
        }
    }
}

impl Default for ChangeId {
    fn default() -> Self {
        ChangeId::fixed(DEFAULT_CHANGE_ID)
    }
}

/// Ordered checks for one policy domain, plus how to derive the report's
/// identifiers and summary metrics.
#[derive(Debug)]
pub struct CheckRegistry {
    chapter: String,
    checks: Vec<Check>,
    change_id: ChangeId,
    summaries: Vec<SummaryFn>,
}

impl CheckRegistry {
    pub fn new(chapter: impl Into<String>) -> Self {
        Self {
            chapter: chapter.into(),
            checks: Vec::new(),
            change_id: ChangeId::default(),
            summaries: Vec::new(),
        }
    }

    pub fn register(&mut self, check: Check) -> Result<(), RegistryError> {
        if self.checks.iter().any(|c| c.id() == check.id()) {
            return Err(RegistryError::DuplicateCheck {
                chapter: self.chapter.clone(),
                id: check.id().to_string(),
            });
        }
        self.checks.push(check);
        Ok(())
    }

    /// Chaining form of [`CheckRegistry::register`].
    pub fn with(mut self, check: Check) -> Result<Self, RegistryError> {
        self.register(check)?;
        Ok(self)
    }

    pub fn set_required(&mut self, id: &str, required: bool) -> Result<(), RegistryError> {
        let chapter = &self.chapter;
        let check = self
            .checks
            .iter_mut()
            .find(|c| c.id() == id)
            .ok_or_else(|| RegistryError::UnknownCheck {
                chapter: chapter.clone(),
                id: id.to_string(),
            })?;
        check.set_required(required);
        Ok(())
    }

    pub fn with_change_id(mut self, change_id: ChangeId) -> Self {
        self.change_id = change_id;
        self
    }

    pub fn with_summary(mut self, summary: SummaryFn) -> Self {
        self.summaries.push(summary);
        self
    }

    pub fn chapter(&self) -> &str {
        &self.chapter
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.checks.iter().map(Check::id)
    }

    pub fn change_id(&self) -> &ChangeId {
        &self.change_id
    }

    pub fn summaries(&self) -> &[SummaryFn] {
        &self.summaries
    }
}
