use crate::error::CheckError;
use crate::snapshot::Snapshot;
use labgate_types::{Metric, MetricMap};
use std::borrow::Cow;
use std::fmt;

/// What a rule observed: the pass/fail decision, the concrete reason, and
/// any metrics it derived along the way.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    pub passed: bool,
    pub detail: String,
    pub metrics: MetricMap,
}

impl Observation {
    pub fn new(passed: bool, detail: impl Into<String>) -> Self {
        Self {
            passed,
            detail: detail.into(),
            metrics: MetricMap::new(),
        }
    }

    pub fn pass(detail: impl Into<String>) -> Self {
        Self::new(true, detail)
    }

    pub fn fail(detail: impl Into<String>) -> Self {
        Self::new(false, detail)
    }

    pub fn with_metric(mut self, name: impl Into<String>, value: impl Into<Metric>) -> Self {
        self.metrics.insert(name.into(), value.into());
        self
    }

    /// Insert only when a metric name was configured.
    pub fn with_optional_metric(self, name: Option<&str>, value: impl Into<Metric>) -> Self {
        match name {
            Some(name) => self.with_metric(name, value),
            None => self,
        }
    }
}

/// A pure predicate over a snapshot.
///
/// Rules must not observe other checks' results, the clock, or anything
/// outside the snapshot.
pub trait Rule: Send + Sync {
    fn evaluate(&self, snapshot: &Snapshot) -> Result<Observation, CheckError>;
}

impl<F> Rule for F
where
    F: Fn(&Snapshot) -> Result<Observation, CheckError> + Send + Sync,
{
    fn evaluate(&self, snapshot: &Snapshot) -> Result<Observation, CheckError> {
        self(snapshot)
    }
}

/// Pin a closure to the [`Rule`] signature so its argument and return
/// types are inferred at the call site.
pub fn from_fn<F>(f: F) -> F
where
    F: Fn(&Snapshot) -> Result<Observation, CheckError> + Send + Sync,
{
    f
}

/// Message text for a check. `{id}` and `{detail}` are substituted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageTemplate {
    pass: Cow<'static, str>,
    fail: Cow<'static, str>,
}

impl Default for MessageTemplate {
    fn default() -> Self {
        Self {
            pass: Cow::Borrowed("[{id}] {detail}"),
            fail: Cow::Borrowed("[{id}] {detail}"),
        }
    }
}

impl MessageTemplate {
    pub fn new(pass: impl Into<Cow<'static, str>>, fail: impl Into<Cow<'static, str>>) -> Self {
        Self {
            pass: pass.into(),
            fail: fail.into(),
        }
    }

    pub fn render(&self, id: &str, passed: bool, detail: &str) -> String {
        let template = if passed { &self.pass } else { &self.fail };
        template.replace("{id}", id).replace("{detail}", detail)
    }
}

/// A named rule plus its gating flag and message template.
pub struct Check {
    id: String,
    required: bool,
    template: MessageTemplate,
    rule: Box<dyn Rule>,
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("id", &self.id)
            .field("required", &self.required)
            .field("template", &self.template)
            .finish_non_exhaustive()
    }
}

impl Check {
    /// A required check with the default `[{id}] {detail}` template.
    pub fn new(id: impl Into<String>, rule: impl Rule + 'static) -> Self {
        Self {
            id: id.into(),
            required: true,
            template: MessageTemplate::default(),
            rule: Box::new(rule),
        }
    }

    /// Reported in `checks` and `messages`, but never decides the verdict.
    pub fn informational(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_template(
        mut self,
        pass: impl Into<Cow<'static, str>>,
        fail: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.template = MessageTemplate::new(pass, fail);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub(crate) fn set_required(&mut self, required: bool) {
        self.required = required;
    }

    /// Evaluate the rule, converting a rule error into a failed result.
    pub fn run(&self, snapshot: &Snapshot) -> CheckResult {
        match self.rule.evaluate(snapshot) {
            Ok(observation) => CheckResult {
                check_id: self.id.clone(),
                required: self.required,
                passed: observation.passed,
                message: self
                    .template
                    .render(&self.id, observation.passed, &observation.detail),
                metrics: observation.metrics,
            },
            Err(err) => CheckResult {
                check_id: self.id.clone(),
                required: self.required,
                passed: false,
                message: format!("[{}] could not be evaluated: {err}", self.id),
                metrics: MetricMap::new(),
            },
        }
    }
}

/// Outcome of one check on one evaluation. Never reused across runs.
#[derive(Clone, Debug, PartialEq)]
pub struct CheckResult {
    pub check_id: String,
    pub required: bool,
    pub passed: bool,
    pub message: String,
    pub metrics: MetricMap,
}
