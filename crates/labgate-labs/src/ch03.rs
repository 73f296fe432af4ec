//! CH03: SLI/SLO thresholds and the 12-month ROI of an integration
//! pipeline.

use crate::Lab;
use labgate_domain::checks::{Bound, Bounds, Num, guarded_ratio};
use labgate_domain::snapshot::value_number;
use labgate_domain::{ChangeId, Check, CheckError, CheckRegistry, Field, RegistryError, Snapshot};
use labgate_types::{InputFormat, InputSpec, Metric, MetricMap};

pub(crate) const LAB: Lab = Lab {
    chapter: "CH03",
    title: "SLI/SLO and ROI for an integration pipeline",
    inputs,
    build,
};

const COST_PER_ENGINEER_DAY_USD: f64 = 8000.0;
const FRESHNESS_HOURS: f64 = 3.0;
const COVERAGE_PCT: f64 = 0.98;
const FRESHNESS_HOURS_MAX: f64 = 6.0;
const COVERAGE_PCT_MIN: f64 = 0.95;
const ROI_TARGET_AFTER_12_MONTHS: f64 = 3.0;
const PAYBACK_TARGET_MONTHS: f64 = 12.0;

fn inputs() -> Vec<InputSpec> {
    vec![
        InputSpec::required(
            "pipeline",
            "inputs/integration_pipeline.json",
            InputFormat::Json,
        ),
        InputSpec::required("slo", "inputs/sli_slo_config.json", InputFormat::Json),
    ]
}

fn pipeline(path: &str) -> Field {
    Field::new("pipeline", path)
}

fn slo(path: &str) -> Field {
    Field::new("slo", path)
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Totals {
    monthly_impact: f64,
    effort_days: f64,
    cost: f64,
}

fn totals(snapshot: &Snapshot) -> Result<Totals, CheckError> {
    let sources = pipeline("sources");
    let mut monthly_impact = 0.0;
    let mut effort_days = 0.0;
    for (i, source) in snapshot.list(&sources)?.iter().enumerate() {
        let member = |key: &str| -> Result<f64, CheckError> {
            match source.get(key) {
                Some(v) => Ok(value_number(v, &format!("{sources}[{i}].{key}"))?.unwrap_or(0.0)),
                None => Ok(0.0),
            }
        };
        monthly_impact += member("expected_monthly_revenue_impact_usd")?;
        effort_days += member("integration_effort_days")?;
    }
    let cost_per_day =
        snapshot.number_or(&slo("cost_per_engineer_day_usd"), COST_PER_ENGINEER_DAY_USD)?;
    Ok(Totals {
        monthly_impact,
        effort_days,
        cost: effort_days * cost_per_day,
    })
}

fn roi_after_12_months(snapshot: &Snapshot) -> Result<f64, CheckError> {
    let t = totals(snapshot)?;
    if t.cost > 0.0 && t.monthly_impact > 0.0 {
        Ok((12.0 * t.monthly_impact - t.cost) / t.cost)
    } else {
        Ok(0.0)
    }
}

fn payback_period_months(snapshot: &Snapshot) -> Result<f64, CheckError> {
    let t = totals(snapshot)?;
    if t.cost > 0.0 {
        Ok(guarded_ratio(t.cost, t.monthly_impact))
    } else {
        Ok(f64::INFINITY)
    }
}

fn summary(snapshot: &Snapshot) -> MetricMap {
    let Ok(t) = totals(snapshot) else {
        return MetricMap::new();
    };
    [
        ("total_expected_monthly_impact_usd", t.monthly_impact),
        ("total_integration_effort_days", t.effort_days),
        ("total_integration_cost_usd", t.cost),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), Metric::Float(value)))
    .collect()
}

fn build() -> Result<CheckRegistry, RegistryError> {
    Ok(CheckRegistry::new("CH03")
        .with_change_id(ChangeId::first_of([slo("scenario_id")]).or("baseline"))
        .with_summary(summary)
        .with(
            Check::new(
                "sli_slo_ok",
                Bounds::new(vec![
                    Bound::at_most(
                        "freshness_hours",
                        Num::field_or(pipeline("slis.freshness_hours"), FRESHNESS_HOURS),
                        Num::field_or(
                            slo("slo_thresholds.freshness_hours_max"),
                            FRESHNESS_HOURS_MAX,
                        ),
                    ),
                    Bound::at_least(
                        "coverage_pct",
                        Num::field_or(pipeline("slis.coverage_pct"), COVERAGE_PCT),
                        Num::field_or(slo("slo_thresholds.coverage_pct_min"), COVERAGE_PCT_MIN),
                    ),
                ]),
            )
            .with_template(
                "[{id}] SLI/SLO thresholds satisfied: {detail}",
                "[{id}] SLI/SLO thresholds not satisfied: {detail}",
            ),
        )?
        .with(
            Check::new(
                "roi_ok",
                Bounds::new(vec![
                    Bound::at_least(
                        "roi_after_12_months",
                        Num::Derived(roi_after_12_months),
                        Num::field_or(
                            slo("roi_target_after_12_months"),
                            ROI_TARGET_AFTER_12_MONTHS,
                        ),
                    ),
                    Bound::at_most(
                        "payback_period_months",
                        Num::Derived(payback_period_months),
                        Num::field_or(
                            slo("payback_period_target_months"),
                            PAYBACK_TARGET_MONTHS,
                        ),
                    ),
                ]),
            )
            .with_template(
                "[{id}] ROI targets satisfied: {detail}",
                "[{id}] ROI targets not satisfied: {detail}",
            ),
        )?)
}
